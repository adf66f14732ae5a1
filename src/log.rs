//! Shims over [`mod@tracing`]. They expand to nothing unless the
//! `enable_log` feature is on.

macro_rules! trace {
    ($($args:tt)*) => {
        #[cfg(feature = "enable_log")]
        ::tracing::trace!($($args)*)
    };
}

pub(crate) use trace;
