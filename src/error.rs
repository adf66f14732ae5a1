use thiserror::Error;

/// A requested position or range is outside the container's current bounds.
///
/// Positional operations never clamp or default an index; the failure is
/// reported to the caller, who decides whether to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutOfRange {
    /// A lookup or insertion position past the valid bounds.
    #[error("index {index} out of range for sequence of length {len}")]
    Index {
        /// The rejected position.
        index: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },
    /// Subsequence bounds outside the container, or inverted.
    #[error("range {start}..={end} invalid for sequence of length {len}")]
    Range {
        /// Requested first position (inclusive).
        start: usize,
        /// Requested last position (inclusive).
        end: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },
    /// First or last element requested from an empty sequence.
    #[error("sequence is empty")]
    Empty,
}

/// The observed allocation has already been destroyed.
///
/// Returned by [`upgrade`](crate::WeakObserver::upgrade) when every strong
/// handle is gone. Distinct from [`OutOfRange`] so the two failure kinds can
/// never be confused at a recovery point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("target of the weak observer has already been destroyed")]
pub struct Expired;
