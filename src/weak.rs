use std::{fmt, marker::PhantomData, ptr::NonNull};

use crate::{
    control::{self, ControlBlock},
    error::Expired,
    shared::SharedOwner,
};

/// Non-owning observer of a shared allocation.
///
/// An observer never extends the managed value's lifetime; it holds a weak
/// reference to the control block of the [`SharedOwner`] it was
/// [`downgrade`]d from, which is just enough to answer "is the target still
/// alive?" without ever touching freed memory.
///
/// Access goes through [`upgrade`]: either a fresh strong handle comes back,
/// or the call fails with [`Expired`]. Stale data is never returned.
///
/// ```
/// use custody::SharedOwner;
///
/// let owner = SharedOwner::new(10);
/// let observer = owner.downgrade();
/// assert_eq!(*observer.upgrade().unwrap(), 10);
/// drop(owner);
/// assert!(observer.expired());
/// assert!(observer.upgrade().is_err());
/// ```
///
/// [`downgrade`]: SharedOwner::downgrade
/// [`upgrade`]: WeakObserver::upgrade
pub struct WeakObserver<T> {
    block: Option<NonNull<ControlBlock<T>>>,
    _marker: PhantomData<T>,
}

impl<T> WeakObserver<T> {
    /// An observer watching nothing; vacuously expired.
    pub fn new() -> Self {
        Self {
            block: None,
            _marker: PhantomData,
        }
    }

    pub(crate) fn from_parts(block: Option<NonNull<ControlBlock<T>>>) -> Self {
        Self {
            block,
            _marker: PhantomData,
        }
    }

    /// Whether the observed value has been destroyed (or was never set).
    pub fn expired(&self) -> bool {
        match self.block {
            // SAFETY: our weak reference keeps the block allocated.
            Some(block) => !unsafe { block.as_ref() }.is_alive(),
            None => true,
        }
    }

    /// Obtain a strong handle to the observed value.
    ///
    /// Fails with [`Expired`] once the last [`SharedOwner`] is gone, however
    /// many observers remain.
    pub fn upgrade(&self) -> Result<SharedOwner<T>, Expired> {
        let Some(block) = self.block else {
            return Err(Expired);
        };
        // SAFETY: our weak reference keeps the block allocated.
        let inner = unsafe { block.as_ref() };
        if !inner.is_alive() {
            return Err(Expired);
        }
        inner.inc_strong();
        match inner.value_ptr() {
            Some(value) => Ok(SharedOwner::from_parts(block, value)),
            None => unreachable!("an alive block always holds its value"),
        }
    }

    /// Strong count of the observed allocation, 0 once expired.
    pub fn strong_count(&self) -> usize {
        // SAFETY: our weak reference keeps the block allocated.
        self.block
            .map_or(0, |block| unsafe { block.as_ref() }.strong_count())
    }
}

impl<T> Clone for WeakObserver<T> {
    fn clone(&self) -> Self {
        if let Some(block) = self.block {
            // SAFETY: our weak reference keeps the block allocated.
            unsafe { block.as_ref() }.inc_weak();
        }
        Self::from_parts(self.block)
    }
}

impl<T> Drop for WeakObserver<T> {
    fn drop(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };
        // SAFETY: the block stays allocated until the last handle of either
        // kind is gone.
        unsafe { block.as_ref() }.dec_weak();
        // SAFETY: our weak reference is gone.
        unsafe { control::release_if_unreferenced(block) };
    }
}

impl<T> Default for WeakObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for WeakObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expired() {
            f.write_str("WeakObserver(<expired>)")
        } else {
            f.write_str("WeakObserver(<alive>)")
        }
    }
}
