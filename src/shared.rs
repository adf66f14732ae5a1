use std::{
    fmt,
    marker::PhantomData,
    mem,
    ops::Deref,
    ptr::{self, NonNull},
};

use crate::{
    control::{self, ControlBlock},
    log::trace,
    weak::WeakObserver,
};

/// Reference-counted ownership handle.
///
/// Every clone shares one control block with the original; cloning bumps
/// the strong count, dropping decrements it, and the managed value is
/// destroyed precisely when the count reaches 0. A live, non-empty handle
/// therefore always points at a live value.
///
/// Like [`ExclusiveOwner`], a handle may be *empty* (default-constructed,
/// [`reset`], or [`take`]n from); an empty handle owns nothing, reports a
/// strong count of 0 and panics on deref.
///
/// The counts are plain, non-atomic cells, so the handle is deliberately
/// `!Send` and `!Sync`. Reference cycles are not detected and leak.
///
/// ```
/// use custody::SharedOwner;
///
/// let first = SharedOwner::new(5);
/// let second = first.clone();
/// assert_eq!(first.strong_count(), 2);
/// assert!(first.ptr_eq(&second));
/// ```
///
/// [`ExclusiveOwner`]: crate::ExclusiveOwner
/// [`reset`]: SharedOwner::reset
/// [`take`]: SharedOwner::take
pub struct SharedOwner<T> {
    block: Option<NonNull<ControlBlock<T>>>,
    // Cached address of the managed value; saves a hop through the block on
    // every access.
    value: Option<NonNull<T>>,
    _marker: PhantomData<T>,
}

impl<T> SharedOwner<T> {
    /// Allocate `value` on the heap together with a fresh control block.
    pub fn new(value: T) -> Self {
        let value = NonNull::from(Box::leak(Box::new(value)));
        let block = ControlBlock::allocate(value);
        trace!("allocated control block");
        Self {
            block: Some(block),
            value: Some(value),
            _marker: PhantomData,
        }
    }

    /// Take ownership of a raw allocation under a fresh control block.
    ///
    /// A null `ptr` produces an empty handle.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must come from [`Box::into_raw`] and must not be
    /// owned or released by anything else afterwards.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        match NonNull::new(ptr) {
            Some(value) => Self {
                block: Some(ControlBlock::allocate(value)),
                value: Some(value),
                _marker: PhantomData,
            },
            None => Self::empty(),
        }
    }

    /// Rebuild a handle from a block whose strong count the caller has
    /// already incremented.
    pub(crate) fn from_parts(block: NonNull<ControlBlock<T>>, value: NonNull<T>) -> Self {
        Self {
            block: Some(block),
            value: Some(value),
            _marker: PhantomData,
        }
    }

    /// A handle owning nothing.
    pub fn empty() -> Self {
        Self {
            block: None,
            value: None,
            _marker: PhantomData,
        }
    }

    /// Whether the handle currently owns anything.
    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }

    /// Borrow the managed value, or `None` if the handle is empty.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: a non-empty handle holds a strong reference, so the value
        // cannot have been destroyed.
        self.value.map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// The raw address of the managed value, null if empty.
    pub fn as_ptr(&self) -> *const T {
        match self.value {
            Some(ptr) => ptr.as_ptr() as *const T,
            None => ptr::null(),
        }
    }

    /// Number of strong handles sharing the allocation, 0 if empty.
    pub fn strong_count(&self) -> usize {
        // SAFETY: a live handle keeps its block allocated.
        self.block
            .map_or(0, |block| unsafe { block.as_ref() }.strong_count())
    }

    /// Number of weak observers of the allocation, 0 if empty.
    pub fn weak_count(&self) -> usize {
        // SAFETY: a live handle keeps its block allocated.
        self.block
            .map_or(0, |block| unsafe { block.as_ref() }.weak_count())
    }

    /// Whether both handles share one control block.
    ///
    /// Two empty handles compare equal.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.block == other.block
    }

    /// Create a non-owning observer of the allocation.
    ///
    /// The observer never extends the value's lifetime; it only keeps the
    /// control block alive for expiry checks.
    pub fn downgrade(&self) -> WeakObserver<T> {
        if let Some(block) = self.block {
            // SAFETY: a live handle keeps its block allocated.
            unsafe { block.as_ref() }.inc_weak();
        }
        WeakObserver::from_parts(self.block)
    }

    /// Drop this handle's reference, leaving it empty.
    ///
    /// Destroys the managed value if this was the last strong handle.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Transfer the reference out, leaving this handle empty.
    ///
    /// The count is unchanged; the source just no longer participates.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Move the managed value out if this is the only strong handle.
    ///
    /// On success any remaining observer reports expired. Otherwise the
    /// handle is returned unchanged.
    pub fn try_unwrap(mut self) -> Result<T, Self> {
        let Some(block) = self.block else {
            return Err(self);
        };
        // SAFETY: a live handle keeps its block allocated.
        if unsafe { block.as_ref() }.strong_count() != 1 {
            return Err(self);
        }
        self.block = None;
        self.value = None;
        // SAFETY: as above; only this handle and possibly observers remain.
        let inner = unsafe { block.as_ref() };
        let value = match inner.take_value() {
            Some(value) => value,
            None => unreachable!("a live block always holds its value"),
        };
        inner.dec_strong();
        // SAFETY: the strong count was 1 and the value slot was cleared, so
        // this is the only release of the allocation.
        let value = unsafe { *Box::from_raw(value.as_ptr()) };
        // SAFETY: our strong reference is gone.
        unsafe { control::release_if_unreferenced(block) };
        Ok(value)
    }
}

impl<T> Clone for SharedOwner<T> {
    fn clone(&self) -> Self {
        if let Some(block) = self.block {
            // SAFETY: a live handle keeps its block allocated.
            unsafe { block.as_ref() }.inc_strong();
        }
        Self {
            block: self.block,
            value: self.value,
            _marker: PhantomData,
        }
    }

    /// Guaranteed no-op when both handles already share a block: the count
    /// and the managed value are left untouched.
    fn clone_from(&mut self, source: &Self) {
        if self.block == source.block {
            return;
        }
        *self = source.clone();
    }
}

impl<T> Drop for SharedOwner<T> {
    fn drop(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };
        self.value = None;
        // SAFETY: the block stays allocated until the last handle of either
        // kind is gone.
        unsafe { block.as_ref() }.dec_strong();
        // SAFETY: our strong reference is gone.
        unsafe { control::release_if_unreferenced(block) };
    }
}

impl<T> Default for SharedOwner<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for SharedOwner<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the handle is empty.
    fn deref(&self) -> &T {
        self.get().expect("dereferenced an empty SharedOwner")
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedOwner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => write!(f, "SharedOwner({value:?})"),
            None => f.write_str("SharedOwner(<empty>)"),
        }
    }
}
