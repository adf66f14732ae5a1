use std::{
    fmt,
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

/// Sole-ownership handle to a heap allocation.
///
/// At most one `ExclusiveOwner` ever holds a given address: the type has no
/// `Clone` impl, and moving it is the only way to hand the allocation over.
/// Dropping a non-empty owner releases the allocation exactly once; dropping
/// an empty one does nothing.
///
/// Unlike [`Box`], an owner may be *empty*: the state a default-constructed
/// handle starts in and a [`take`]n-from handle is left in. Access on an
/// empty owner is well defined: [`get`] returns `None` and the deref
/// operators panic with a clear message rather than touching a null pointer.
///
/// ```
/// use custody::ExclusiveOwner;
///
/// let mut first = ExclusiveOwner::new(15);
/// let second = first.take();
/// assert!(first.is_empty());
/// assert_eq!(*second, 15);
/// ```
///
/// [`take`]: ExclusiveOwner::take
/// [`get`]: ExclusiveOwner::get
pub struct ExclusiveOwner<T: ?Sized> {
    ptr: Option<NonNull<T>>,
    // Tells dropck that dropping the owner may drop a `T`.
    _marker: PhantomData<T>,
}

impl<T> ExclusiveOwner<T> {
    /// Allocate `value` on the heap and become its sole owner.
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }

    /// Take ownership of a raw allocation.
    ///
    /// A null `ptr` produces an empty owner.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must come from [`Box::into_raw`] and must not be
    /// owned or released by anything else afterwards.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self {
            ptr: NonNull::new(ptr),
            _marker: PhantomData,
        }
    }

    /// Relinquish ownership and return the raw address, null if empty.
    ///
    /// The allocation is no longer released on drop; pass the pointer back
    /// to [`ExclusiveOwner::from_raw`] to reclaim it.
    pub fn into_raw(self) -> *mut T {
        let this = ManuallyDrop::new(self);
        match this.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }

    /// Move the owned value out, or `None` if empty.
    pub fn into_inner(self) -> Option<T> {
        self.into_box().map(|boxed| *boxed)
    }

    /// The raw address of the owned allocation, null if empty.
    ///
    /// Ownership is not affected; the pointer is for observation only.
    pub fn as_ptr(&self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }
}

impl<T: ?Sized> ExclusiveOwner<T> {
    /// An owner holding nothing.
    pub fn empty() -> Self {
        Self {
            ptr: None,
            _marker: PhantomData,
        }
    }

    /// Take ownership of a boxed value. Works for unsized `T`.
    pub fn from_box(boxed: Box<T>) -> Self {
        Self {
            ptr: Some(NonNull::from(Box::leak(boxed))),
            _marker: PhantomData,
        }
    }

    /// Convert back into a [`Box`], or `None` if empty.
    pub fn into_box(self) -> Option<Box<T>> {
        let this = ManuallyDrop::new(self);
        // SAFETY: ownership moves into the box; `this` is never dropped, so
        // the allocation is released exactly once.
        this.ptr.map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) })
    }

    /// Whether the owner currently holds an allocation.
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Borrow the owned value, or `None` if empty.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: a non-empty owner points at a live allocation it owns.
        self.ptr.map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Mutably borrow the owned value, or `None` if empty.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: exclusive access to the owner is exclusive access to the
        // allocation.
        self.ptr.map(|ptr| unsafe { &mut *ptr.as_ptr() })
    }

    /// Transfer the allocation out, leaving this owner empty.
    ///
    /// The source performs no release when later dropped.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::empty())
    }
}

impl<T: ?Sized> Drop for ExclusiveOwner<T> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: sole owner of an allocation from `Box::into_raw`; the
            // `take` above clears the slot, so the release happens at most
            // once.
            unsafe { drop(Box::from_raw(ptr.as_ptr())) };
        }
    }
}

impl<T: ?Sized> Default for ExclusiveOwner<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> From<Box<T>> for ExclusiveOwner<T> {
    fn from(boxed: Box<T>) -> Self {
        Self::from_box(boxed)
    }
}

impl<T: ?Sized> Deref for ExclusiveOwner<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the owner is empty.
    fn deref(&self) -> &T {
        self.get().expect("dereferenced an empty ExclusiveOwner")
    }
}

impl<T: ?Sized> DerefMut for ExclusiveOwner<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut().expect("dereferenced an empty ExclusiveOwner")
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for ExclusiveOwner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => write!(f, "ExclusiveOwner({value:?})"),
            None => f.write_str("ExclusiveOwner(<empty>)"),
        }
    }
}

// SAFETY: the owner is the only handle to its allocation, so sending it
// sends the value, same as `Box<T>`.
unsafe impl<T: Send + ?Sized> Send for ExclusiveOwner<T> {}
// SAFETY: shared access to the owner only hands out `&T`.
unsafe impl<T: Sync + ?Sized> Sync for ExclusiveOwner<T> {}
