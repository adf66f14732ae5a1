use std::{cell::Cell, ptr::NonNull};

use crate::log::trace;

/// Shared bookkeeping for one managed allocation.
///
/// Exactly one block exists per managed object; every strong and weak handle
/// over that object points at the same block. The managed value is destroyed
/// on the strong count's 1 -> 0 transition, the block itself only once both
/// counts are 0.
///
/// Counts are plain `Cell`s. The handles built on top are `!Send`/`!Sync`,
/// which keeps all mutations on one thread.
pub(crate) struct ControlBlock<T> {
    strong: Cell<usize>,
    weak: Cell<usize>,
    // Owned allocation, separate from the block; cleared when destroyed or
    // moved out.
    value: Cell<Option<NonNull<T>>>,
}

impl<T> ControlBlock<T> {
    /// Allocate a block owning `value`, with one strong and no weak refs.
    pub(crate) fn allocate(value: NonNull<T>) -> NonNull<Self> {
        let block = Box::new(Self {
            strong: Cell::new(1),
            weak: Cell::new(0),
            value: Cell::new(Some(value)),
        });
        NonNull::from(Box::leak(block))
    }

    pub(crate) fn strong_count(&self) -> usize {
        self.strong.get()
    }

    pub(crate) fn weak_count(&self) -> usize {
        self.weak.get()
    }

    /// Whether the managed value still exists.
    pub(crate) fn is_alive(&self) -> bool {
        self.strong.get() > 0
    }

    pub(crate) fn inc_strong(&self) {
        self.strong.set(self.strong.get() + 1);
    }

    pub(crate) fn inc_weak(&self) {
        self.weak.set(self.weak.get() + 1);
    }

    /// Drop one strong reference, destroying the managed value on the
    /// 1 -> 0 transition. The block itself stays allocated until
    /// [`release_if_unreferenced`] observes both counts at 0.
    pub(crate) fn dec_strong(&self) {
        let strong = self.strong.get() - 1;
        self.strong.set(strong);
        if strong == 0 {
            if let Some(value) = self.value.take() {
                trace!("destroying managed value");
                // SAFETY: the pointer came from `Box::into_raw` and `take`
                // cleared the slot, so this is the only release.
                unsafe { drop(Box::from_raw(value.as_ptr())) };
            }
        }
    }

    pub(crate) fn dec_weak(&self) {
        self.weak.set(self.weak.get() - 1);
    }

    /// Move the value out without destroying it. The block reports dead once
    /// the caller also drops its strong reference.
    pub(crate) fn take_value(&self) -> Option<NonNull<T>> {
        self.value.take()
    }

    /// Address of the managed value, `None` once destroyed or moved out.
    pub(crate) fn value_ptr(&self) -> Option<NonNull<T>> {
        self.value.get()
    }
}

/// Free `block` if no handle of either kind references it anymore.
///
/// # Safety
///
/// `block` must come from [`ControlBlock::allocate`], and the caller must
/// already have dropped its own reference, strong or weak.
pub(crate) unsafe fn release_if_unreferenced<T>(block: NonNull<ControlBlock<T>>) {
    let (strong, weak) = {
        // SAFETY: per the contract, the block is still allocated.
        let block = unsafe { block.as_ref() };
        (block.strong_count(), block.weak_count())
    };
    if strong == 0 && weak == 0 {
        trace!("freeing control block");
        // SAFETY: no strong or weak handle is left to observe the block.
        unsafe { drop(Box::from_raw(block.as_ptr())) };
    }
}
