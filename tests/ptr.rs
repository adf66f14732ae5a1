use std::{cell::Cell, rc::Rc};

use custody::{ExclusiveOwner, Expired, SharedOwner, WeakObserver};

// Counts drops so the tests can observe exactly-once destruction.
struct DropProbe {
    drops: Rc<Cell<usize>>,
}

impl DropProbe {
    fn new(drops: &Rc<Cell<usize>>) -> Self {
        Self {
            drops: drops.clone(),
        }
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn shared_clone_bumps_refcount() {
    let first = SharedOwner::new(5);
    assert!(!first.as_ptr().is_null());
    assert_eq!(*first, 5);
    assert_eq!(first.strong_count(), 1);

    let second = first.clone();
    assert!(first.ptr_eq(&second));
    assert_eq!(*second, 5);
    assert_eq!(first.strong_count(), 2);

    let third = second.clone();
    assert_eq!(first.strong_count(), 3);

    drop(second);
    assert_eq!(first.strong_count(), 2);
    drop(third);
    assert_eq!(first.strong_count(), 1);
}

#[test]
fn shared_destroys_value_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let first = SharedOwner::new(DropProbe::new(&drops));
    let second = first.clone();
    let third = second.clone();

    drop(first);
    drop(second);
    assert_eq!(drops.get(), 0);

    drop(third);
    assert_eq!(drops.get(), 1);
}

#[test]
fn shared_self_assignment_is_noop() {
    let drops = Rc::new(Cell::new(0));
    let mut owner = SharedOwner::new(DropProbe::new(&drops));
    let alias = owner.clone();

    owner.clone_from(&alias);
    assert_eq!(owner.strong_count(), 2);
    assert_eq!(drops.get(), 0);

    drop(alias);
    assert_eq!(owner.strong_count(), 1);
    drop(owner);
    assert_eq!(drops.get(), 1);
}

#[test]
fn clone_from_releases_the_previous_target() {
    let old_drops = Rc::new(Cell::new(0));
    let new_drops = Rc::new(Cell::new(0));
    let mut owner = SharedOwner::new(DropProbe::new(&old_drops));
    let replacement = SharedOwner::new(DropProbe::new(&new_drops));

    owner.clone_from(&replacement);
    assert_eq!(old_drops.get(), 1);
    assert_eq!(new_drops.get(), 0);
    assert_eq!(replacement.strong_count(), 2);
    assert!(owner.ptr_eq(&replacement));
}

#[test]
fn weak_expires_with_the_last_strong() {
    let mut observer = WeakObserver::new();
    let mut second_observer = WeakObserver::new();
    assert!(observer.expired());

    {
        let owner = SharedOwner::new(10);
        observer = owner.downgrade();
        second_observer = owner.downgrade();
        assert_eq!(owner.weak_count(), 2);
        assert!(!observer.expired());
        assert_eq!(*observer.upgrade().unwrap(), 10);
        assert_eq!(*second_observer.upgrade().unwrap(), 10);
    }

    assert!(observer.expired());
    assert!(second_observer.expired());
    assert_eq!(observer.upgrade().unwrap_err(), Expired);
    assert_eq!(observer.strong_count(), 0);
}

#[test]
fn upgrade_extends_the_lifetime() {
    let drops = Rc::new(Cell::new(0));
    let owner = SharedOwner::new(DropProbe::new(&drops));
    let observer = owner.downgrade();
    let upgraded = observer.upgrade().unwrap();

    drop(owner);
    assert_eq!(drops.get(), 0);
    assert!(!observer.expired());

    drop(upgraded);
    assert_eq!(drops.get(), 1);
    assert!(observer.expired());
}

#[test]
fn observers_never_keep_the_value_alive() {
    let drops = Rc::new(Cell::new(0));
    let owner = SharedOwner::new(DropProbe::new(&drops));
    let observer = owner.downgrade();
    let clone = observer.clone();

    drop(owner);
    assert_eq!(drops.get(), 1);
    assert!(observer.expired());
    assert!(clone.expired());
}

#[test]
fn exclusive_take_leaves_nothing_to_release() {
    let drops = Rc::new(Cell::new(0));
    let mut first = ExclusiveOwner::new(DropProbe::new(&drops));
    assert!(!first.as_ptr().is_null());

    let second = first.take();
    assert!(first.is_empty());
    assert!(first.get().is_none());
    assert!(first.as_ptr().is_null());

    drop(first);
    assert_eq!(drops.get(), 0);
    drop(second);
    assert_eq!(drops.get(), 1);
}

#[test]
fn exclusive_into_inner() {
    let owner = ExclusiveOwner::new(15);
    assert_eq!(*owner, 15);
    assert_eq!(owner.into_inner(), Some(15));
    assert_eq!(ExclusiveOwner::<i32>::empty().into_inner(), None);
}

#[test]
fn exclusive_raw_round_trip() {
    let raw = ExclusiveOwner::new(7).into_raw();
    let owner = unsafe { ExclusiveOwner::from_raw(raw) };
    assert_eq!(*owner, 7);
}

#[test]
fn exclusive_mutation_through_the_handle() {
    let mut owner = ExclusiveOwner::new(vec![1, 2]);
    owner.push(3);
    assert_eq!(owner.get(), Some(&vec![1, 2, 3]));
}

#[test]
fn try_unwrap_requires_sole_ownership() {
    let owner = SharedOwner::new(1);
    let keeper = owner.clone();
    let owner = owner.try_unwrap().unwrap_err();
    assert_eq!(owner.strong_count(), 2);

    drop(keeper);
    assert_eq!(owner.try_unwrap().unwrap(), 1);
}

#[test]
fn try_unwrap_expires_observers() {
    let owner = SharedOwner::new(2);
    let observer = owner.downgrade();
    assert_eq!(owner.try_unwrap().unwrap(), 2);
    assert!(observer.expired());
    assert_eq!(observer.upgrade().unwrap_err(), Expired);
}

#[test]
fn reset_drops_the_last_reference() {
    let drops = Rc::new(Cell::new(0));
    let mut owner = SharedOwner::new(DropProbe::new(&drops));
    owner.reset();
    assert!(owner.is_empty());
    assert_eq!(owner.strong_count(), 0);
    assert_eq!(drops.get(), 1);
}

#[test]
fn empty_handles_are_inert() {
    let owner = SharedOwner::<i32>::default();
    assert!(owner.is_empty());
    assert!(owner.get().is_none());
    assert!(owner.as_ptr().is_null());
    assert_eq!(owner.strong_count(), 0);
    assert_eq!(owner.weak_count(), 0);

    let observer = owner.downgrade();
    assert!(observer.expired());
    assert_eq!(observer.upgrade().unwrap_err(), Expired);
}
