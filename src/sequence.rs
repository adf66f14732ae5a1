use std::fmt;

use crate::{
    error::OutOfRange,
    exclusive::ExclusiveOwner,
    list::{Iter, SinglyLinkedList},
};

/// Positional container capability.
///
/// Callers program against this interface and stay independent of the
/// backing store; [`ListSequence`] is the linked-list backing, and the
/// operations are written so other backings can implement the same set.
/// Results that hand over a whole container do so through an
/// [`ExclusiveOwner`], transferring ownership to the caller.
///
/// Positions are zero-based. Every bounds violation is reported as
/// [`OutOfRange`], never clamped.
pub trait Sequence<T: Clone> {
    /// Add `item` after the last element.
    fn append(&mut self, item: T);

    /// Add `item` before the first element.
    fn prepend(&mut self, item: T);

    /// Insert `item` so it ends up at position `index`.
    ///
    /// `index == len` appends; anything past that fails.
    fn insert_at(&mut self, item: T, index: usize) -> Result<(), OutOfRange>;

    /// Borrow the first element; fails on an empty sequence.
    fn first(&self) -> Result<&T, OutOfRange>;

    /// Borrow the last element; fails on an empty sequence.
    fn last(&self) -> Result<&T, OutOfRange>;

    /// Borrow the element at `index`; fails outside `[0, len)`.
    fn get(&self, index: usize) -> Result<&T, OutOfRange>;

    /// Copy the inclusive positional range `[start, end]` into a new,
    /// independently owned sequence.
    ///
    /// Fails when `end` is past the last element or `start > end`.
    fn subsequence(&self, start: usize, end: usize)
        -> Result<ExclusiveOwner<dyn Sequence<T>>, OutOfRange>;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the sequence holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`Sequence`] backed by a [`SinglyLinkedList`].
///
/// The sequence owns its backing list exclusively; copies are deep, so no
/// list is ever shared between two sequences.
pub struct ListSequence<T> {
    list: ExclusiveOwner<SinglyLinkedList<T>>,
}

impl<T> ListSequence<T> {
    /// An empty sequence over a fresh list.
    pub fn new() -> Self {
        Self {
            list: ExclusiveOwner::new(SinglyLinkedList::new()),
        }
    }

    /// Iterate over the elements front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        self.list().iter()
    }

    fn list(&self) -> &SinglyLinkedList<T> {
        match self.list.get() {
            Some(list) => list,
            None => unreachable!("a sequence always owns its list"),
        }
    }

    fn list_mut(&mut self) -> &mut SinglyLinkedList<T> {
        match self.list.get_mut() {
            Some(list) => list,
            None => unreachable!("a sequence always owns its list"),
        }
    }
}

impl<T: Clone + 'static> Sequence<T> for ListSequence<T> {
    fn append(&mut self, item: T) {
        self.list_mut().push_back(item);
    }

    fn prepend(&mut self, item: T) {
        self.list_mut().push_front(item);
    }

    fn insert_at(&mut self, item: T, index: usize) -> Result<(), OutOfRange> {
        self.list_mut().insert_at(item, index)
    }

    fn first(&self) -> Result<&T, OutOfRange> {
        self.list().first()
    }

    fn last(&self) -> Result<&T, OutOfRange> {
        self.list().last()
    }

    fn get(&self, index: usize) -> Result<&T, OutOfRange> {
        self.list().get(index)
    }

    fn subsequence(
        &self,
        start: usize,
        end: usize,
    ) -> Result<ExclusiveOwner<dyn Sequence<T>>, OutOfRange> {
        let sub = self.list().sublist(start, end)?;
        Ok(ExclusiveOwner::from_box(
            Box::new(ListSequence::from(sub)) as Box<dyn Sequence<T>>
        ))
    }

    fn len(&self) -> usize {
        self.list().len()
    }
}

impl<T> Default for ListSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ListSequence<T> {
    fn clone(&self) -> Self {
        SinglyLinkedList::clone(self.list()).into()
    }
}

impl<T> From<SinglyLinkedList<T>> for ListSequence<T> {
    fn from(list: SinglyLinkedList<T>) -> Self {
        Self {
            list: ExclusiveOwner::new(list),
        }
    }
}

impl<T: Clone> From<&[T]> for ListSequence<T> {
    fn from(items: &[T]) -> Self {
        SinglyLinkedList::from(items).into()
    }
}

impl<T> FromIterator<T> for ListSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<SinglyLinkedList<T>>().into()
    }
}

impl<'a, T> IntoIterator for &'a ListSequence<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for ListSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.list(), f)
    }
}
