//!
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod control;
mod error;
mod exclusive;
mod list;
mod log;
mod sequence;
mod shared;
mod weak;

pub use error::{Expired, OutOfRange};
pub use exclusive::ExclusiveOwner;
pub use list::{Iter, SinglyLinkedList};
pub use sequence::{ListSequence, Sequence};
pub use shared::SharedOwner;
pub use weak::WeakObserver;
