#![doc = include_str!("../README.md")]

mod dict;
mod error;
mod hash;
mod raw;
mod snapshot;

#[cfg(feature = "serde")]
mod serde_impls;

pub use dict::{Dictionary, DictionaryBuilder, IntoIter, Iter, Keys, Values};
pub use error::Error;
pub use hash::{avalanche, home_index, HashMode, Hashable, Sdbm};
pub use raw::{HOP_RANGE, MIN_CAPACITY};
pub use snapshot::SnapshotIterator;
