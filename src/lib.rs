//! An ordered, deduplicating set of byte-string keys built on a skip list.
//!
//! Sets are built either one key at a time with [`SortedSet::add_key`], in
//! any order, or from keys that are already sorted and counted with a
//! [`SortedSetMaker`], which lays out the whole skip list deterministically
//! and fills it in a single pass.
//!
//! ```
//! use keyset::{SortedSet, SortedSetMaker};
//!
//! let mut required = SortedSet::new();
//! required.add_key_copy(b"VK_KHR_swapchain", ());
//! required.add_key_copy(b"VK_KHR_surface", ());
//!
//! let mut maker = SortedSetMaker::new(1);
//! maker.add_key_copy(b"VK_KHR_surface", ());
//! let available = maker.finalize();
//!
//! let missing = required.difference(&available);
//! assert_eq!(missing.flatten_keys(), vec![&b"VK_KHR_swapchain"[..]]);
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod maker;
pub mod requirements;
pub mod sorted_set;

mod arena;
mod level;
mod node;

pub use config::{SetConfig, SetConfigBuilder};
pub use error::{Result, SetError};
pub use maker::SortedSetMaker;
pub use sorted_set::{AddKeyResult, IntoIter, Iter, LookupResult, SortedSet};
