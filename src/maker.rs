//! Bulk construction of a [`SortedSet`] from sorted input of known size.
//!
//! The maker allocates and links every node up front, choosing each node's
//! level from its position alone, so filling it needs neither random draws
//! nor key comparisons beyond the ordering check on the previous key.

use std::cmp::Ordering;

use crate::arena::NodeArena;
use crate::config::SetConfig;
use crate::error::abort_on_alloc_failure;
use crate::key::{compare_keys, try_copy_key};
use crate::level::{maker_layers, maker_level};
use crate::node::{Entry, NodeId};
use crate::sorted_set::SortedSet;
use crate::Result;

// floor(log2(n)) never exceeds this
const MAX_MAKER_LAYERS: usize = usize::BITS as usize;

/// Builds a [`SortedSet`] of exactly `n` keys supplied in ascending order
///
/// Dropping an unfinished maker releases every pre-allocated node along with
/// the keys filled so far; [`SortedSetMaker::into_keys`] hands those keys back
/// instead.
#[derive(Debug)]
pub struct SortedSetMaker<V> {
    set: SortedSet<V>,
    // Next unfilled slot, None once complete
    cursor: Option<NodeId>,
    // Most recently filled slot, for the ordering check
    last: Option<NodeId>,
    capacity: usize,
}

impl<V> SortedSetMaker<V> {
    /// Create a maker for `n` keys with the default configuration
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(n: usize) -> Self {
        Self::with_config(n, SetConfig::default())
    }

    pub fn with_config(n: usize, config: SetConfig) -> Self {
        Self::try_with_config(n, config).unwrap_or_else(|err| abort_on_alloc_failure(err))
    }

    /// Allocate and link the skeleton for `n` keys
    ///
    /// With `L = floor(log2(n))` layers, slot `i` sits on level
    /// `min(trailing_zeros(i) + 1, L)` and slot 0 on level `L`, so each layer
    /// up holds half the slots of the one below.
    pub fn try_with_config(n: usize, config: SetConfig) -> Result<Self> {
        assert!(n > 0, "a sorted set maker needs at least one key");

        let layers = maker_layers(n);
        let mut arena = NodeArena::with_head(layers, n)?;

        // Last node linked on each level so far
        let mut tails = [NodeId::HEAD; MAX_MAKER_LAYERS];

        for index in 0..n {
            let level = maker_level(index, layers);
            let node = arena.allocate(None, level)?;

            for (layer, tail) in tails.iter_mut().enumerate().take(level) {
                arena[*tail].forward[layer] = Some(node);
                *tail = node;
            }
        }

        let cursor = arena[NodeId::HEAD].next(0);
        tracing::trace!(keys = n, layers, "built sorted set skeleton");

        Ok(SortedSetMaker {
            set: SortedSet::from_parts(arena, layers, 0, config),
            cursor,
            last: None,
            capacity: n,
        })
    }

    /// Fill the next slot, taking ownership of `key`
    ///
    /// Returns `true` once every slot is filled.
    ///
    /// # Panics
    ///
    /// Panics if the maker is already complete, or if `key` is not strictly
    /// greater than the previously added key. Equal neighbours are rejected
    /// too, even though sorted input with repeats would otherwise be valid,
    /// because a repeat would leave the finished set with a duplicate key.
    pub fn add_key(&mut self, key: Vec<u8>, data: V) -> bool {
        let Some(slot) = self.cursor else {
            panic!(
                "sorted set maker is already complete ({} keys)",
                self.capacity
            );
        };

        if let Some(last) = self.last {
            assert!(
                compare_keys(self.set.key_at(last), &key) == Ordering::Less,
                "keys must be added to a sorted set maker in strictly ascending order"
            );
        }

        self.cursor = self.set.fill_slot(slot, Entry { key, data });
        self.last = Some(slot);
        self.cursor.is_none()
    }

    /// Fill the next slot with a copy of `key`
    pub fn add_key_copy(&mut self, key: &[u8], data: V) -> bool {
        let key = try_copy_key(key).unwrap_or_else(|err| abort_on_alloc_failure(err));
        self.add_key(key, data)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_none()
    }

    /// Slots still waiting for a key
    pub fn remaining(&self) -> usize {
        self.capacity - self.set.len()
    }

    /// Number of keys this maker was created for
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hand back the finished set
    ///
    /// # Panics
    ///
    /// Panics unless every slot has been filled.
    pub fn finalize(self) -> SortedSet<V> {
        assert!(
            self.is_complete(),
            "finalized a sorted set maker with {} of {} keys",
            self.set.len(),
            self.capacity
        );
        tracing::debug!(
            keys = self.capacity,
            layers = self.set.layers(),
            "finalized sorted set maker"
        );
        self.set
    }

    /// Release the maker, returning the keys added so far in order
    pub fn into_keys(self) -> Vec<Vec<u8>> {
        self.set.into_keys()
    }
}
