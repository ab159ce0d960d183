use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use crate::arena::NodeArena;
use crate::config::SetConfig;
use crate::error::abort_on_alloc_failure;
use crate::key::{compare_keys, terminated, try_copy_key};
use crate::level::LevelGenerator;
use crate::node::{Entry, NodeId};
use crate::Result;

/// Outcome of inserting a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddKeyResult {
    /// The key was added because it was not already present
    Unique,
    /// The key was already present; the set is unchanged
    Duplicate,
}

impl AddKeyResult {
    pub fn is_unique(self) -> bool {
        self == AddKeyResult::Unique
    }
}

/// Borrowed view of one element, valid while the set is borrowed
#[derive(Debug, PartialEq, Eq)]
pub struct LookupResult<'a, V> {
    pub key: &'a [u8],
    pub length: usize,
    pub data: &'a V,
}

// Only references inside, so copyable whatever V is
impl<V> Clone for LookupResult<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for LookupResult<'_, V> {}

/// An ordered, deduplicating set of byte-string keys, each carrying a value
///
/// Implemented as a skip list over an arena of nodes. Keys are ordered
/// byte-lexicographically, shorter first when one key is a prefix of the
/// other. There is no removal: build a new set (see [`SortedSet::difference`])
/// instead.
///
/// Insertion always takes ownership of the key. When the key is already
/// present the offered key and value are dropped and the stored pair is kept.
pub struct SortedSet<V> {
    arena: NodeArena<V>,
    // Levels in use, head links above this are ignored
    layers: usize,
    len: usize,
    levels: LevelGenerator,
    config: SetConfig,
    // Predecessor trail reused across insertions
    preds: Vec<NodeId>,
}

impl<V> SortedSet<V> {
    /// Create an empty set with the default configuration
    pub fn new() -> Self {
        Self::with_config(SetConfig::default())
    }

    pub fn with_config(config: SetConfig) -> Self {
        Self::try_with_config(config).unwrap_or_else(|err| abort_on_alloc_failure(err))
    }

    pub fn try_with_config(config: SetConfig) -> Result<Self> {
        let arena = NodeArena::with_head(1, 0)?;
        Ok(Self::from_parts(arena, 1, 0, config))
    }

    /// Assemble a set from an already linked arena
    pub(crate) fn from_parts(
        arena: NodeArena<V>,
        layers: usize,
        len: usize,
        config: SetConfig,
    ) -> Self {
        let levels = LevelGenerator::new(config.max_level, config.seed);
        SortedSet {
            arena,
            layers,
            len,
            levels,
            config,
            preds: Vec::new(),
        }
    }

    /// Number of distinct keys in the set
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use (at least 1)
    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn config(&self) -> &SetConfig {
        &self.config
    }

    /// Insert `key`, taking ownership of it
    ///
    /// Aborts the process if memory is exhausted; see [`SortedSet::try_add_key`].
    pub fn add_key(&mut self, key: Vec<u8>, data: V) -> AddKeyResult {
        self.try_add_key(key, data)
            .unwrap_or_else(|err| abort_on_alloc_failure(err))
    }

    /// Insert `key`, taking ownership of it
    ///
    /// On allocation failure the key and value are dropped and the set's
    /// elements and links are left as they were.
    pub fn try_add_key(&mut self, key: Vec<u8>, data: V) -> Result<AddKeyResult> {
        self.try_insert(Cow::Owned(key), data)
    }

    /// Insert a copy of `key`; the copy is only made if the key is new
    pub fn add_key_copy(&mut self, key: &[u8], data: V) -> AddKeyResult {
        self.try_add_key_copy(key, data)
            .unwrap_or_else(|err| abort_on_alloc_failure(err))
    }

    pub fn try_add_key_copy(&mut self, key: &[u8], data: V) -> Result<AddKeyResult> {
        self.try_insert(Cow::Borrowed(key), data)
    }

    /// Insert a copy of each key in the given order
    ///
    /// With `lengths` set, key `i` is `keys[i][..lengths[i]]`. Without it each
    /// key is read up to its first NUL byte. Without `data` every key gets
    /// `V::default()`. Returns how many keys were new.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` or `data` differ in length from `keys`, or if a
    /// length runs past the end of its key.
    pub fn add_keys_copy(
        &mut self,
        keys: &[&[u8]],
        lengths: Option<&[usize]>,
        data: Option<&[V]>,
    ) -> usize
    where
        V: Clone + Default,
    {
        if let Some(lengths) = lengths {
            assert_eq!(lengths.len(), keys.len(), "one length per key");
        }
        if let Some(data) = data {
            assert_eq!(data.len(), keys.len(), "one data value per key");
        }

        let mut added = 0;
        for (i, &key) in keys.iter().enumerate() {
            let key = match lengths {
                Some(lengths) => &key[..lengths[i]],
                None => terminated(key),
            };
            let value = data.map_or_else(V::default, |data| data[i].clone());

            if self.add_key_copy(key, value).is_unique() {
                added += 1;
            }
        }
        added
    }

    fn try_insert(&mut self, key: Cow<'_, [u8]>, data: V) -> Result<AddKeyResult> {
        let mut preds = std::mem::take(&mut self.preds);
        preds.clear();
        preds.try_reserve(self.layers)?;
        preds.resize(self.layers, NodeId::HEAD);

        let result = match self.find(&key, Some(preds.as_mut_slice())) {
            Some(_) => Ok(AddKeyResult::Duplicate),
            None => {
                let new_level = self.levels.next_level();
                self.splice(key, data, &preds, new_level)
                    .map(|_| AddKeyResult::Unique)
            }
        };
        self.preds = preds;
        result
    }

    /// Link a new node of `new_level` after `preds[level]` on each level
    ///
    /// `preds` must cover every level in use. Every allocation happens before
    /// the first link is rewritten, so on error the set is unchanged.
    fn splice(
        &mut self,
        key: Cow<'_, [u8]>,
        data: V,
        preds: &[NodeId],
        new_level: usize,
    ) -> Result<NodeId> {
        self.arena.reserve_head(new_level)?;
        let key = match key {
            Cow::Owned(key) => key,
            Cow::Borrowed(key) => try_copy_key(key)?,
        };
        let new_node = self.arena.allocate(Some(Entry { key, data }), new_level)?;

        // Connect the node at each existing level
        for level in 0..new_level.min(self.layers) {
            let pred = preds[level];
            self.arena[new_node].forward[level] = self.arena[pred].next(level);
            self.arena[pred].forward[level] = Some(new_node);
        }

        // Levels above the old top hang directly off the head
        if new_level > self.layers {
            self.arena.grow_head(new_level)?;
            for level in self.layers..new_level {
                self.arena[NodeId::HEAD].forward[level] = Some(new_node);
            }
            tracing::trace!(from = self.layers, to = new_level, "sorted set grew layers");
            self.layers = new_level;
        }

        self.len += 1;
        Ok(new_node)
    }

    /// Append `key`, which must sort after every key already in the set
    ///
    /// `tails[level]` is the last node on each level and is kept up to date,
    /// so appending needs no search.
    fn try_push_back(&mut self, key: &[u8], data: V, tails: &mut Vec<NodeId>) -> Result<()> {
        debug_assert!(
            self.is_empty() || compare_keys(self.arena[tails[0]].key(), key) == Ordering::Less,
            "appended key out of order"
        );

        let new_level = self.levels.next_level();
        if new_level > tails.len() {
            tails.try_reserve(new_level - tails.len())?;
            tails.resize(new_level, NodeId::HEAD);
        }

        let new_node = self.splice(Cow::Borrowed(key), data, &tails[..], new_level)?;
        for tail in &mut tails[..new_level] {
            *tail = new_node;
        }
        Ok(())
    }

    /// Search from the top layer down
    ///
    /// Returns the node holding `key` if present. Otherwise, when `preds` is
    /// given, `preds[level]` is left holding the last node before `key` on
    /// each level.
    fn find(&self, key: &[u8], mut preds: Option<&mut [NodeId]>) -> Option<NodeId> {
        let mut x = NodeId::HEAD;

        for level in (0..self.layers).rev() {
            while let Some(next) = self.arena[x].next(level) {
                match compare_keys(key, self.arena[next].key()) {
                    Ordering::Greater => x = next,
                    Ordering::Equal => return Some(next),
                    Ordering::Less => break,
                }
            }

            if let Some(preds) = preds.as_deref_mut() {
                preds[level] = x;
            }
        }

        None
    }

    /// Store `entry` in an unfilled slot, returning the next slot on level 0
    pub(crate) fn fill_slot(&mut self, slot: NodeId, entry: Entry<V>) -> Option<NodeId> {
        let node = &mut self.arena[slot];
        debug_assert!(node.entry.is_none(), "slot filled twice");
        node.entry = Some(entry);
        self.len += 1;
        node.next(0)
    }

    pub(crate) fn key_at(&self, id: NodeId) -> &[u8] {
        self.arena[id].key()
    }

    /// Find `key` and borrow its stored key and data
    pub fn lookup(&self, key: &[u8]) -> Option<LookupResult<'_, V>> {
        let id = self.find(key, None)?;
        let entry = self.arena[id].entry.as_ref()?;
        Some(LookupResult {
            key: &entry.key,
            length: entry.key.len(),
            data: &entry.data,
        })
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key, None).is_some()
    }

    /// Visit every element in ascending key order
    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &V),
    {
        for (key, data) in self.iter() {
            f(key, data);
        }
    }

    /// Consume the set, handing each key and value to `f` in ascending order
    pub fn apply_and_destroy<F>(self, mut f: F)
    where
        F: FnMut(Vec<u8>, V),
    {
        for (key, data) in self {
            f(key, data);
        }
    }

    /// Iterate over `(key, data)` in ascending key order
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            arena: &self.arena,
            next: self.arena[NodeId::HEAD].next(0),
            remaining: self.len,
        }
    }

    /// Borrow every key in ascending order
    pub fn flatten_keys(&self) -> Vec<&[u8]> {
        let mut keys = Vec::with_capacity(self.len);
        keys.extend(self.iter().map(|(key, _)| key));
        keys
    }

    /// Tear the set down and return its keys in ascending order
    ///
    /// The values are dropped.
    pub fn into_keys(self) -> Vec<Vec<u8>> {
        let mut keys = Vec::with_capacity(self.len);
        keys.extend(self.into_iter().map(|(key, _)| key));
        keys
    }

    /// Tear the set down and return its `(key, data)` pairs in ascending order
    pub fn into_entries(self) -> Vec<(Vec<u8>, V)> {
        let mut entries = Vec::with_capacity(self.len);
        entries.extend(self);
        entries
    }

    /// The keys of `self` that are not in `other`, with copies of their data
    ///
    /// Neither input is modified. Runs in `O(|self| + |other|)` comparisons.
    pub fn difference<W>(&self, other: &SortedSet<W>) -> SortedSet<V>
    where
        V: Clone,
    {
        self.try_difference(other)
            .unwrap_or_else(|err| abort_on_alloc_failure(err))
    }

    pub fn try_difference<W>(&self, other: &SortedSet<W>) -> Result<SortedSet<V>>
    where
        V: Clone,
    {
        let mut out = SortedSet::try_with_config(self.config.clone())?;
        let mut tails = Vec::new();
        tails.try_reserve(out.layers)?;
        tails.resize(out.layers, NodeId::HEAD);
        let mut theirs = other.iter().peekable();

        'ours: for (key, data) in self.iter() {
            while let Some(&(their_key, _)) = theirs.peek() {
                match compare_keys(key, their_key) {
                    // In both, not in the result
                    Ordering::Equal => {
                        theirs.next();
                        continue 'ours;
                    }
                    // Look at the next key of other
                    Ordering::Greater => {
                        theirs.next();
                    }
                    Ordering::Less => break,
                }
            }

            // Survivors arrive in ascending order
            out.try_push_back(key, data.clone(), &mut tails)?;
        }

        tracing::debug!(
            left = self.len,
            right = other.len,
            result = out.len,
            "computed sorted set difference"
        );
        Ok(out)
    }
}

impl<V> Default for SortedSet<V> {
    fn default() -> Self {
        SortedSet::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for SortedSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, data)| (String::from_utf8_lossy(key), data)))
            .finish()
    }
}

impl<V> Extend<(Vec<u8>, V)> for SortedSet<V> {
    fn extend<I: IntoIterator<Item = (Vec<u8>, V)>>(&mut self, iter: I) {
        for (key, data) in iter {
            self.add_key(key, data);
        }
    }
}

impl<V> FromIterator<(Vec<u8>, V)> for SortedSet<V> {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, V)>>(iter: I) -> Self {
        let mut set = SortedSet::new();
        set.extend(iter);
        set
    }
}

/// Borrowing iterator over a [`SortedSet`], in ascending key order
pub struct Iter<'a, V> {
    arena: &'a NodeArena<V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.next {
            let node = &self.arena[id];
            self.next = node.next(0);

            // Unfilled slots only exist in a maker's tail
            if let Some(entry) = &node.entry {
                self.remaining -= 1;
                return Some((entry.key.as_slice(), &entry.data));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a SortedSet<V> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// Consuming iterator over a [`SortedSet`], in ascending key order
pub struct IntoIter<V> {
    arena: NodeArena<V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (Vec<u8>, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.next {
            let node = &mut self.arena[id];
            self.next = node.next(0);

            if let Some(entry) = node.entry.take() {
                self.remaining -= 1;
                return Some((entry.key, entry.data));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for SortedSet<V> {
    type Item = (Vec<u8>, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        let next = self.arena[NodeId::HEAD].next(0);
        IntoIter {
            arena: self.arena,
            next,
            remaining: self.len,
        }
    }
}

#[cfg(test)]
impl<V> SortedSet<V> {
    /// Walk every level and check ordering, nesting and the element count
    pub(crate) fn assert_well_formed(&self) {
        let head = &self.arena[NodeId::HEAD];
        assert!(head.height() >= self.layers);

        for level in 0..self.layers {
            let mut count = 0;
            let mut prev: Option<&[u8]> = None;
            let mut cursor = head.next(level);

            while let Some(id) = cursor {
                let node = &self.arena[id];
                assert!(node.entry.is_some(), "unfilled node reachable");
                assert!(node.height() > level, "node linked above its height");
                if let Some(prev) = prev {
                    assert_eq!(compare_keys(prev, node.key()), Ordering::Less);
                }
                prev = Some(node.key());
                count += 1;
                cursor = node.next(level);
            }

            if level == 0 {
                assert_eq!(count, self.len);
            }
        }
    }

    /// Number of nodes linked on `level`
    pub(crate) fn level_len(&self, level: usize) -> usize {
        let mut count = 0;
        let mut cursor = self.arena[NodeId::HEAD].next(level);
        while let Some(id) = cursor {
            count += 1;
            cursor = self.arena[id].next(level);
        }
        count
    }
}
