/// Handle of a node inside a [`NodeArena`](crate::arena::NodeArena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

impl NodeId {
    // The head sentinel is always the first node allocated
    pub(crate) const HEAD: NodeId = NodeId(0);
}

/// Key and caller data carried by a filled node
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Vec<u8>,
    pub(crate) data: V,
}

/// A skip-list node
#[derive(Debug)]
pub(crate) struct Node<V> {
    // None for the head sentinel and for maker slots not filled yet
    pub(crate) entry: Option<Entry<V>>,
    // One successor per level, forward.len() is the node's level
    pub(crate) forward: Vec<Option<NodeId>>,
}

impl<V> Node<V> {
    /// Number of levels this node participates in
    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }

    /// Key bytes, empty for the head sentinel or an unfilled slot
    #[inline]
    pub(crate) fn key(&self) -> &[u8] {
        match &self.entry {
            Some(entry) => &entry.key,
            None => &[],
        }
    }

    #[inline]
    pub(crate) fn next(&self, level: usize) -> Option<NodeId> {
        self.forward[level]
    }
}
