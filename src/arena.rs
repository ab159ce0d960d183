use std::ops::{Index, IndexMut};

use crate::Result;
use crate::node::{Entry, Node, NodeId};

/// Owner of every node in a set, addressed by [`NodeId`]
///
/// Nodes are never freed individually: the set has no removal, so the whole
/// arena is released at once when the set is dropped or consumed.
#[derive(Debug)]
pub(crate) struct NodeArena<V> {
    nodes: Vec<Node<V>>,
}

impl<V> NodeArena<V> {
    /// Create an arena holding only the head sentinel with `head_height` links
    pub(crate) fn with_head(head_height: usize, capacity: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity.saturating_add(1))?;
        nodes.push(Node {
            entry: None,
            forward: empty_links(head_height)?,
        });

        Ok(NodeArena { nodes })
    }

    /// Allocate a node with the given height, all links unset
    ///
    /// The node is unreachable until the caller splices it into a chain.
    pub(crate) fn allocate(&mut self, entry: Option<Entry<V>>, height: usize) -> Result<NodeId> {
        let forward = empty_links(height)?;
        self.nodes.try_reserve(1)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { entry, forward });
        Ok(id)
    }

    /// Make room for the head sentinel to reach `height` links
    ///
    /// Leaves the head's links as they are, so it can run before any other
    /// fallible step of an insertion.
    pub(crate) fn reserve_head(&mut self, height: usize) -> Result<()> {
        let head = &mut self.nodes[NodeId::HEAD.0].forward;
        if height > head.len() {
            head.try_reserve_exact(height - head.len())?;
        }
        Ok(())
    }

    /// Grow the head sentinel to `height` links, new links unset
    ///
    /// Does not allocate after a matching [`NodeArena::reserve_head`].
    pub(crate) fn grow_head(&mut self, height: usize) -> Result<()> {
        self.reserve_head(height)?;
        let head = &mut self.nodes[NodeId::HEAD.0].forward;
        if height > head.len() {
            head.resize(height, None);
        }
        Ok(())
    }

    /// Number of nodes, head sentinel included
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl<V> Index<NodeId> for NodeArena<V> {
    type Output = Node<V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }
}

impl<V> IndexMut<NodeId> for NodeArena<V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }
}

fn empty_links(height: usize) -> Result<Vec<Option<NodeId>>> {
    let mut forward = Vec::new();
    forward.try_reserve_exact(height)?;
    forward.resize(height, None);
    Ok(forward)
}
