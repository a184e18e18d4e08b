// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic append-only, id-indexed tree storage.

use alloc::vec::Vec;

/// Index of a node within one property tree.
pub type NodeId = u32;

/// Sentinel value meaning "no node".
pub const INVALID_NODE: NodeId = u32::MAX;

/// Id of the root node of every non-empty tree.
pub const ROOT_NODE: NodeId = 0;

/// A node in a [`PropertyTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node<T> {
    /// This node's index in its tree.
    pub id: NodeId,
    /// Parent index, or [`INVALID_NODE`] for the root.
    pub parent_id: NodeId,
    /// Numeric id of the layer that caused this node to be created.
    pub owner_id: u32,
    /// Tree-specific derived data.
    pub data: T,
}

/// A growable, id-indexed sequence of nodes where every parent precedes its
/// children.
///
/// Nodes are append-only; the only way to remove nodes is [`clear`](Self::clear).
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTree<T> {
    nodes: Vec<Node<T>>,
    needs_update: bool,
}

impl<T> Default for PropertyTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PropertyTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            needs_update: false,
        }
    }

    /// Appends a node under `parent_id` and returns its id.
    ///
    /// The first node inserted into an empty tree must use
    /// [`INVALID_NODE`] as its parent and becomes [`ROOT_NODE`].
    ///
    /// # Panics
    ///
    /// Panics if `parent_id` does not name an existing node (or, for the
    /// first node, is not [`INVALID_NODE`]).
    pub fn insert(&mut self, data: T, parent_id: NodeId, owner_id: u32) -> NodeId {
        let id = self.next_available_id();
        assert!(id != INVALID_NODE, "property tree is full");
        if self.nodes.is_empty() {
            assert!(
                parent_id == INVALID_NODE,
                "root node cannot have a parent (got {parent_id})"
            );
        } else {
            assert!(
                parent_id < id,
                "parent id {parent_id} out of range (len {id})"
            );
        }
        self.nodes.push(Node {
            id,
            parent_id,
            owner_id,
            data,
        });
        id
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        assert!(
            (id as usize) < self.nodes.len(),
            "node id {id} out of range (len {})",
            self.nodes.len()
        );
        &self.nodes[id as usize]
    }

    /// Returns the node with the given id mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        assert!(
            (id as usize) < self.nodes.len(),
            "node id {id} out of range (len {})",
            self.nodes.len()
        );
        &mut self.nodes[id as usize]
    }

    /// Returns the parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<&Node<T>> {
        let parent_id = self.node(id).parent_id;
        (parent_id != INVALID_NODE).then(|| self.node(parent_id))
    }

    /// Returns the most recently inserted node.
    #[must_use]
    pub fn back(&self) -> Option<&Node<T>> {
        self.nodes.last()
    }

    /// The id the next [`insert`](Self::insert) will hand out.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "insert keeps the node count below INVALID_NODE"
    )]
    pub fn next_available_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` names a node in this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        (id as usize) < self.nodes.len()
    }

    /// Iterates over nodes in id order (parents before children).
    pub fn iter(&self) -> core::slice::Iter<'_, Node<T>> {
        self.nodes.iter()
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Whether derived per-node data still has to be computed by a later pass.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Sets the deferred-update flag.
    pub fn set_needs_update(&mut self, needs_update: bool) {
        self.needs_update = needs_update;
    }
}

impl<'a, T> IntoIterator for &'a PropertyTree<T> {
    type Item = &'a Node<T>;
    type IntoIter = core::slice::Iter<'a, Node<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_is_root() {
        let mut tree = PropertyTree::<u8>::new();
        assert_eq!(tree.insert(1, INVALID_NODE, 7), ROOT_NODE);
        assert_eq!(tree.insert(2, ROOT_NODE, 8), 1);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(1).owner_id, 8);
        assert_eq!(tree.parent(1).map(|n| n.id), Some(ROOT_NODE));
        assert!(tree.parent(ROOT_NODE).is_none());
        assert_eq!(tree.next_available_id(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut tree = PropertyTree::<u8>::new();
        tree.insert(1, INVALID_NODE, 0);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.next_available_id(), ROOT_NODE);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn parent_must_exist() {
        let mut tree = PropertyTree::<u8>::new();
        tree.insert(1, INVALID_NODE, 0);
        tree.insert(2, 5, 0);
    }

    #[test]
    #[should_panic(expected = "root node cannot have a parent")]
    fn root_has_no_parent() {
        let mut tree = PropertyTree::<u8>::new();
        tree.insert(1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "node id 3 out of range")]
    fn lookup_out_of_range() {
        let tree = PropertyTree::<u8>::new();
        let _ = tree.node(3);
    }
}
