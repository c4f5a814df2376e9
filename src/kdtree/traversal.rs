//! Utilities to traverse the KDTree structure.

use crate::kdtree::index::KDNode;
use crate::r#type::IndexableNum;

/// A read-only view onto one node of a [`KDTree`][crate::kdtree::KDTree].
///
/// A node knows its depth, and therefore the axis it splits on, so the subtree below it can be
/// queried on its own through [`KDTreeIndex`][crate::kdtree::KDTreeIndex].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a, N: IndexableNum> {
    node: &'a KDNode<N>,
    depth: usize,
    pub(crate) num_dims: usize,
}

impl<'a, N: IndexableNum> Node<'a, N> {
    pub(crate) fn new(node: &'a KDNode<N>, depth: usize, num_dims: usize) -> Self {
        Self {
            node,
            depth,
            num_dims,
        }
    }

    pub(crate) fn inner(&self) -> &'a KDNode<N> {
        self.node
    }

    /// The id of the point stored at this node.
    pub fn id(&self) -> i64 {
        self.node.id
    }

    /// The coordinates of the point stored at this node.
    pub fn coords(&self) -> &'a [N] {
        &self.node.coords
    }

    /// The depth of this node. The root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The axis that the children of this node are split over.
    #[inline]
    pub fn axis(&self) -> usize {
        self.depth % self.num_dims
    }

    /// The child node holding points at or below this node's value on [`axis`][Self::axis].
    pub fn left_child(&self) -> Option<Node<'a, N>> {
        self.node
            .left
            .as_deref()
            .map(|node| Node::new(node, self.depth + 1, self.num_dims))
    }

    /// The child node holding points at or above this node's value on [`axis`][Self::axis].
    pub fn right_child(&self) -> Option<Node<'a, N>> {
        self.node
            .right
            .as_deref()
            .map(|node| Node::new(node, self.depth + 1, self.num_dims))
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}
