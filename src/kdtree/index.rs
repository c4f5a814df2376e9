use tinyvec::TinyVec;

use crate::error::{KDTreeError, Result};
use crate::kdtree::KDTreeBuilder;
use crate::r#type::IndexableNum;

/// Inline storage for node coordinates. Trees of up to four dimensions never allocate per node
/// for coordinates.
pub(crate) type NodeCoords<N> = TinyVec<[N; 4]>;

/// An input point: an identifier plus its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<N: IndexableNum> {
    /// Identifier returned by neighbor queries.
    pub id: i64,
    /// One coordinate per dimension.
    pub coords: Vec<N>,
}

impl<N: IndexableNum> Point<N> {
    /// Create a new point.
    pub fn new(id: i64, coords: Vec<N>) -> Self {
        Self { id, coords }
    }
}

/// A single node of a [`KDTree`].
///
/// Each node owns a copy of its point's coordinates and exclusively owns both subtrees.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KDNode<N: IndexableNum> {
    pub(crate) id: i64,
    pub(crate) coords: NodeCoords<N>,
    pub(crate) left: Option<Box<KDNode<N>>>,
    pub(crate) right: Option<Box<KDNode<N>>>,
}

impl<N: IndexableNum> KDNode<N> {
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn num_items(&self) -> usize {
        1 + self.left.as_deref().map_or(0, KDNode::num_items)
            + self.right.as_deref().map_or(0, KDNode::num_items)
    }
}

/// An owned, immutable K-D Tree.
///
/// Usually this will be created via [`KDTreeBuilder`] or [`KDTree::build`]. Once built, the tree
/// cannot be modified, so any number of threads may query it at once. Dropping the tree releases
/// every node.
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<N: IndexableNum> {
    pub(crate) root: Option<Box<KDNode<N>>>,
    pub(crate) num_dims: usize,
    pub(crate) num_items: usize,
}

impl<N: IndexableNum> KDTree<N> {
    /// Build a tree from a slice of points with `num_dims` coordinates each.
    ///
    /// Every point is validated before construction starts. An empty slice produces an empty
    /// tree. The input slice is not modified.
    ///
    /// ```
    /// use kdtree_knn::kdtree::{KDTree, KDTreeIndex, Point};
    ///
    /// let points = vec![
    ///     Point::new(1, vec![2., 3.]),
    ///     Point::new(2, vec![5., 4.]),
    ///     Point::new(3, vec![9., 6.]),
    /// ];
    /// let tree = KDTree::build(&points, 2).unwrap();
    /// assert_eq!(tree.num_items(), 3);
    /// ```
    pub fn build(points: &[Point<N>], num_dims: usize) -> Result<Self> {
        let mut builder = KDTreeBuilder::new_with_capacity(num_dims, points.len())?;
        for point in points {
            builder.add_point(point)?;
        }
        Ok(builder.finish())
    }

    /// Build a tree, taking the number of dimensions from the first point.
    ///
    /// Returns an error for an empty slice, because there is nothing to infer the number of
    /// dimensions from; use [`KDTree::build`] or [`KDTree::empty`] instead.
    pub fn build_inferred(points: &[Point<N>]) -> Result<Self> {
        let first = points.first().ok_or_else(|| {
            KDTreeError::General("Cannot infer dimensions from an empty point set.".to_string())
        })?;
        Self::build(points, first.coords.len())
    }

    /// An empty tree with the given number of dimensions.
    pub fn empty(num_dims: usize) -> Result<Self> {
        Ok(KDTreeBuilder::new(num_dims)?.finish())
    }

    /// Returns `true` if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}
