use std::cmp::Ordering;

use geo_traits::CoordTrait;

use crate::error::{KDTreeError, Result};
use crate::kdtree::index::{KDNode, NodeCoords, Point};
use crate::kdtree::KDTree;
use crate::r#type::IndexableNum;

/// A builder to create a [`KDTree`].
///
/// Points are validated and copied as they are added, so the caller's data is free to change or
/// be dropped afterwards.
#[derive(Debug, Clone)]
pub struct KDTreeBuilder<N: IndexableNum> {
    /// Interleaved coordinates, `num_dims` values per point in insertion order.
    coords: Vec<N>,
    ids: Vec<i64>,
    num_dims: usize,
}

impl<N: IndexableNum> KDTreeBuilder<N> {
    /// Create a new builder for points with `num_dims` coordinates each.
    pub fn new(num_dims: usize) -> Result<Self> {
        Self::new_with_capacity(num_dims, 0)
    }

    /// Create a new builder, reserving space for `num_items` points up front.
    pub fn new_with_capacity(num_dims: usize, num_items: usize) -> Result<Self> {
        if num_dims == 0 {
            return Err(KDTreeError::InvalidDimensions);
        }

        Ok(Self {
            coords: Vec::with_capacity(num_items * num_dims),
            ids: Vec::with_capacity(num_items),
            num_dims,
        })
    }

    /// The number of dimensions every added point must have.
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    /// The number of points added so far.
    pub fn num_items(&self) -> usize {
        self.ids.len()
    }

    /// Add a point to the index, returning its insertion index.
    ///
    /// Fails without modifying the builder if `coords` does not have exactly
    /// [`num_dims`][Self::num_dims] values or contains a non-finite value.
    pub fn add(&mut self, id: i64, coords: &[N]) -> Result<usize> {
        if coords.len() != self.num_dims {
            return Err(KDTreeError::DimensionMismatch {
                expected: self.num_dims,
                actual: coords.len(),
            });
        }
        if let Some(axis) = coords.iter().position(|c| !c.is_finite()) {
            return Err(KDTreeError::NonFiniteCoordinate { id, axis });
        }

        let index = self.ids.len();
        self.ids.push(id);
        self.coords.extend_from_slice(coords);
        Ok(index)
    }

    /// Add a [`Point`] to the index, returning its insertion index.
    pub fn add_point(&mut self, point: &Point<N>) -> Result<usize> {
        self.add(point.id, &point.coords)
    }

    /// Add a point from any [`CoordTrait`] implementation, returning its insertion index.
    ///
    /// The coordinate's dimension (2 for XY, 3 for XYZ or XYM, 4 for XYZM) must match the
    /// builder's.
    pub fn add_coord(&mut self, id: i64, coord: &impl CoordTrait<T = N>) -> Result<usize> {
        let coords: NodeCoords<N> = (0..coord.dim().size())
            .map(|n| coord.nth_or_panic(n))
            .collect();
        self.add(id, &coords)
    }

    /// Consume this builder, performing the median partition and producing a [`KDTree`] ready
    /// for queries.
    pub fn finish(self) -> KDTree<N> {
        let num_items = self.ids.len();

        // Sorting a permutation keeps the insertion order intact for stable tie-breaking.
        let mut order: Vec<usize> = (0..num_items).collect();
        let root = build_node(&self, &mut order, 0);

        let tree = KDTree {
            root,
            num_dims: self.num_dims,
            num_items,
        };
        tracing::debug!(
            num_items,
            num_dims = self.num_dims,
            height = tree_height(tree.root.as_deref()),
            "built kd-tree"
        );
        tree
    }

    #[inline]
    fn coord(&self, index: usize, axis: usize) -> N {
        self.coords[index * self.num_dims + axis]
    }

    #[inline]
    fn point_coords(&self, index: usize) -> &[N] {
        let start = index * self.num_dims;
        &self.coords[start..start + self.num_dims]
    }
}

/// Recursively build the subtree for the points referenced by `order` at the given depth.
fn build_node<N: IndexableNum>(
    builder: &KDTreeBuilder<N>,
    order: &mut [usize],
    depth: usize,
) -> Option<Box<KDNode<N>>> {
    if order.is_empty() {
        return None;
    }

    let axis = depth % builder.num_dims;

    // `sort_by` is stable, so points tied on this axis stay in insertion order.
    order.sort_by(|&a, &b| compare_on_axis(builder.coord(a, axis), builder.coord(b, axis)));

    let median = order.len() / 2;
    let index = order[median];
    let (left, rest) = order.split_at_mut(median);
    let right = &mut rest[1..];

    Some(Box::new(KDNode {
        id: builder.ids[index],
        coords: builder.point_coords(index).iter().copied().collect(),
        left: build_node(builder, left, depth + 1),
        right: build_node(builder, right, depth + 1),
    }))
}

/// Coordinates are checked to be finite when added, so this is a total order.
#[inline]
fn compare_on_axis<N: IndexableNum>(a: N, b: N) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

pub(crate) fn tree_height<N: IndexableNum>(node: Option<&KDNode<N>>) -> usize {
    match node {
        Some(node) => {
            1 + tree_height(node.left.as_deref()).max(tree_height(node.right.as_deref()))
        }
        None => 0,
    }
}
