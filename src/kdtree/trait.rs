use geo_traits::CoordTrait;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tinyvec::TinyVec;

use crate::error::{KDTreeError, Result};
use crate::kdtree::builder::tree_height;
use crate::kdtree::index::KDNode;
use crate::kdtree::neighbors::{sq_dist, Neighbor, NeighborList, Query};
use crate::kdtree::{KDTree, Node};
use crate::r#type::IndexableNum;

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<N: IndexableNum>: Sized {
    /// The node that searches start from, or `None` for an empty tree.
    fn root(&self) -> Option<Node<'_, N>>;

    /// The number of coordinates per point.
    fn num_dims(&self) -> usize;

    /// The number of items in this KDTree
    fn num_items(&self) -> usize;

    /// The number of levels of this KDTree. An empty tree has height 0.
    fn height(&self) -> usize {
        tree_height(self.root().map(|root| root.inner()))
    }

    /// Find the `num_neighbors` points closest to `coords`, nearest first, leaving out the point
    /// whose id is `id`.
    ///
    /// Fewer ids are returned when the tree holds fewer eligible points.
    ///
    /// ```
    /// use kdtree_knn::kdtree::{KDTree, KDTreeIndex, Point};
    ///
    /// let points = vec![
    ///     Point::new(1, vec![2., 3.]),
    ///     Point::new(2, vec![5., 4.]),
    ///     Point::new(3, vec![9., 6.]),
    ///     Point::new(4, vec![4., 7.]),
    ///     Point::new(5, vec![8., 1.]),
    ///     Point::new(6, vec![7., 2.]),
    /// ];
    /// let tree = KDTree::build(&points, 2).unwrap();
    ///
    /// let results = tree.neighbors(0, &[9., 2.], 2).unwrap();
    /// assert_eq!(results, vec![5, 6]);
    ///
    /// // A stored point never finds itself
    /// let results = tree.neighbors(5, &[8., 1.], 1).unwrap();
    /// assert_eq!(results, vec![6]);
    /// ```
    fn neighbors(&self, id: i64, coords: &[N], num_neighbors: usize) -> Result<Vec<i64>> {
        let results = self.neighbors_with_distance(&Query::new(id, coords, num_neighbors))?;
        Ok(neighbor_ids(results))
    }

    /// Find the `num_neighbors` points closest to `coords`, nearest first, without excluding any
    /// stored point.
    fn nearest(&self, coords: &[N], num_neighbors: usize) -> Result<Vec<i64>> {
        let results = self.neighbors_with_distance(&Query::nearest(coords, num_neighbors))?;
        Ok(neighbor_ids(results))
    }

    /// Find the neighbors of a coordinate, leaving out the point whose id is `id`.
    fn neighbors_coord(
        &self,
        id: i64,
        coord: &impl CoordTrait<T = N>,
        num_neighbors: usize,
    ) -> Result<Vec<i64>> {
        let coords: TinyVec<[N; 4]> = (0..coord.dim().size())
            .map(|n| coord.nth_or_panic(n))
            .collect();
        self.neighbors(id, &coords, num_neighbors)
    }

    /// Run a query, returning each neighbor along with its squared distance, nearest first.
    ///
    /// Equal distances keep the order in which the search reached them.
    fn neighbors_with_distance(&self, query: &Query<'_, N>) -> Result<Vec<Neighbor<N>>> {
        let (results, _) = search(self, query)?;
        Ok(results)
    }

    /// Run many queries in parallel against this tree.
    ///
    /// Results are in the same order as `queries`. Fails with the first invalid query.
    #[cfg(feature = "rayon")]
    fn neighbors_batch(&self, queries: &[Query<'_, N>]) -> Result<Vec<Vec<i64>>>
    where
        Self: Sync,
    {
        queries
            .par_iter()
            .map(|query| self.neighbors_with_distance(query).map(neighbor_ids))
            .collect()
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for KDTree<N> {
    fn root(&self) -> Option<Node<'_, N>> {
        self.root
            .as_deref()
            .map(|root| Node::new(root, 0, self.num_dims))
    }

    fn num_dims(&self) -> usize {
        self.num_dims
    }

    fn num_items(&self) -> usize {
        self.num_items
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for Node<'_, N> {
    fn root(&self) -> Option<Node<'_, N>> {
        Some(*self)
    }

    fn num_dims(&self) -> usize {
        self.num_dims
    }

    fn num_items(&self) -> usize {
        self.inner().num_items()
    }
}

/// Validate `query` and run it against `index`, returning the neighbors along with the number of
/// nodes visited.
pub(crate) fn search<N: IndexableNum>(
    index: &impl KDTreeIndex<N>,
    query: &Query<'_, N>,
) -> Result<(Vec<Neighbor<N>>, usize)> {
    if query.num_neighbors == 0 {
        return Err(KDTreeError::InvalidNeighborCount);
    }
    if query.coords.len() != index.num_dims() {
        return Err(KDTreeError::DimensionMismatch {
            expected: index.num_dims(),
            actual: query.coords.len(),
        });
    }
    if let Some(axis) = query.coords.iter().position(|c| !c.is_finite()) {
        return Err(KDTreeError::NonFiniteQuery { axis });
    }

    let Some(root) = index.root() else {
        return Ok((vec![], 0));
    };

    let mut nearest = NeighborList::new(query.num_neighbors);
    let visited = nn_search(
        root.inner(),
        query,
        &mut nearest,
        root.depth(),
        root.num_dims,
    );
    tracing::trace!(
        visited,
        num_neighbors = query.num_neighbors,
        "kd-tree neighbor search"
    );

    Ok((nearest.into_vec(), visited))
}

fn neighbor_ids<N: IndexableNum>(neighbors: Vec<Neighbor<N>>) -> Vec<i64> {
    neighbors.into_iter().map(|neighbor| neighbor.id).collect()
}

/// Offer a node to the candidate list unless it is the query point itself.
#[inline]
fn consider<N: IndexableNum>(
    node: &KDNode<N>,
    query: &Query<'_, N>,
    nearest: &mut NeighborList<N>,
) {
    if query.exclude != Some(node.id) {
        nearest.add_best(node.id, sq_dist(&node.coords, query.coords));
    }
}

/// Branch-and-bound search below `node`. Returns the number of nodes visited.
fn nn_search<N: IndexableNum>(
    node: &KDNode<N>,
    query: &Query<'_, N>,
    nearest: &mut NeighborList<N>,
    depth: usize,
    num_dims: usize,
) -> usize {
    if node.is_leaf() {
        consider(node, query, nearest);
        return 1;
    }

    let axis = depth % num_dims;
    let node_coord = node.coords[axis];
    let query_coord = query.coords[axis];

    // compare query point and current node along the axis to see which side is near
    let (near, far) = if query_coord < node_coord {
        (node.left.as_deref(), node.right.as_deref())
    } else {
        (node.right.as_deref(), node.left.as_deref())
    };

    let mut visited = 1;
    if let Some(near) = near {
        visited += nn_search(near, query, nearest, depth + 1, num_dims);
    }

    consider(node, query, nearest);

    if let Some(far) = far {
        // The far side can't beat the current worst unless the splitting plane is closer than it
        let diff = node_coord - query_coord;
        let search_far = match nearest.largest() {
            Some(largest) => diff * diff < largest,
            None => true,
        };
        if search_far {
            visited += nn_search(far, query, nearest, depth + 1, num_dims);
        }
    }

    visited
}
