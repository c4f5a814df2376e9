//! Query and result types for nearest neighbor search, plus the bounded candidate list used while
//! walking the tree.

use crate::r#type::IndexableNum;

/// A nearest neighbor query.
///
/// When `exclude` is set, a stored point with that id is never returned. This lets a point already
/// in the tree be used as the query without finding itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<'a, N: IndexableNum> {
    /// Id of the point to leave out of the results, if any.
    pub exclude: Option<i64>,
    /// Coordinates of the query point. Must have one value per tree dimension.
    pub coords: &'a [N],
    /// Maximum number of neighbors to return. Must be at least 1.
    pub num_neighbors: usize,
}

impl<'a, N: IndexableNum> Query<'a, N> {
    /// Create a query that excludes the point with the given id from its results.
    pub fn new(id: i64, coords: &'a [N], num_neighbors: usize) -> Self {
        Self {
            exclude: Some(id),
            coords,
            num_neighbors,
        }
    }

    /// Create a query that may return any stored point.
    pub fn nearest(coords: &'a [N], num_neighbors: usize) -> Self {
        Self {
            exclude: None,
            coords,
            num_neighbors,
        }
    }
}

/// A single search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<N: IndexableNum> {
    /// Id of the stored point.
    pub id: i64,
    /// Squared Euclidean distance from the query coordinates.
    pub distance_squared: N,
}

/// The best candidates seen so far during one search, kept in ascending order of distance and
/// never longer than its capacity.
#[derive(Debug, Clone)]
pub(crate) struct NeighborList<N: IndexableNum> {
    items: Vec<Neighbor<N>>,
    capacity: usize,
}

impl<N: IndexableNum> NeighborList<N> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Offer a candidate to the list.
    ///
    /// It is inserted before the first entry with a strictly greater distance, so candidates at
    /// equal distance keep their discovery order. When the list is full, the farthest entry is
    /// dropped to make room; a candidate no closer than the farthest entry is discarded.
    pub(crate) fn add_best(&mut self, id: i64, distance_squared: N) {
        let candidate = Neighbor {
            id,
            distance_squared,
        };

        match self
            .items
            .iter()
            .position(|item| item.distance_squared > distance_squared)
        {
            Some(idx) => {
                if self.is_full() {
                    self.items.pop();
                }
                self.items.insert(idx, candidate);
            }
            None => {
                if !self.is_full() {
                    self.items.push(candidate);
                }
            }
        }
    }

    /// The distance of the worst kept candidate, or `None` while the list still has spare
    /// capacity and therefore places no bound on the search.
    #[inline]
    pub(crate) fn largest(&self) -> Option<N> {
        if self.is_full() {
            self.items.last().map(|item| item.distance_squared)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub(crate) fn into_vec(self) -> Vec<Neighbor<N>> {
        self.items
    }
}

/// Squared Euclidean distance between two points with the same number of dimensions.
#[inline]
pub fn sq_dist<N: IndexableNum>(a: &[N], b: &[N]) -> N {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(N::zero(), |acc, (&ai, &bi)| {
        let d = ai - bi;
        acc + d * d
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn ids(list: &NeighborList<f64>) -> Vec<i64> {
        list.items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn keeps_ascending_order() {
        let mut list = NeighborList::new(4);
        list.add_best(1, 9.0);
        list.add_best(2, 1.0);
        list.add_best(3, 4.0);
        assert_eq!(ids(&list), vec![2, 3, 1]);
        assert_eq!(list.largest(), None, "not full yet");
    }

    #[test]
    fn drops_worst_when_full() {
        let mut list = NeighborList::new(2);
        list.add_best(1, 5.0);
        list.add_best(2, 3.0);
        assert_eq!(list.largest(), Some(5.0));

        list.add_best(3, 1.0);
        assert_eq!(ids(&list), vec![3, 2]);
        assert_eq!(list.largest(), Some(3.0));

        // not closer than the worst kept candidate
        list.add_best(4, 3.0);
        list.add_best(5, 7.0);
        assert_eq!(ids(&list), vec![3, 2]);
    }

    #[test]
    fn equal_distances_keep_discovery_order() {
        let mut list = NeighborList::new(3);
        list.add_best(1, 2.0);
        list.add_best(2, 2.0);
        list.add_best(3, 1.0);
        list.add_best(4, 2.0);
        assert_eq!(ids(&list), vec![3, 1, 2]);
    }

    #[test]
    fn capacity_one() {
        let mut list = NeighborList::new(1);
        list.add_best(1, 2.0);
        list.add_best(2, 2.0);
        list.add_best(3, 0.5);
        assert_eq!(ids(&list), vec![3]);
    }

    #[test]
    fn squared_distance() {
        assert_eq!(sq_dist(&[9.0, 2.0], &[7.0, 2.0]), 4.0);
        assert_eq!(sq_dist(&[1.0, 2.0, 3.0], &[4.0, 6.0, 3.0]), 25.0);
        assert_eq!(sq_dist::<f32>(&[0.5], &[0.5]), 0.0);
    }
}
