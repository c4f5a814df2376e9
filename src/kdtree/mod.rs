//! An implementation of an immutable K-D Tree with k-nearest-neighbor search.

#![warn(missing_docs)]

mod builder;
mod index;
mod neighbors;
mod r#trait;
mod traversal;

pub use builder::KDTreeBuilder;
pub use index::{KDTree, Point};
pub use neighbors::{sq_dist, Neighbor, Query};
pub use r#trait::KDTreeIndex;
pub use traversal::Node;
