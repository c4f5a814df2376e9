use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KDTreeError {
    /// A tree must have at least one dimension.
    #[error("Number of dimensions must be at least 1.")]
    InvalidDimensions,

    /// A point or query had a coordinate vector of the wrong length.
    #[error("Expected {expected} coordinates, got {actual}.")]
    DimensionMismatch {
        /// The number of dimensions of the tree.
        expected: usize,
        /// The number of coordinates supplied.
        actual: usize,
    },

    /// A point had a NaN or infinite coordinate, which cannot be ordered along an axis.
    #[error("Point {id} has a non-finite coordinate on axis {axis}.")]
    NonFiniteCoordinate {
        /// Id of the offending point.
        id: i64,
        /// First axis holding a non-finite value.
        axis: usize,
    },

    /// A query had a NaN or infinite coordinate, so no distance to it can be ranked.
    #[error("Query has a non-finite coordinate on axis {axis}.")]
    NonFiniteQuery {
        /// First axis holding a non-finite value.
        axis: usize,
    },

    /// Neighbor queries must ask for at least one result.
    #[error("Number of neighbors must be at least 1.")]
    InvalidNeighborCount,

    /// Any other contract violation, described by the message.
    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, KDTreeError>;
