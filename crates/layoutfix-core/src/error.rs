//! Error types for layoutfix-core
//!
//! Geometry operations fail deterministically: a polygon is either usable
//! or it is not, so none of these errors is worth retrying.

use thiserror::Error;

/// Errors that can occur during geometry operations
#[derive(Debug, Error)]
pub enum GeomError {
    /// Too few distinct vertices to describe an area
    #[error("polygon needs at least 3 distinct points, got {count}")]
    TooFewPoints { count: usize },

    /// Polygon is self-intersecting or has zero area
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A boolean operation or offset produced nothing
    #[error("empty geometry result: {0}")]
    EmptyResult(&'static str),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for geometry operations
pub type GeomResult<T> = Result<T, GeomError>;
