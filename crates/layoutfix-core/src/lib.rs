//! layoutfix-core - Geometry primitives for layout reconciliation
//!
//! This crate provides the planar geometry the other layoutfix crates
//! build on:
//!
//! - [`Point`] and [`BoundingBox`] in page pixel coordinates
//! - [`Polygon`]: simple polygons stored as open rings, with area,
//!   validity, convex hull, boolean operations, buffering and
//!   Douglas-Peucker simplification
//! - [`classify`]: the pairwise relation between two region boundaries

pub mod bbox;
mod error;
pub mod point;
pub mod polygon;
pub mod relation;
pub mod simplify;

pub use bbox::BoundingBox;
pub use error::{GeomError, GeomResult};
pub use point::Point;
pub use polygon::{CLIPPER_FACTOR, Polygon};
pub use relation::{Relation, RelationOptions, classify};
pub use simplify::simplify_ring;
