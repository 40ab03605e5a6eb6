//! layoutfix-mask - Binary masks and mask vectorization
//!
//! This crate provides the raster side of layout reconciliation:
//!
//! - [`Mask`]: bit-packed 1-bpp masks
//! - Structuring elements and binary morphology (dilation, erosion, closing)
//! - External contour tracing of 8-connected blobs
//! - Polygon rasterization (scanline fill, Bresenham outlines)
//! - [`vectorize_mask`]: conversion of a noisy detection mask into one
//!   valid simplified polygon

pub mod contour;
mod error;
pub mod mask;
pub mod morph;
pub mod raster;
pub mod sel;
pub mod vectorize;

pub use contour::{Contour, Direction, external_contours, fill_holes, label_components};
pub use error::{MaskError, MaskResult};
pub use mask::Mask;
pub use morph::{close, close_brick, dilate, dilate_brick, erode, erode_brick};
pub use raster::{draw_outline, fill_polygon, line_pixels};
pub use sel::Sel;
pub use vectorize::{VectorizeOptions, Vectorized, structuring_scale, vectorize_mask};
