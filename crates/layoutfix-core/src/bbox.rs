//! Axis-aligned pixel rectangles
//!
//! Detector output and raster masks are addressed with integer boxes;
//! polygons use floating-point coordinates and convert on demand.

use crate::error::{GeomError, GeomResult};
use crate::polygon::Polygon;
use serde::{Deserialize, Serialize};

/// Pixel rectangle anchored at its top-left corner.
///
/// The pixels covered are `x..x + w` by `y..y + h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BoundingBox {
    /// Create a box
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::InvalidParameter`] for a negative extent.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> GeomResult<Self> {
        if w < 0 || h < 0 {
            return Err(GeomError::InvalidParameter(format!(
                "box extent {w}x{h} is negative"
            )));
        }
        Ok(Self::new_unchecked(x, y, w, h))
    }

    /// Create a box, trusting the caller on the extent
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the last covered column
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the last covered row
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Number of covered pixels
    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.w.max(0)) * i64::from(self.h.max(0))
    }

    /// Check whether both boxes cover a common pixel
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let cols = self.x.max(other.x) < self.right().min(other.right());
        let rows = self.y.max(other.y) < self.bottom().min(other.bottom());
        cols && rows
    }

    /// Outline of the covered pixels as a polygon.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::TooFewPoints`] for a box without area.
    pub fn to_polygon(&self) -> GeomResult<Polygon> {
        Polygon::rectangle(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.w),
            f64::from(self.h),
        )
    }
}
