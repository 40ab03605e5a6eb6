//! layoutfix-test - Regression test framework for layoutfix
//!
//! This crate provides [`RegParams`], which runs a sequence of numbered
//! comparisons and reports all failures at the end, and small fixture
//! builders for pages, regions and masks.
//!
//! # Usage
//!
//! ```ignore
//! use layoutfix_test::{RegParams, rect};
//!
//! let mut rp = RegParams::new("plausibilize");
//! rp.compare_values(1.0, page.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;

use layoutfix_core::{BoundingBox, Polygon};
use layoutfix_layout::{Line, Region};
use layoutfix_mask::Mask;

/// Axis-aligned rectangle polygon
pub fn rect(x: f64, y: f64, w: f64, h: f64) -> TestResult<Polygon> {
    Ok(Polygon::rectangle(x, y, w, h)?)
}

/// Top-level text region with a rectangular boundary
pub fn text_region(id: &str, x: f64, y: f64, w: f64, h: f64) -> TestResult<Region> {
    Ok(Region::text(id, rect(x, y, w, h)?))
}

/// Line with a rectangular boundary and an optional classification tag
pub fn line(id: &str, x: f64, y: f64, w: f64, h: f64, tag: Option<&str>) -> TestResult<Line> {
    let line = Line::new(id, rect(x, y, w, h)?);
    Ok(match tag {
        Some(tag) => line.with_custom(format!("subtype: {tag}")),
        None => line,
    })
}

/// Mask of the given size with the given boxes set
pub fn mask_with_rects(width: u32, height: u32, rects: &[(i32, i32, i32, i32)]) -> TestResult<Mask> {
    let mut mask = Mask::new(width, height)?;
    for &(x, y, w, h) in rects {
        mask.fill_rect(&BoundingBox::new(x, y, w, h)?);
    }
    Ok(mask)
}
