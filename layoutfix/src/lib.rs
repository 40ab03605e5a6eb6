//! layoutfix - Layout reconciliation for segmented document pages
//!
//! Page segmenters and region detectors disagree: regions come out
//! duplicated, nested in each other or with loose boundaries, and detector
//! masks overlap regions that already exist. This crate repairs such a
//! page in place.
//!
//! # Overview
//!
//! - Polygon geometry and pairwise region relations
//! - Binary masks, morphology and mask vectorization
//! - A page model with a hierarchical reading order
//! - Plausibilization (deleting or merging redundant regions)
//! - Insertion of detected regions that take over existing lines
//!
//! # Example
//!
//! ```
//! use layoutfix::{Polygon, layout::{Diagnostics, Page, ReconcileOptions, Region}};
//!
//! let mut page = Page::new("page1", 1000, 1000);
//! page.add_region(Region::text("r1", Polygon::rectangle(0.0, 0.0, 100.0, 100.0).unwrap()))
//!     .unwrap();
//! page.add_region(Region::text("r1a", Polygon::rectangle(0.0, 0.0, 100.0, 100.0).unwrap()))
//!     .unwrap();
//!
//! let mut diag = Diagnostics::new();
//! layoutfix::reconcile_page(&mut page, &ReconcileOptions::default(), &mut diag).unwrap();
//! assert_eq!(page.len(), 1);
//! ```

// Re-export geometry types (used everywhere)
pub use layoutfix_core::*;

// Re-export the other crates as modules to avoid name conflicts
pub use layoutfix_layout as layout;
pub use layoutfix_mask as mask;

// Entry points
pub use layoutfix_layout::{
    reconcile_page, reconcile_pages, reconcile_pages_with_detections, reconcile_with_detections,
};
