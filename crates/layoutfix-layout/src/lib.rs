//! layoutfix-layout - Layout reconciliation for page segmentations
//!
//! This crate repairs the region structure of a segmented page and merges
//! detector output into it:
//!
//! - **Page model**: a region arena with parent links, lines, and a
//!   hierarchical reading order
//! - **Plausibilization**: redundant and nearly nested regions on the same
//!   level are deleted or merged
//! - **Detections**: deduplicated detector masks become new regions that
//!   take over the lines of the regions they replace
//! - **Sanitizing and validation**: boundaries shrink to their lines, and
//!   coordinates are checked against their parents
//!
//! # Quick Start
//!
//! ```
//! use layoutfix_core::Polygon;
//! use layoutfix_layout::{Diagnostics, Page, ReconcileOptions, Region, reconcile_page};
//!
//! let mut page = Page::new("page1", 1000, 1000);
//! page.add_region(Region::text("r1", Polygon::rectangle(0.0, 0.0, 100.0, 100.0).unwrap()))
//!     .unwrap();
//! page.add_region(Region::text("r2", Polygon::rectangle(20.0, 20.0, 40.0, 50.0).unwrap()))
//!     .unwrap();
//!
//! let mut diag = Diagnostics::new();
//! reconcile_page(&mut page, &ReconcileOptions::default(), &mut diag).unwrap();
//! assert!(!page.contains("r2"));
//! ```
//!
//! # Modules
//!
//! - [`page`], [`region`], [`reading_order`]: the page model
//! - [`plan`], [`merge`]: planning and applying region changes
//! - [`detection`]: detector output deduplication
//! - [`sanitize`], [`validate`]: boundary repair and checks
//! - [`reconcile`], [`batch`]: page-level and multi-page entry points

pub mod batch;
pub mod detection;
pub mod diagnostics;
mod error;
pub mod merge;
pub mod options;
pub mod page;
pub mod plan;
pub mod reading_order;
pub mod reconcile;
pub mod region;
pub mod sanitize;
pub mod validate;

pub use error::{LayoutError, LayoutResult};

// Re-export commonly used types
pub use batch::{reconcile_pages, reconcile_pages_with_detections};
pub use detection::{BACKGROUND_CLASS, Detection, KeptDetection, deduplicate};
pub use diagnostics::{Change, Diagnostic, DiagnosticKind, Diagnostics};
pub use merge::{execute_candidate, execute_plan, merge_region};
pub use options::{ContainmentPolicy, ReconcileOptions};
pub use page::Page;
pub use plan::{CandidatePlan, Deletion, Merge, MergePlan, plan_candidate, plan_level};
pub use reading_order::{
    ChildItem, ChildKind, GroupNode, ReadingOrderChild, ReadingOrderNode, ReadingOrderTree,
    ReadingOrderVisitor, Redirect, RefLocation, RefTarget,
};
pub use reconcile::{reconcile_page, reconcile_with_detections};
pub use region::{Line, Parent, Region, RegionType};
pub use sanitize::{sanitize_page, sanitize_region};
pub use validate::validate_page;

// Re-export the lower layers for convenience
pub use layoutfix_core;
pub use layoutfix_mask;
