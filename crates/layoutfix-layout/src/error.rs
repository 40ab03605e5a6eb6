//! Error types for layoutfix-layout
//!
//! Only conditions that make a whole page unprocessable are errors.
//! Per-region and per-detection failures are recorded in
//! [`Diagnostics`](crate::Diagnostics) instead.

use thiserror::Error;

/// Errors that can occur during layout reconciliation
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Core geometry error
    #[error("core error: {0}")]
    Core(#[from] layoutfix_core::GeomError),

    /// Mask processing error
    #[error("mask error: {0}")]
    Mask(#[from] layoutfix_mask::MaskError),

    /// The detector reported the background class or an unnamed class
    #[error("detection {index} has class {class_id} outside the class table")]
    InvalidDetectorOutput { index: usize, class_id: u32 },

    /// Invalid option values
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A region id is already taken
    #[error("duplicate region id: {0}")]
    DuplicateRegionId(String),

    /// A region id does not resolve
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
