//! Error types for layoutfix-mask

use thiserror::Error;

/// Errors that can occur during mask processing and vectorization
#[derive(Debug, Error)]
pub enum MaskError {
    /// Core geometry error
    #[error("core error: {0}")]
    Core(#[from] layoutfix_core::GeomError),

    /// Mask dimensions must be positive
    #[error("invalid mask dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Invalid structuring element
    #[error("invalid structuring element: {0}")]
    InvalidSel(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The mask has no foreground area to vectorize
    #[error("mask is empty")]
    EmptyMask,

    /// More than one significant fragment survived dilation and filtering
    #[error("mask is not contiguous: {fragments} fragments")]
    NonContiguousMask { fragments: usize },

    /// Simplification never produced a valid polygon
    #[error("no valid polygon up to simplification tolerance {max_tolerance}")]
    InvalidGeometry { max_tolerance: f64 },
}

/// Result type for mask operations
pub type MaskResult<T> = Result<T, MaskError>;
