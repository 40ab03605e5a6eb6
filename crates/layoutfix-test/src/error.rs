//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Geometry construction failed
    #[error("geometry error: {0}")]
    Geometry(#[from] layoutfix_core::GeomError),

    /// Mask construction failed
    #[error("mask error: {0}")]
    Mask(#[from] layoutfix_mask::MaskError),

    /// Page construction failed
    #[error("layout error: {0}")]
    Layout(#[from] layoutfix_layout::LayoutError),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
