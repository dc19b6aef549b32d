//! Error types for the nlbin library.

use thiserror::Error;

/// Result type alias for binarization operations.
pub type Result<T> = std::result::Result<T, BinarizeError>;

/// Error conditions detected before or during binarization.
///
/// Every variant corresponds to arithmetic that would otherwise be
/// undefined (division by zero, empty-set indexing) and is detected at the
/// stage that would perform it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BinarizeError {
    /// A parameter fails validation before any computation begins.
    #[error("invalid parameter: {parameter} = {value} ({reason})")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The border fraction leaves no interior region for threshold
    /// estimation.
    #[error("border fraction {border} leaves no interior in a {rows}x{cols} image")]
    EmptyInterior {
        rows: usize,
        cols: usize,
        border: f32,
    },

    /// The input raster has zero width or height.
    #[error("input image has no pixels")]
    EmptyImage,
}
