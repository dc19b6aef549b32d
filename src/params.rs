//! Binarization parameters.
//!
//! All tuning knobs of the pipeline live in [`BinarizeParams`]. The
//! defaults are the reference values used for scanned document pages;
//! [`BinarizeParams::validate`] rejects every invalid combination before
//! any pixel is touched.

use crate::error::{BinarizeError, Result};

/// Tuning parameters for the binarization pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinarizeParams {
    /// Final binarization cutoff applied to the rescaled flat image.
    pub threshold: f32,
    /// Downsampling factor used during background estimation, in (0, 1].
    pub zoom: f32,
    /// Scale of the variance-mask smoothing and dilation windows.
    pub escale: f32,
    /// Fraction of each dimension excluded from threshold estimation,
    /// in [0, 0.5).
    pub border: f32,
    /// Percentile used by the background percentile filters, 0..=100.
    pub perc: u8,
    /// Window extent (in downsampled pixels) of the background
    /// percentile filters.
    pub range: usize,
    /// Low percentile for threshold-bound estimation.
    pub low: u8,
    /// High percentile for threshold-bound estimation; must exceed `low`.
    pub high: u8,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            zoom: 0.5,
            escale: 1.0,
            border: 0.1,
            perc: 80,
            range: 20,
            low: 5,
            high: 90,
        }
    }
}

impl BinarizeParams {
    /// Check every parameter constraint.
    ///
    /// # Errors
    /// Returns [`BinarizeError::InvalidParameter`] naming the offending
    /// parameter. Called by the pipeline entry points before computation.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(BinarizeError::InvalidParameter {
                parameter: "threshold",
                value: self.threshold as f64,
                reason: "must be finite",
            });
        }
        if !(self.zoom > 0.0 && self.zoom <= 1.0) {
            return Err(BinarizeError::InvalidParameter {
                parameter: "zoom",
                value: self.zoom as f64,
                reason: "must be in (0, 1]",
            });
        }
        if !(self.escale > 0.0 && self.escale.is_finite()) {
            return Err(BinarizeError::InvalidParameter {
                parameter: "escale",
                value: self.escale as f64,
                reason: "must be positive",
            });
        }
        if !(self.border >= 0.0 && self.border < 0.5) {
            return Err(BinarizeError::InvalidParameter {
                parameter: "border",
                value: self.border as f64,
                reason: "must be in [0, 0.5)",
            });
        }
        if self.perc > 100 {
            return Err(BinarizeError::InvalidParameter {
                parameter: "perc",
                value: self.perc as f64,
                reason: "must be at most 100",
            });
        }
        if self.range == 0 {
            return Err(BinarizeError::InvalidParameter {
                parameter: "range",
                value: 0.0,
                reason: "window extent must be positive",
            });
        }
        if self.low >= self.high {
            return Err(BinarizeError::InvalidParameter {
                parameter: "low",
                value: self.low as f64,
                reason: "must be below high",
            });
        }
        if self.high > 100 {
            return Err(BinarizeError::InvalidParameter {
                parameter: "high",
                value: self.high as f64,
                reason: "must be at most 100",
            });
        }
        Ok(())
    }
}
