//! # nlbin
//!
//! Adaptive non-linear binarization for document images.
//!
//! Converts a grayscale or multi-channel raster into a strictly two-level
//! image (0 = ink, 255 = paper), designed as a preprocessing stage for
//! text-recognition front ends where uneven illumination and low contrast
//! make fixed global thresholds unreliable.
//!
//! The transform is a single forward pass over five stages:
//!
//! 1. **Normalize** — depth-scale, channel-average and min-max stretch the
//!    input into a [0, 1] intensity matrix.
//! 2. **Background estimation** — two-pass separable percentile filtering
//!    at reduced resolution approximates the slowly varying illumination.
//! 3. **Flat-field correction** — subtract the background, offset and clip.
//! 4. **Threshold estimation** — low/high intensity percentiles restricted
//!    to high-variance (informative) regions of the image interior.
//! 5. **Binarization** — rescale by the estimated bounds and cut at the
//!    final threshold.
//!
//! The algorithm is deterministic, stateless and re-entrant; independent
//! images can be processed concurrently without coordination.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nlbin::{binarize, BinarizeParams};
//!
//! let im = image::open("page.png")?;
//! let bin = binarize(&im, &BinarizeParams::default())?;
//! bin.save("page.bin.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod filters;
pub mod params;
pub mod pipeline;
pub mod raster;

pub use error::{BinarizeError, Result};
pub use params::BinarizeParams;

/// Binarize a raster image.
///
/// This is the main entry point. The input may have any supported channel
/// count and integer bit depth; color channels are averaged to grayscale
/// before processing.
///
/// # Returns
/// A single-channel 8-bit image with exactly two sample values (0 and
/// 255) and the same spatial dimensions as the input.
///
/// # Errors
/// Returns [`BinarizeError`] if a parameter is invalid, the image is
/// empty, or the border fraction leaves no interior region for threshold
/// estimation.
pub fn binarize(
    im: &image::DynamicImage,
    params: &BinarizeParams,
) -> Result<image::GrayImage> {
    let raw = raster::to_matrix(im)?;
    let bin = pipeline::binarize_matrix(&raw, params)?;
    Ok(raster::to_image(&bin))
}
