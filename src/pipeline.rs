//! The binarization pipeline.
//!
//! Five pure stages composed by a single orchestrator, one forward pass,
//! no shared state:
//!
//! 1. [`normalize`] — min-max stretch of the depth-scaled intensity
//!    matrix.
//! 2. [`estimate_background`] — two-pass separable percentile filtering
//!    at reduced resolution.
//! 3. [`flatten`] — flat-field correction against the estimated
//!    background.
//! 4. [`estimate_bounds`] — low/high intensity percentiles restricted to
//!    high-variance regions of the interior.
//! 5. [`apply_threshold`] — rescale and cut to a two-valued matrix.
//!
//! Output convention: 0 = foreground (ink), 255 = background (paper).

use ndarray::{s, Array2};
use tracing::{debug, warn};

use crate::error::{BinarizeError, Result};
use crate::filters::{blur, morphology, percentile, resample};
use crate::params::BinarizeParams;

/// Output sample value for background (paper) cells.
pub const BACKGROUND: u8 = 255;
/// Output sample value for foreground (ink) cells.
pub const FOREGROUND: u8 = 0;

/// Min-max normalize a depth-scaled matrix to span exactly [0, 1].
///
/// Returns `None` for a constant matrix, where the stretch divides by
/// zero; the caller decides the degenerate-image policy.
pub fn normalize(raw: &Array2<f32>) -> Option<Array2<f32>> {
    let min = raw.fold(f32::INFINITY, |a, &b| a.min(b));
    let max = raw.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let span = max - min;
    if !(span > 0.0) {
        return None;
    }
    Some(raw.mapv(|v| (v - min) / span))
}

/// Estimate slowly varying background illumination.
///
/// Downsamples by `zoom`, applies a tall-narrow then a wide-short
/// percentile filter (the percentile rejects thin foreground strokes as
/// outliers), and upsamples back. The result's shape may differ from the
/// input's by a pixel due to resampling rounding; callers align shapes
/// with [`resample::crop_to_common`].
pub fn estimate_background(image: &Array2<f32>, params: &BinarizeParams) -> Array2<f32> {
    let m = resample::zoom(image, params.zoom);
    let m = percentile::percentile_filter(&m, params.perc, (params.range, 2));
    let m = percentile::percentile_filter(&m, params.perc, (2, params.range));
    resample::zoom(&m, 1.0 / params.zoom)
}

/// Flat-field correction: `clip(image - background + 1, 0, 1)` on the
/// common cropped shape.
pub fn flatten(image: &Array2<f32>, background: &Array2<f32>) -> Array2<f32> {
    let (image, background) = resample::crop_to_common(image, background);
    let mut flat = image - background;
    flat.mapv_inplace(|v| (v + 1.0).clamp(0.0, 1.0));
    flat
}

/// Estimate the low/high intensity bounds used to rescale the flat image.
///
/// Restricts estimation to an interior sub-region (excluding the border
/// fraction on each side), then to locations of significant local
/// variance: a smoothed squared-residual signal is thresholded at 30% of
/// its maximum and dilated separably so whole text lines form contiguous
/// blobs. If no location passes the variance threshold (a blank page),
/// the percentiles fall back to the whole interior.
///
/// # Errors
/// Returns [`BinarizeError::EmptyInterior`] when the border offsets leave
/// no interior pixels.
pub fn estimate_bounds(flat: &Array2<f32>, params: &BinarizeParams) -> Result<(f32, f32)> {
    let (rows, cols) = flat.dim();
    let off_y = (params.border * rows as f32) as usize;
    let off_x = (params.border * cols as f32) as usize;
    if 2 * off_y >= rows || 2 * off_x >= cols {
        return Err(BinarizeError::EmptyInterior {
            rows,
            cols,
            border: params.border,
        });
    }
    let interior = flat.slice(s![off_y..rows - off_y, off_x..cols - off_x]).to_owned();

    // Smoothed local-variance magnitude of the interior.
    let sigma = params.escale * 20.0;
    let residual = &interior - &blur::gaussian_blur(&interior, sigma);
    let variance = blur::gaussian_blur(&residual.mapv(|v| v * v), sigma).mapv(f32::sqrt);

    let vmax = variance.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let mask = variance.mapv(|v| v > 0.3 * vmax);
    let extent = morphology::odd_extent(params.escale * 50.0);
    let mask = morphology::dilate_vertical(&mask, extent);
    let mask = morphology::dilate_horizontal(&mask, extent);

    let mut selected: Vec<f32> = interior
        .iter()
        .zip(mask.iter())
        .filter_map(|(&value, &keep)| keep.then_some(value))
        .collect();
    if selected.is_empty() {
        debug!("variance mask is empty; falling back to whole-interior percentiles");
        selected = interior.iter().copied().collect();
    }

    let empty_interior = || BinarizeError::EmptyInterior {
        rows,
        cols,
        border: params.border,
    };
    let lo = percentile::percentile_of(&selected, params.low).ok_or_else(empty_interior)?;
    let hi = percentile::percentile_of(&selected, params.high).ok_or_else(empty_interior)?;
    Ok((lo, hi))
}

/// Rescale the flat image by the estimated bounds and cut at `threshold`.
///
/// Degenerate bounds (`hi <= lo`) carry no discriminative range; the flat
/// values are then compared against `threshold` directly.
pub fn apply_threshold(flat: &Array2<f32>, bounds: (f32, f32), threshold: f32) -> Array2<u8> {
    let (lo, hi) = bounds;
    if hi <= lo {
        warn!(lo, hi, "degenerate threshold bounds; skipping rescale");
        return flat.mapv(|v| if v > threshold { BACKGROUND } else { FOREGROUND });
    }

    flat.mapv(|v| {
        let rescaled = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
        if rescaled > threshold {
            BACKGROUND
        } else {
            FOREGROUND
        }
    })
}

/// Run the full pipeline on a depth-scaled intensity matrix.
///
/// `raw` holds samples already divided by the maximum representable value
/// of the source bit depth (see [`crate::raster::to_matrix`]). The output
/// matrix has the same shape as `raw` and holds only the values
/// [`FOREGROUND`] and [`BACKGROUND`].
///
/// # Errors
/// Propagates parameter validation failures and [`estimate_bounds`]
/// conditions. A constant input is not an error: it binarizes
/// deterministically to an all-background page.
pub fn binarize_matrix(raw: &Array2<f32>, params: &BinarizeParams) -> Result<Array2<u8>> {
    params.validate()?;
    let (rows, cols) = raw.dim();
    if rows == 0 || cols == 0 {
        return Err(BinarizeError::EmptyImage);
    }

    let Some(image) = normalize(raw) else {
        debug!("constant input image; returning a uniform background page");
        return Ok(Array2::from_elem((rows, cols), BACKGROUND));
    };

    let background = estimate_background(&image, params);
    let flat = flatten(&image, &background);
    let bounds = estimate_bounds(&flat, params)?;
    let bin = apply_threshold(&flat, bounds, params.threshold);

    // The crop invariant must not leak through the public boundary.
    Ok(resample::pad_to_shape(&bin, (rows, cols)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_stretches_to_unit_range() {
        let m = Array2::from_shape_fn((4, 4), |(y, x)| 0.2 + 0.1 * (y * 4 + x) as f32 / 15.0);
        let n = normalize(&m).unwrap();
        let min = n.fold(f32::INFINITY, |a, &b| a.min(b));
        let max = n.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        assert!(min.abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_constant_is_none() {
        let m = Array2::from_elem((3, 3), 0.5f32);
        assert!(normalize(&m).is_none());
    }

    #[test]
    fn test_flatten_crops_to_common_shape_and_clips() {
        let image = Array2::from_elem((5, 5), 0.8f32);
        let background = Array2::from_elem((4, 6), 0.9f32);
        let flat = flatten(&image, &background);
        assert_eq!(flat.dim(), (4, 5));
        for &v in flat.iter() {
            assert!((v - 0.9).abs() < 1e-6);
        }
    }

    #[test]
    fn test_flatten_clips_to_unit_interval() {
        let image = Array2::from_elem((2, 2), 1.0f32);
        let background = Array2::from_elem((2, 2), 0.0f32);
        let flat = flatten(&image, &background);
        for &v in flat.iter() {
            assert_eq!(v, 1.0);
        }
    }

    #[test]
    fn test_estimate_bounds_rejects_empty_interior() {
        let flat = Array2::from_elem((4, 4), 0.5f32);
        let params = BinarizeParams {
            border: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            estimate_bounds(&flat, &params),
            Err(BinarizeError::EmptyInterior { .. })
        ));
    }

    #[test]
    fn test_estimate_bounds_flat_interior_falls_back() {
        // Uniform interior: zero variance everywhere, the mask selects
        // nothing and the whole-interior fallback kicks in.
        let flat = Array2::from_elem((40, 40), 0.7f32);
        let (lo, hi) = estimate_bounds(&flat, &BinarizeParams::default()).unwrap();
        assert!((lo - 0.7).abs() < 1e-6);
        assert!((hi - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_bounds_brackets_bimodal_interior() {
        let flat = Array2::from_shape_fn((60, 60), |(y, _)| if y % 8 < 2 { 0.1 } else { 0.9 });
        let (lo, hi) = estimate_bounds(&flat, &BinarizeParams::default()).unwrap();
        assert!(lo < hi);
        assert!(lo <= 0.2, "lo = {lo}");
        assert!(hi >= 0.8, "hi = {hi}");
    }

    #[test]
    fn test_apply_threshold_rescales_with_bounds() {
        let flat = Array2::from_shape_fn((1, 3), |(_, x)| [0.2f32, 0.5, 0.8][x]);
        let out = apply_threshold(&flat, (0.2, 0.8), 0.5);
        assert_eq!(out[[0, 0]], FOREGROUND);
        assert_eq!(out[[0, 1]], FOREGROUND);
        assert_eq!(out[[0, 2]], BACKGROUND);
    }

    #[test]
    fn test_apply_threshold_degenerate_bounds_compare_directly() {
        let flat = Array2::from_shape_fn((1, 2), |(_, x)| if x == 0 { 0.4f32 } else { 0.6 });
        let out = apply_threshold(&flat, (0.5, 0.5), 0.5);
        assert_eq!(out[[0, 0]], FOREGROUND);
        assert_eq!(out[[0, 1]], BACKGROUND);
    }

    #[test]
    fn test_binarize_matrix_constant_input_is_background() {
        let raw = Array2::from_elem((30, 20), 0.3f32);
        let bin = binarize_matrix(&raw, &BinarizeParams::default()).unwrap();
        assert_eq!(bin.dim(), (30, 20));
        assert!(bin.iter().all(|&v| v == BACKGROUND));
    }

    #[test]
    fn test_binarize_matrix_preserves_odd_shapes() {
        let raw = Array2::from_shape_fn((37, 51), |(y, x)| ((y * 51 + x) % 97) as f32 / 96.0);
        let bin = binarize_matrix(&raw, &BinarizeParams::default()).unwrap();
        assert_eq!(bin.dim(), (37, 51));
    }

    #[test]
    fn test_binarize_matrix_rejects_invalid_params() {
        let raw = Array2::from_elem((10, 10), 0.5f32);
        let params = BinarizeParams {
            zoom: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            binarize_matrix(&raw, &params),
            Err(BinarizeError::InvalidParameter { .. })
        ));
    }
}
