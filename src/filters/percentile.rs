//! Percentile filtering and scalar percentile estimation.
//!
//! The windowed filter replaces each cell with the p-th percentile of its
//! neighborhood, which rejects thin dark strokes as outliers where a mean
//! or max filter would not. A window of extent `n` along an axis spans
//! offsets `-(n/2) ..= n - n/2 - 1` relative to the output cell; indices
//! outside the matrix clamp at the edge.

use ndarray::Array2;
use rayon::prelude::*;

/// Nearest rank of the p-th percentile within a sorted window of `len`
/// elements.
fn window_rank(percentile: u8, len: usize) -> usize {
    ((percentile as f32 / 100.0) * (len - 1) as f32).round() as usize
}

/// Apply a windowed percentile filter.
///
/// # Arguments
/// * `input` - 2D matrix
/// * `percentile` - Window percentile, 0..=100 (100 = local maximum)
/// * `size` - Window extent as (rows, cols); both must be positive
///
/// # Returns
/// Filtered matrix with the same shape.
pub fn percentile_filter(
    input: &Array2<f32>,
    percentile: u8,
    size: (usize, usize),
) -> Array2<f32> {
    let (height, width) = input.dim();
    let (size_y, size_x) = size;
    if height == 0 || width == 0 || size_y == 0 || size_x == 0 {
        return input.clone();
    }

    let y_lo = -((size_y / 2) as isize);
    let y_hi = (size_y - size_y / 2) as isize - 1;
    let x_lo = -((size_x / 2) as isize);
    let x_hi = (size_x - size_x / 2) as isize - 1;
    let rank = window_rank(percentile, size_y * size_x);

    let mut out = vec![0.0f32; height * width];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let mut window = Vec::with_capacity(size_y * size_x);
        for (x, cell) in row.iter_mut().enumerate() {
            window.clear();
            for dy in y_lo..=y_hi {
                let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
                for dx in x_lo..=x_hi {
                    let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
                    window.push(input[[sy, sx]]);
                }
            }
            window.sort_by(|a, b| a.total_cmp(b));
            *cell = window[rank];
        }
    });

    Array2::from_shape_vec((height, width), out).expect("buffer length matches shape")
}

/// Linear-interpolated percentile of a sample set.
///
/// Returns `None` for an empty set; percentile estimation over nothing is
/// the caller's error condition to surface.
pub fn percentile_of(values: &[f32], percentile: u8) -> Option<f32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = percentile as f32 / 100.0 * (sorted.len() - 1) as f32;
    let below = pos.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    let frac = pos - below as f32;
    Some(sorted[below] + (sorted[above] - sorted[below]) * frac)
}
