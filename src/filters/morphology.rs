//! Binary morphology on boolean masks.
//!
//! The variance mask is dilated with separable 1D structuring elements:
//! a vertical pass followed by a horizontal pass, each taking the logical
//! any over a centered window. Cells outside the mask count as false.

use ndarray::Array2;

/// Round a floating-point window scale to a valid odd structuring-element
/// extent.
///
/// Rounds half-up, bumps even results to the next odd integer and floors
/// at 1, keeping the element symmetric around its center.
pub fn odd_extent(scale: f32) -> usize {
    let n = scale.round().max(1.0) as usize;
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Dilate along the row axis with a 1D element of odd `extent`.
pub fn dilate_vertical(mask: &Array2<bool>, extent: usize) -> Array2<bool> {
    let (height, width) = mask.dim();
    let half = (extent / 2) as isize;
    let mut out = Array2::from_elem((height, width), false);

    for y in 0..height {
        for x in 0..width {
            let mut hit = false;
            for dy in -half..=half {
                let sy = y as isize + dy;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                if mask[[sy as usize, x]] {
                    hit = true;
                    break;
                }
            }
            out[[y, x]] = hit;
        }
    }

    out
}

/// Dilate along the column axis with a 1D element of odd `extent`.
pub fn dilate_horizontal(mask: &Array2<bool>, extent: usize) -> Array2<bool> {
    let (height, width) = mask.dim();
    let half = (extent / 2) as isize;
    let mut out = Array2::from_elem((height, width), false);

    for y in 0..height {
        for x in 0..width {
            let mut hit = false;
            for dx in -half..=half {
                let sx = x as isize + dx;
                if sx < 0 || sx >= width as isize {
                    continue;
                }
                if mask[[y, sx as usize]] {
                    hit = true;
                    break;
                }
            }
            out[[y, x]] = hit;
        }
    }

    out
}
