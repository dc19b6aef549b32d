//! Bilinear resampling and shape-alignment helpers.
//!
//! Resampling by a fractional factor rounds the output extent, so a
//! downsample followed by the inverse upsample can disagree with the
//! source shape by a pixel. [`crop_to_common`] aligns two matrices before
//! element-wise use and [`pad_to_shape`] restores the caller-visible
//! dimensions afterwards.

use ndarray::{s, Array2};

/// Resample a matrix by `factor` using bilinear interpolation.
///
/// Output extent per axis is `max(1, round(extent * factor))`. Source
/// coordinates use an endpoint-aligned grid: output cell `i` reads from
/// `i * (in - 1) / (out - 1)`.
pub fn zoom(input: &Array2<f32>, factor: f32) -> Array2<f32> {
    let (height, width) = input.dim();
    if height == 0 || width == 0 {
        return input.clone();
    }

    let out_h = ((height as f32 * factor).round() as usize).max(1);
    let out_w = ((width as f32 * factor).round() as usize).max(1);

    let src_pos = |i: usize, out_n: usize, in_n: usize| -> f32 {
        if out_n <= 1 {
            0.0
        } else {
            i as f32 * (in_n - 1) as f32 / (out_n - 1) as f32
        }
    };

    let mut out = Array2::<f32>::zeros((out_h, out_w));
    for y in 0..out_h {
        let sy = src_pos(y, out_h, height);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let fy = sy - y0 as f32;

        for x in 0..out_w {
            let sx = src_pos(x, out_w, width);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(width - 1);
            let fx = sx - x0 as f32;

            let top = input[[y0, x0]] * (1.0 - fx) + input[[y0, x1]] * fx;
            let bottom = input[[y1, x0]] * (1.0 - fx) + input[[y1, x1]] * fx;
            out[[y, x]] = top * (1.0 - fy) + bottom * fy;
        }
    }

    out
}

/// Crop two matrices to the element-wise minimum of their shapes.
pub fn crop_to_common(a: &Array2<f32>, b: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
    let rows = a.nrows().min(b.nrows());
    let cols = a.ncols().min(b.ncols());
    (
        a.slice(s![..rows, ..cols]).to_owned(),
        b.slice(s![..rows, ..cols]).to_owned(),
    )
}

/// Grow a matrix to `shape` by replicating its last row and column.
///
/// Cells already inside the source shape are copied unchanged; a source
/// at least as large as `shape` is truncated to it.
pub fn pad_to_shape(input: &Array2<u8>, shape: (usize, usize)) -> Array2<u8> {
    let (rows, cols) = shape;
    if input.is_empty() || rows == 0 || cols == 0 {
        return Array2::zeros((rows, cols));
    }

    let mut out = Array2::<u8>::zeros((rows, cols));
    for y in 0..rows {
        let sy = y.min(input.nrows() - 1);
        for x in 0..cols {
            out[[y, x]] = input[[sy, x.min(input.ncols() - 1)]];
        }
    }
    out
}
