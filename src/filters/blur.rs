//! Separable Gaussian blur for 2D float matrices.
//!
//! Two 1D convolution passes (horizontal, then vertical) with a shared
//! normalized kernel. Output values are not clamped: the variance
//! estimator subtracts a blurred matrix from its source and needs the
//! negative residuals.

use ndarray::Array2;
use rayon::prelude::*;

/// Generate a normalized 1D Gaussian kernel.
///
/// Kernel size is 6 sigma (covers 99.7% of the distribution), forced odd.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let kernel_size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = kernel_size / 2;

    let mut kernel: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Apply separable Gaussian blur with clamp-at-edge boundary handling.
///
/// # Arguments
/// * `input` - 2D matrix, any value range
/// * `sigma` - Standard deviation of the Gaussian kernel
///
/// # Returns
/// Blurred matrix with the same shape. `sigma <= 0` returns a copy.
pub fn gaussian_blur(input: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let (height, width) = input.dim();
    if sigma <= 0.0 || height == 0 || width == 0 {
        return input.clone();
    }

    let kernel = gaussian_kernel_1d(sigma);
    let half = (kernel.len() / 2) as isize;

    // Horizontal pass
    let mut temp = vec![0.0f32; height * width];
    temp.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx =
                    (x as isize + ki as isize - half).clamp(0, width as isize - 1) as usize;
                sum += input[[y, sx]] * kv;
            }
            *out = sum;
        }
    });
    let temp =
        Array2::from_shape_vec((height, width), temp).expect("buffer length matches shape");

    // Vertical pass
    let mut result = vec![0.0f32; height * width];
    result.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy =
                    (y as isize + ki as isize - half).clamp(0, height as isize - 1) as usize;
                sum += temp[[sy, x]] * kv;
            }
            *out = sum;
        }
    });

    Array2::from_shape_vec((height, width), result).expect("buffer length matches shape")
}
