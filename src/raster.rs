//! Image ↔ matrix boundary collaborators.
//!
//! The pipeline core works on `ndarray` matrices only. This module owns
//! the narrow contract with the `image` crate: decode a raster into a
//! depth-scaled, channel-averaged f32 matrix, and encode a two-valued
//! matrix back into an 8-bit grayscale raster.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel};
use ndarray::Array2;

use crate::error::{BinarizeError, Result};

/// Average the first `channels` samples of every pixel and scale by the
/// maximum representable sample value.
fn collapse<P>(
    buf: &ImageBuffer<P, Vec<P::Subpixel>>,
    channels: usize,
    depth_max: f32,
) -> Array2<f32>
where
    P: Pixel,
    P::Subpixel: Into<f32>,
{
    let (width, height) = buf.dimensions();
    let mut out = Array2::<f32>::zeros((height as usize, width as usize));
    for (x, y, pixel) in buf.enumerate_pixels() {
        let samples = pixel.channels();
        let mut sum = 0.0f32;
        for c in 0..channels {
            sum += Into::<f32>::into(samples[c]);
        }
        out[[y as usize, x as usize]] = sum / (channels as f32 * depth_max);
    }
    out
}

/// Decode a raster into a (height, width) f32 matrix.
///
/// Samples are divided by the maximum value of the source bit depth;
/// color channels are averaged to collapse to a single channel. Alpha is
/// ignored.
///
/// # Errors
/// Returns [`BinarizeError::EmptyImage`] for a zero-sized raster.
pub fn to_matrix(im: &DynamicImage) -> Result<Array2<f32>> {
    if im.width() == 0 || im.height() == 0 {
        return Err(BinarizeError::EmptyImage);
    }

    let matrix = match im {
        DynamicImage::ImageLuma8(buf) => collapse(buf, 1, 255.0),
        DynamicImage::ImageLumaA8(buf) => collapse(buf, 1, 255.0),
        DynamicImage::ImageRgb8(buf) => collapse(buf, 3, 255.0),
        DynamicImage::ImageRgba8(buf) => collapse(buf, 3, 255.0),
        DynamicImage::ImageLuma16(buf) => collapse(buf, 1, 65535.0),
        DynamicImage::ImageLumaA16(buf) => collapse(buf, 1, 65535.0),
        DynamicImage::ImageRgb16(buf) => collapse(buf, 3, 65535.0),
        DynamicImage::ImageRgba16(buf) => collapse(buf, 3, 65535.0),
        DynamicImage::ImageRgb32F(buf) => collapse(buf, 3, 1.0),
        DynamicImage::ImageRgba32F(buf) => collapse(buf, 3, 1.0),
        other => collapse(&other.to_rgb32f(), 3, 1.0),
    };
    Ok(matrix)
}

/// Encode a two-valued matrix as an 8-bit grayscale image.
pub fn to_image(matrix: &Array2<u8>) -> GrayImage {
    let (height, width) = matrix.dim();
    let mut out = GrayImage::new(width as u32, height as u32);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        *pixel = Luma([matrix[[y as usize, x as usize]]]);
    }
    out
}
