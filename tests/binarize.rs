//! End-to-end properties of the binarization pipeline on synthetic
//! rasters.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use nlbin::{binarize, BinarizeError, BinarizeParams};

fn gray(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)])))
}

/// A page-like raster: bright paper with a mild illumination gradient and
/// a few dark vertical strokes.
fn synthetic_page() -> DynamicImage {
    gray(200, 140, |x, y| {
        let stroke = matches!(x, 40..=42 | 80..=82 | 120..=122 | 160..=162)
            && (20..120).contains(&y);
        if stroke {
            40
        } else {
            200 + (x / 20) as u8
        }
    })
}

fn foreground_count(im: &GrayImage) -> usize {
    im.pixels().filter(|p| p[0] == 0).count()
}

#[test]
fn output_is_two_valued() {
    let bin = binarize(&synthetic_page(), &BinarizeParams::default()).unwrap();
    assert!(bin.pixels().all(|p| p[0] == 0 || p[0] == 255));
    // The strokes must survive as ink and the paper as background.
    assert!(bin.pixels().any(|p| p[0] == 0));
    assert!(bin.pixels().any(|p| p[0] == 255));
}

#[test]
fn constant_image_binarizes_uniformly() {
    let im = gray(64, 48, |_, _| 128);
    let bin = binarize(&im, &BinarizeParams::default()).unwrap();
    assert_eq!(bin.dimensions(), (64, 48));
    assert!(bin.pixels().all(|p| p[0] == 255));
}

#[test]
fn output_dimensions_match_input() {
    // Odd dimensions stress the resampling crop/realign path.
    let im = gray(131, 77, |x, y| ((x * 3 + y * 7) % 251) as u8);
    let bin = binarize(&im, &BinarizeParams::default()).unwrap();
    assert_eq!(bin.dimensions(), (131, 77));
}

#[test]
fn raising_threshold_never_loses_foreground() {
    let im = synthetic_page();
    let mut previous = 0usize;
    for threshold in [0.2f32, 0.4, 0.5, 0.6, 0.8] {
        let params = BinarizeParams {
            threshold,
            ..Default::default()
        };
        let count = foreground_count(&binarize(&im, &params).unwrap());
        assert!(
            count >= previous,
            "foreground shrank from {previous} to {count} at threshold {threshold}"
        );
        previous = count;
    }
}

#[test]
fn binarization_is_deterministic() {
    let im = synthetic_page();
    let params = BinarizeParams::default();
    let first = binarize(&im, &params).unwrap();
    let second = binarize(&im, &params).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn sharp_vertical_edge_stays_put() {
    // Left half at 20% intensity, right half at 80%: flat-field
    // correction turns the darker side of the step into ink, with the
    // ink/paper transition at the input edge column.
    let edge = 120u32;
    let im = gray(240, 160, |x, _| if x < edge { 51 } else { 204 });
    let bin = binarize(&im, &BinarizeParams::default()).unwrap();

    let row = 80u32;
    let last_ink = (0..240u32)
        .filter(|&x| bin.get_pixel(x, row)[0] == 0)
        .max()
        .expect("edge image must produce some ink");

    // Within the background-filter window of the true edge.
    let tolerance = 40i64;
    assert!(
        (last_ink as i64 - edge as i64).abs() <= tolerance,
        "ink/paper boundary at {last_ink}, expected near {edge}"
    );
    // Far from the edge both halves are paper.
    for x in (0..40).chain(170..240) {
        assert_eq!(bin.get_pixel(x, row)[0], 255, "unexpected ink at x = {x}");
    }
}

#[test]
fn low_contrast_image_does_not_panic() {
    // Every sample within a narrow band around mid-gray.
    let im = gray(120, 90, |x, y| 115 + ((x * 7 + y * 13) % 26) as u8);
    let params = BinarizeParams::default();
    let first = binarize(&im, &params).unwrap();
    assert_eq!(first.dimensions(), (120, 90));
    assert!(first.pixels().all(|p| p[0] == 0 || p[0] == 255));
    let second = binarize(&im, &params).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn half_border_is_rejected() {
    let im = synthetic_page();
    for border in [0.5f32, 0.75] {
        let params = BinarizeParams {
            border,
            ..Default::default()
        };
        assert!(matches!(
            binarize(&im, &params),
            Err(BinarizeError::InvalidParameter {
                parameter: "border",
                ..
            })
        ));
    }
}

#[test]
fn rgb_input_is_collapsed_to_grayscale() {
    let im = DynamicImage::ImageRgb8(RgbImage::from_fn(100, 80, |x, y| {
        let stroke = (40..=43).contains(&x) && (10..70).contains(&y);
        if stroke {
            Rgb([30, 40, 50])
        } else {
            Rgb([210, 200, 220])
        }
    }));
    let bin = binarize(&im, &BinarizeParams::default()).unwrap();
    assert_eq!(bin.dimensions(), (100, 80));
    assert!(bin.pixels().all(|p| p[0] == 0 || p[0] == 255));
}

#[test]
fn sixteen_bit_input_is_supported() {
    let buf = image::ImageBuffer::from_fn(90, 70, |x, y| {
        Luma([((x * 600 + y * 800) % 60000) as u16])
    });
    let bin = binarize(&DynamicImage::ImageLuma16(buf), &BinarizeParams::default()).unwrap();
    assert_eq!(bin.dimensions(), (90, 70));
    assert!(bin.pixels().all(|p| p[0] == 0 || p[0] == 255));
}
