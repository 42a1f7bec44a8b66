//! End-to-end blur scenarios through the public API.

use feather_core::{PixelBuffer, Rect};
use feather_ops::{apply, Anchor, BlurParams, KernelShape, OpsError};

// ============================================================================
// Helpers
// ============================================================================

/// Quadratic in x and y, so a box mean never equals the center sample.
fn pattern_value(x: u32, y: u32, c: u32) -> u8 {
    ((x * x * 7 + y * y * 13 + x * y * 5 + c * 71) % 256) as u8
}

fn pattern_image(width: u32, height: u32, channels: u8) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * channels as u32) as usize);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels as u32 {
                data.push(pattern_value(x, y, c));
            }
        }
    }
    PixelBuffer::from_data(width, height, channels, data).unwrap()
}

/// Left half 0, right half 255, split at column `split`.
fn edge_image(size: u32, split: u32) -> PixelBuffer {
    let mut img = PixelBuffer::new(size, size, 1).unwrap();
    for y in 0..size {
        for x in split..size {
            img.set_pixel(x, y, &[255]).unwrap();
        }
    }
    img
}

fn box_params(x: u32, y: u32, size: u32, kernel: u32) -> BlurParams {
    BlurParams::at(x, y)
        .with_size(size)
        .with_kernel_size(kernel)
        .with_kernel_shape(KernelShape::Box)
}

// ============================================================================
// Region blur
// ============================================================================

#[test]
fn test_center_pixel_is_box_mean() {
    let img = pattern_image(100, 100, 3);
    let outcome = apply(&img, &box_params(50, 50, 20, 5)).unwrap();
    assert_eq!(outcome.report.region, Rect::square(40, 40, 20));

    let px = outcome.image.pixel(50, 50).unwrap();
    for c in 0..3u32 {
        let mut sum = 0u32;
        for y in 48..=52 {
            for x in 48..=52 {
                sum += pattern_value(x, y, c) as u32;
            }
        }
        let mean = (sum as f64 / 25.0).round() as u8;
        assert_ne!(mean, pattern_value(50, 50, c), "channel {} must change", c);
        assert_eq!(px[c as usize], mean, "channel {}", c);
    }
}

#[test]
fn test_pixels_outside_region_untouched() {
    let img = pattern_image(100, 100, 3);
    let outcome = apply(&img, &box_params(50, 50, 20, 5)).unwrap();
    let region = outcome.report.region;

    for y in 0..100 {
        for x in 0..100 {
            if !region.contains(x, y) {
                assert_eq!(outcome.image.pixel(x, y).unwrap(), img.pixel(x, y).unwrap());
            }
        }
    }
}

#[test]
fn test_region_corner_keeps_original() {
    // The ramp reaches zero at its corner cells.
    let img = pattern_image(100, 100, 3);
    let outcome = apply(&img, &box_params(50, 50, 20, 5)).unwrap();
    for (x, y) in [(40, 40), (59, 40), (40, 59), (59, 59)] {
        assert_eq!(outcome.image.pixel(x, y).unwrap(), img.pixel(x, y).unwrap());
    }
}

#[test]
fn test_source_is_not_modified() {
    let img = pattern_image(32, 32, 1);
    let before = img.clone();
    let _ = apply(&img, &box_params(16, 16, 10, 3)).unwrap();
    assert_eq!(img, before);
}

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_size_smaller_than_kernel_fails() {
    let img = pattern_image(16, 16, 3);
    let err = apply(&img, &box_params(8, 8, 4, 5)).unwrap_err();
    assert!(matches!(err, OpsError::InvalidGeometry(_)));
    assert!(err.to_string().contains("smaller than kernel"));
}

#[test]
fn test_unit_kernel_is_identity() {
    let img = pattern_image(24, 24, 4);
    for shape in [KernelShape::Box, KernelShape::Tent, KernelShape::Gaussian] {
        let params = BlurParams::at(12, 12).with_size(10).with_kernel_size(1).with_kernel_shape(shape);
        let outcome = apply(&img, &params).unwrap();
        assert_eq!(outcome.image, img);
    }
}

#[test]
fn test_top_left_anchor() {
    let img = pattern_image(40, 40, 1);
    let params = box_params(5, 7, 12, 3).with_anchor(Anchor::TopLeft);
    let outcome = apply(&img, &params).unwrap();
    assert_eq!(outcome.report.region, Rect::square(5, 7, 12));
    assert_eq!(outcome.image.pixel(4, 10).unwrap(), img.pixel(4, 10).unwrap());
}

// ============================================================================
// Iterations
// ============================================================================

#[test]
fn test_iterations_widen_edge() {
    let img = edge_image(64, 32);
    let mut prev_jump = u8::MAX;

    for (iterations, band) in [(1, 4), (2, 8), (3, 12)] {
        let params = box_params(32, 32, 64, 5).with_iterations(iterations);
        let outcome = apply(&img, &params).unwrap();
        assert_eq!(outcome.report.passes, iterations);

        let row: Vec<u8> = (0..64).map(|x| outcome.image.pixel(x, 32).unwrap()[0]).collect();
        let soft = row.iter().filter(|&&v| v > 0 && v < 255).count();
        assert_eq!(soft, band, "iterations {}", iterations);

        assert!(row.windows(2).all(|w| w[0] <= w[1]), "row must stay monotonic");
        let jump = row.windows(2).map(|w| w[1] - w[0]).max().unwrap();
        assert!(jump <= prev_jump);
        prev_jump = jump;
    }
}

// ============================================================================
// Image edges
// ============================================================================

#[test]
fn test_corner_region_uses_edge_replication() {
    // Zero padding would darken the corner; edge replication keeps it flat.
    let img = PixelBuffer::from_data(20, 20, 3, vec![200; 20 * 20 * 3]).unwrap();
    for anchor in [Anchor::Center, Anchor::TopLeft] {
        let params = box_params(0, 0, 10, 5).with_anchor(anchor);
        let outcome = apply(&img, &params).unwrap();
        assert_eq!(outcome.image, img);
    }
}

#[test]
fn test_region_overhanging_right_edge() {
    let img = pattern_image(30, 30, 3);
    let params = box_params(28, 15, 10, 3);
    let outcome = apply(&img, &params).unwrap();
    assert_eq!(outcome.report.region, Rect::square(23, 10, 10));
    assert_eq!(outcome.image.width(), 30);
    // Left of the region nothing changes.
    for y in 0..30 {
        for x in 0..23 {
            assert_eq!(outcome.image.pixel(x, y).unwrap(), img.pixel(x, y).unwrap());
        }
    }
}
