//! Region convolution.
//!
//! The kernel is applied to an extracted working tile, but near the tile's
//! border its neighborhood reaches past the tile. Those taps are answered
//! by the full image through [`SampleSource`], so the tile edges blur into
//! the real surroundings instead of into replicated tile pixels.
//!
//! # Example
//!
//! ```rust
//! use feather_core::{PixelBuffer, Rect};
//! use feather_ops::{convolve, extract, Kernel, KernelShape};
//!
//! let img = PixelBuffer::from_data(4, 4, 1, vec![80; 16]).unwrap();
//! let region = Rect::square(1, 1, 2);
//! let mut tile = vec![0u8; 4];
//! let mut out = vec![0u8; 4];
//! extract(&img, &mut tile, region).unwrap();
//!
//! let kernel = Kernel::build(3, KernelShape::Gaussian, true).unwrap();
//! convolve(&tile, &mut out, region, 1, &img, &kernel).unwrap();
//! assert_eq!(out, vec![80; 4]);
//! ```

use crate::region::area_len;
use crate::{Kernel, OpsError, OpsResult};
use feather_core::{PixelBuffer, Rect, MAX_CHANNELS};
use std::time::{Duration, Instant};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Something that can answer "what is sample `channel` at absolute (x, y)".
///
/// Implementations decide how out-of-range coordinates are handled; the
/// convolution never checks bounds itself.
pub trait SampleSource {
    /// Returns the sample at absolute image coordinate (x, y).
    fn sample(&self, x: i64, y: i64, channel: usize) -> u8;
}

impl SampleSource for PixelBuffer {
    #[inline]
    fn sample(&self, x: i64, y: i64, channel: usize) -> u8 {
        self.sample_clamped(x, y, channel)
    }
}

/// Reads from an extracted tile, falling back to another source outside it.
pub struct TileSampler<'a, S: SampleSource + ?Sized> {
    tile: &'a [u8],
    region: Rect,
    channels: usize,
    fallback: &'a S,
}

impl<'a, S: SampleSource + ?Sized> TileSampler<'a, S> {
    /// Wraps `tile`, which holds `region` with `channels` samples per pixel.
    pub fn new(tile: &'a [u8], region: Rect, channels: usize, fallback: &'a S) -> Self {
        Self {
            tile,
            region,
            channels,
            fallback,
        }
    }
}

impl<S: SampleSource + ?Sized> SampleSource for TileSampler<'_, S> {
    #[inline]
    fn sample(&self, x: i64, y: i64, channel: usize) -> u8 {
        let lx = x - self.region.x as i64;
        let ly = y - self.region.y as i64;
        if lx >= 0 && ly >= 0 && lx < self.region.width as i64 && ly < self.region.height as i64 {
            let idx = (ly as usize * self.region.width as usize + lx as usize) * self.channels;
            self.tile[idx + channel]
        } else {
            self.fallback.sample(x, y, channel)
        }
    }
}

/// Rounds to nearest and clamps into the 8-bit range.
#[inline]
pub(crate) fn quantize(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convolves the tile `area_in` (holding `region`) into `area_out`.
///
/// For every pixel and channel the weighted sum over the kernel
/// neighborhood centered on the pixel is accumulated in `f64`, rounded and
/// clamped to `[0, 255]`. Taps outside the tile are read from `fallback`
/// at their absolute coordinate. The blend mask is not applied here.
///
/// # Errors
///
/// [`OpsError::InvalidGeometry`] for an empty region, a channel count
/// outside `1..=4`, or buffers whose length does not match the region.
pub fn convolve<S: SampleSource + ?Sized>(
    area_in: &[u8],
    area_out: &mut [u8],
    region: Rect,
    channels: usize,
    fallback: &S,
    kernel: &Kernel,
) -> OpsResult<()> {
    trace!(%region, channels, kernel = kernel.size(), "convolve");

    if region.is_empty() {
        return Err(OpsError::InvalidGeometry(format!("empty region {}", region)));
    }
    if channels == 0 || channels > MAX_CHANNELS as usize {
        return Err(OpsError::InvalidGeometry(format!(
            "unsupported channel count {}",
            channels
        )));
    }
    let expected = area_len(region, channels as u8)
        .ok_or_else(|| OpsError::InvalidGeometry(format!("region {} too large", region)))?;
    if area_in.len() != expected || area_out.len() != expected {
        return Err(OpsError::InvalidGeometry(format!(
            "expected {} samples, got {} in / {} out",
            expected,
            area_in.len(),
            area_out.len()
        )));
    }

    let sampler = TileSampler::new(area_in, region, channels, fallback);
    let k = kernel.size();
    let half = kernel.anchor() as i64;
    let width = region.width as usize;

    for row in 0..region.height as usize {
        let cy = region.y as i64 + row as i64 - half;
        for col in 0..width {
            let cx = region.x as i64 + col as i64 - half;
            let mut sums = [0.0f64; MAX_CHANNELS as usize];

            for dv in 0..k {
                for dh in 0..k {
                    let w = kernel.weight(dv, dh);
                    let (sx, sy) = (cx + dh as i64, cy + dv as i64);
                    for (c, sum) in sums.iter_mut().take(channels).enumerate() {
                        *sum += w * sampler.sample(sx, sy, c) as f64;
                    }
                }
            }

            let dst = (row * width + col) * channels;
            for c in 0..channels {
                area_out[dst + c] = quantize(sums[c]);
            }
        }
    }

    Ok(())
}

/// [`convolve`], returning the elapsed wall time.
pub fn convolve_timed<S: SampleSource + ?Sized>(
    area_in: &[u8],
    area_out: &mut [u8],
    region: Rect,
    channels: usize,
    fallback: &S,
    kernel: &Kernel,
) -> OpsResult<Duration> {
    let start = Instant::now();
    convolve(area_in, area_out, region, channels, fallback, kernel)?;
    let elapsed = start.elapsed();
    debug!(%region, kernel = kernel.size(), elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Convolution done");
    Ok(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract, KernelShape};

    fn run(img: &PixelBuffer, region: Rect, kernel: &Kernel) -> Vec<u8> {
        let len = area_len(region, img.channels()).unwrap();
        let mut tile = vec![0u8; len];
        let mut out = vec![0u8; len];
        extract(img, &mut tile, region).unwrap();
        convolve(&tile, &mut out, region, img.channels() as usize, img, kernel).unwrap();
        out
    }

    #[test]
    fn test_uniform_region_is_fixed_point() {
        let img = PixelBuffer::from_data(16, 16, 3, [12u8, 200, 77].repeat(256)).unwrap();
        for shape in [KernelShape::Box, KernelShape::Tent, KernelShape::Gaussian] {
            for size in [1, 2, 3, 5, 7] {
                let kernel = Kernel::build(size, shape, true).unwrap();
                let out = run(&img, Rect::square(3, 3, 8), &kernel);
                assert_eq!(out, [12u8, 200, 77].repeat(64));
            }
        }
    }

    #[test]
    fn test_identity_kernel() {
        let data: Vec<u8> = (0..64).map(|i| (i * 3) as u8).collect();
        let img = PixelBuffer::from_data(8, 8, 1, data).unwrap();
        let kernel = Kernel::build(1, KernelShape::Box, true).unwrap();
        let region = Rect::square(2, 2, 4);
        let out = run(&img, region, &kernel);
        let mut tile = vec![0u8; 16];
        extract(&img, &mut tile, region).unwrap();
        assert_eq!(out, tile);
    }

    #[test]
    fn test_tile_edge_reads_full_image() {
        // Left half 0, right half 250. A tile that starts exactly at the
        // boundary must still see the dark pixels to its left.
        let mut data = vec![0u8; 8 * 8];
        for y in 0..8 {
            for x in 4..8 {
                data[y * 8 + x] = 250;
            }
        }
        let img = PixelBuffer::from_data(8, 8, 1, data).unwrap();
        let kernel = Kernel::build(3, KernelShape::Box, true).unwrap();
        let out = run(&img, Rect::square(4, 2, 3), &kernel);
        // First column of the tile averages one dark and two bright columns.
        assert_eq!(out[0], 167);
        assert_eq!(out[1], 250);
    }

    #[test]
    fn test_tile_sampler_fallback() {
        let img = PixelBuffer::from_data(3, 1, 1, vec![1, 2, 3]).unwrap();
        let tile = [9u8];
        let sampler = TileSampler::new(&tile, Rect::square(1, 0, 1), 1, &img);
        assert_eq!(sampler.sample(1, 0, 0), 9);
        assert_eq!(sampler.sample(0, 0, 0), 1);
        assert_eq!(sampler.sample(-4, 0, 0), 1);
        assert_eq!(sampler.sample(7, 0, 0), 3);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(254.5), 255);
        assert_eq!(quantize(300.0), 255);
        assert_eq!(quantize(99.49), 99);
    }

    #[test]
    fn test_rejects_mismatched_buffers() {
        let img = PixelBuffer::new(4, 4, 1).unwrap();
        let kernel = Kernel::build(3, KernelShape::Box, true).unwrap();
        let tile = vec![0u8; 4];
        let mut out = vec![0u8; 3];
        let err = convolve(&tile, &mut out, Rect::square(0, 0, 2), 1, &img, &kernel);
        assert!(matches!(err, Err(OpsError::InvalidGeometry(_))));
    }

    #[test]
    fn test_timed_reports_duration() {
        let img = PixelBuffer::new(4, 4, 1).unwrap();
        let kernel = Kernel::build(3, KernelShape::Box, true).unwrap();
        let tile = vec![0u8; 4];
        let mut out = vec![0u8; 4];
        let elapsed =
            convolve_timed(&tile, &mut out, Rect::square(0, 0, 2), 1, &img, &kernel).unwrap();
        assert!(elapsed < Duration::from_secs(5));
    }
}
