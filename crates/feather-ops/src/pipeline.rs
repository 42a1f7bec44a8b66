//! Feathered region blur driver.
//!
//! Ties the stages together:
//!
//! ```text
//! Kernel::build ─┐
//! Mask::ramp ────┤   (once per run, read-only afterwards)
//!                ▼
//!   ┌─► extract ──► convolve ──► integrate ─┐
//!   └───────────── iterations ──────────────┘
//! ```
//!
//! The destination starts as a copy of the source. Every pass re-extracts
//! from the partially blurred destination, so repeated passes widen the
//! blur the way stacked box blurs approach a Gaussian.
//!
//! # Example
//!
//! ```rust
//! use feather_core::PixelBuffer;
//! use feather_ops::{apply, BlurParams};
//!
//! let img = PixelBuffer::from_data(32, 32, 3, vec![90; 32 * 32 * 3]).unwrap();
//! let params = BlurParams::at(16, 16).with_size(12).with_kernel_size(5);
//! let outcome = apply(&img, &params).unwrap();
//! assert_eq!(outcome.image, img);
//! ```

use crate::region::area_len;
use crate::{convolve_timed, extract, integrate, Kernel, KernelShape, Mask, OpsError, OpsResult};
use feather_core::{try_alloc, PixelBuffer, Rect};
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, info, trace};

/// Which point of the region `(x, y)` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// `(x, y)` is the center of the region.
    #[default]
    Center,
    /// `(x, y)` is the top-left corner of the region.
    TopLeft,
}

/// Parameters of a feathered blur run.
///
/// Defaults: region 10, kernel 5, one pass, Gaussian kernel, centered.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurParams {
    /// Anchor X coordinate in pixels.
    pub x: u32,
    /// Anchor Y coordinate in pixels.
    pub y: u32,
    /// Side length of the square region.
    pub size: u32,
    /// Side length of the kernel and mask.
    pub kernel_size: u32,
    /// Number of extract/convolve/integrate passes.
    pub iterations: u32,
    /// Kernel weighting.
    pub kernel_shape: KernelShape,
    /// Meaning of `(x, y)`.
    pub anchor: Anchor,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            size: 10,
            kernel_size: 5,
            iterations: 1,
            kernel_shape: KernelShape::Gaussian,
            anchor: Anchor::Center,
        }
    }
}

impl BlurParams {
    /// Default parameters anchored at (x, y).
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Sets the region size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the kernel size.
    pub fn with_kernel_size(mut self, kernel_size: u32) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Sets the number of passes.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the kernel weighting.
    pub fn with_kernel_shape(mut self, shape: KernelShape) -> Self {
        self.kernel_shape = shape;
        self
    }

    /// Sets the anchor convention.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Checks the parameters without touching any buffer.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidGeometry`] if any size or the iteration count is
    /// zero, or the region is smaller than the kernel.
    pub fn validate(&self) -> OpsResult<()> {
        if self.kernel_size == 0 {
            return Err(OpsError::InvalidGeometry("kernel size must be positive".into()));
        }
        if self.size == 0 {
            return Err(OpsError::InvalidGeometry("region size must be positive".into()));
        }
        if self.iterations == 0 {
            return Err(OpsError::InvalidGeometry("iterations must be positive".into()));
        }
        if self.size < self.kernel_size {
            return Err(OpsError::InvalidGeometry(format!(
                "region size {} is smaller than kernel size {}",
                self.size, self.kernel_size
            )));
        }
        Ok(())
    }

    /// `(x, y)` clamped to `[0, width] x [0, height]`.
    pub fn clamped_anchor(&self, width: u32, height: u32) -> (u32, u32) {
        (self.x.min(width), self.y.min(height))
    }

    /// Resolves the square region inside a `width x height` image.
    ///
    /// The anchor point is clamped to `[0, width] x [0, height]` first; a
    /// centered region then moves up-left by `size / 2`, stopping at 0.
    ///
    /// ```rust
    /// use feather_core::Rect;
    /// use feather_ops::{Anchor, BlurParams};
    ///
    /// let p = BlurParams::at(50, 50).with_size(20);
    /// assert_eq!(p.region_in(100, 100), Rect::square(40, 40, 20));
    ///
    /// let corner = p.with_anchor(Anchor::TopLeft);
    /// assert_eq!(corner.region_in(30, 30), Rect::square(30, 30, 20));
    /// ```
    pub fn region_in(&self, width: u32, height: u32) -> Rect {
        let (x, y) = self.clamped_anchor(width, height);
        match self.anchor {
            Anchor::Center => {
                let half = self.size / 2;
                Rect::square(x.saturating_sub(half), y.saturating_sub(half), self.size)
            }
            Anchor::TopLeft => Rect::square(x, y, self.size),
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurReport {
    /// Region that was blurred (may overhang the image).
    pub region: Rect,
    /// Passes performed.
    pub passes: u32,
    /// Time spent inside convolution, summed over passes.
    pub convolve_time: Duration,
}

/// Result of [`apply`].
#[derive(Debug, Clone)]
pub struct BlurOutcome {
    /// Blurred copy of the source.
    pub image: PixelBuffer,
    /// Run summary.
    pub report: BlurReport,
}

/// Validated parameters plus the kernel and mask built from them.
///
/// Build once, then [`run`](Self::run) on as many buffers as needed.
#[derive(Debug, Clone)]
pub struct FeatherBlur {
    params: BlurParams,
    kernel: Kernel,
    mask: Mask,
}

impl FeatherBlur {
    /// Validates `params` and builds a normalized kernel and a ramp mask.
    pub fn new(params: BlurParams) -> OpsResult<Self> {
        params.validate()?;
        let kernel = Kernel::build(params.kernel_size as usize, params.kernel_shape, true)?;
        let mask = Mask::ramp(params.kernel_size as usize)?;
        Ok(Self {
            params,
            kernel,
            mask,
        })
    }

    /// Parameters this blur was built from.
    pub fn params(&self) -> &BlurParams {
        &self.params
    }

    /// Convolution kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Blend mask.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Runs every pass on `dest` in place.
    ///
    /// Both working buffers are reserved before the first pass and dropped
    /// on return, on success and failure alike.
    pub fn run(&self, dest: &mut PixelBuffer) -> OpsResult<BlurReport> {
        let region = self.params.region_in(dest.width(), dest.height());
        let channels = dest.channels();
        trace!(%region, channels, iterations = self.params.iterations, "FeatherBlur::run");

        let len = area_len(region, channels)
            .ok_or_else(|| OpsError::InvalidGeometry(format!("region {} too large", region)))?;
        let mut area_in = try_alloc(len, 0u8)?;
        let mut area_out = try_alloc(len, 0u8)?;

        let mut convolve_time = Duration::ZERO;
        for pass in 0..self.params.iterations {
            extract(dest, &mut area_in, region)?;
            convolve_time += convolve_timed(
                &area_in,
                &mut area_out,
                region,
                channels as usize,
                &*dest,
                &self.kernel,
            )?;
            integrate(&area_out, &self.mask, dest, region)?;
            debug!(pass = pass + 1, of = self.params.iterations, "Pass complete");
        }

        Ok(BlurReport {
            region,
            passes: self.params.iterations,
            convolve_time,
        })
    }
}

/// Blurs a copy of `source` and returns it.
///
/// Parameters are validated before anything is allocated.
pub fn apply(source: &PixelBuffer, params: &BlurParams) -> OpsResult<BlurOutcome> {
    let blur = FeatherBlur::new(params.clone())?;
    let mut image = source.try_clone()?;
    let report = blur.run(&mut image)?;
    info!(
        region = %report.region,
        passes = report.passes,
        kernel = params.kernel_size,
        shape = %params.kernel_shape,
        "Feathered blur applied"
    );
    Ok(BlurOutcome { image, report })
}

/// Blurs `dest` in place.
pub fn apply_in_place(dest: &mut PixelBuffer, params: &BlurParams) -> OpsResult<BlurReport> {
    FeatherBlur::new(params.clone())?.run(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let p = BlurParams::default();
        assert_eq!((p.size, p.kernel_size, p.iterations), (10, 5, 1));
        assert_eq!(p.anchor, Anchor::Center);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let cases = [
            BlurParams::default().with_kernel_size(0),
            BlurParams::default().with_size(0),
            BlurParams::default().with_iterations(0),
            BlurParams::default().with_size(4).with_kernel_size(5),
        ];
        for p in cases {
            assert!(matches!(p.validate(), Err(OpsError::InvalidGeometry(_))));
        }
        assert!(BlurParams::default().with_size(5).with_kernel_size(5).validate().is_ok());
    }

    #[test]
    fn test_region_center_clamps_at_origin() {
        let p = BlurParams::at(3, 2).with_size(10);
        assert_eq!(p.region_in(100, 100), Rect::square(0, 0, 10));
    }

    #[test]
    fn test_region_anchor_clamped_to_image() {
        let p = BlurParams::at(500, 700).with_size(10).with_anchor(Anchor::TopLeft);
        assert_eq!(p.region_in(64, 48), Rect::square(64, 48, 10));

        let c = BlurParams::at(500, 700).with_size(10);
        assert_eq!(c.region_in(64, 48), Rect::square(59, 43, 10));
        assert_eq!(c.clamped_anchor(64, 48), (64, 48));
        assert_eq!(BlurParams::at(3, 4).clamped_anchor(64, 48), (3, 4));
    }

    #[test]
    fn test_region_outside_image_leaves_it_untouched() {
        let data: Vec<u8> = (0..16 * 16).map(|i| (i % 251) as u8).collect();
        let img = PixelBuffer::from_data(16, 16, 1, data).unwrap();
        let p = BlurParams::at(16, 16).with_size(6).with_kernel_size(3).with_anchor(Anchor::TopLeft);
        let outcome = apply(&img, &p).unwrap();
        assert_eq!(outcome.image, img);
        assert_eq!(outcome.report.region, Rect::square(16, 16, 6));
    }

    #[test]
    fn test_in_place_matches_copy() {
        let data: Vec<u8> = (0..20 * 20 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let img = PixelBuffer::from_data(20, 20, 3, data).unwrap();
        let p = BlurParams::at(10, 10).with_size(8).with_kernel_size(3).with_iterations(2);

        let outcome = apply(&img, &p).unwrap();
        let mut in_place = img.clone();
        let report = apply_in_place(&mut in_place, &p).unwrap();

        assert_eq!(in_place, outcome.image);
        assert_eq!(report.passes, 2);
        assert_ne!(outcome.image, img);
    }

    #[test]
    fn test_feather_blur_builds_once() {
        let blur = FeatherBlur::new(BlurParams::default().with_kernel_size(3)).unwrap();
        assert_eq!(blur.kernel().size(), 3);
        assert_eq!(blur.mask().size(), 3);
        assert!((blur.kernel().sum() - 1.0).abs() < 1e-9);
    }
}
