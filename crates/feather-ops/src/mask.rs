//! Radial blend masks.
//!
//! A [`Mask`] decides, per pixel, how much of the convolved value replaces
//! the original one. The ramp is 1.0 at the anchor cell and falls off
//! linearly with distance, reaching 0.0 at the farthest corner, which gives
//! the blurred region a feathered edge instead of a hard seam.
//!
//! Unlike a [`crate::Kernel`], a mask is never renormalized.
//!
//! ```text
//!  size 5 ramp (rounded)
//!  0.00 0.21 0.29 0.21 0.00
//!  0.21 0.50 0.65 0.50 0.21
//!  0.29 0.65 1.00 0.65 0.29
//!  0.21 0.50 0.65 0.50 0.21
//!  0.00 0.21 0.29 0.21 0.00
//! ```

use crate::kernel::alloc_matrix;
use crate::OpsResult;

/// Square matrix of blend weights in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    data: Vec<f64>,
    size: usize,
}

impl Mask {
    /// Builds a `size x size` radial ramp.
    ///
    /// # Errors
    ///
    /// [`crate::OpsError::Allocation`] if `size` is zero or the weights
    /// cannot be reserved.
    ///
    /// # Example
    ///
    /// ```rust
    /// use feather_ops::Mask;
    ///
    /// let m = Mask::ramp(5).unwrap();
    /// assert_eq!(m.weight(2, 2), 1.0);
    /// assert!(m.weight(0, 0) < m.weight(1, 1));
    /// ```
    pub fn ramp(size: usize) -> OpsResult<Self> {
        let mut data = alloc_matrix(size, "mask")?;
        let anchor = (size / 2) as f64;
        let reach = (2.0 * anchor * anchor).sqrt();

        for row in 0..size {
            for col in 0..size {
                let dy = row as f64 - anchor;
                let dx = col as f64 - anchor;
                data[row * size + col] = if reach == 0.0 {
                    1.0
                } else {
                    (1.0 - (dx * dx + dy * dy).sqrt() / reach).clamp(0.0, 1.0)
                };
            }
        }

        Ok(Self { data, size })
    }

    /// Builds a mask with the same weight everywhere.
    ///
    /// `weight` is clamped to `[0, 1]`. All-ones reproduces the convolved
    /// values, all-zeros leaves the image untouched.
    pub fn uniform(size: usize, weight: f64) -> OpsResult<Self> {
        let mut data = alloc_matrix(size, "mask")?;
        data.fill(weight.clamp(0.0, 1.0));
        Ok(Self { data, size })
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight at (row, col).
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Weight for pixel (col, row) of a region `area_w x area_h`.
    ///
    /// The mask is stretched over the region by nearest-cell lookup, so the
    /// region's center pixel lands on the anchor cell whenever the region is
    /// at least as large as the mask.
    ///
    /// ```rust
    /// use feather_ops::Mask;
    ///
    /// let m = Mask::ramp(5).unwrap();
    /// assert_eq!(m.weight_for(10, 10, 20, 20), 1.0);
    /// assert_eq!(m.weight_for(0, 0, 20, 20), m.weight(0, 0));
    /// ```
    #[inline]
    pub fn weight_for(&self, col: u32, row: u32, area_w: u32, area_h: u32) -> f64 {
        let mr = cell(row, area_h, self.size);
        let mc = cell(col, area_w, self.size);
        self.weight(mr, mc)
    }
}

#[inline]
fn cell(i: u32, extent: u32, size: usize) -> usize {
    let pos = (i as f64 + 0.5) * size as f64 / extent.max(1) as f64;
    (pos as usize).min(size - 1)
}
