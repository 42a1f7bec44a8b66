//! Convolution kernels.
//!
//! A [`Kernel`] is a square matrix of `f64` weights. Its anchor cell is
//! `(size / 2, size / 2)`, the same offset [`crate::convolve`] centers the
//! neighborhood on, so even sizes work and simply lean toward the top-left.
//!
//! # Shapes
//!
//! - [`KernelShape::Box`] - Simple average
//! - [`KernelShape::Tent`] - Linear falloff with distance from the anchor
//! - [`KernelShape::Gaussian`] - Gaussian falloff, sigma derived from size
//!
//! Every shape is a blur: weights never grow with distance from the anchor.
//!
//! # Example
//!
//! ```rust
//! use feather_ops::kernel::{Kernel, KernelShape};
//!
//! let k = Kernel::build(5, KernelShape::Box, true).unwrap();
//! assert_eq!(k.size(), 5);
//! assert!((k.weight(0, 0) - 1.0 / 25.0).abs() < 1e-12);
//! ```

use crate::{OpsError, OpsResult};
use feather_core::try_alloc;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Weighting function used by [`Kernel::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelShape {
    /// Equal weights.
    Box,
    /// Weight falls off linearly with distance from the anchor.
    Tent,
    /// Weight follows a Gaussian of the distance from the anchor.
    #[default]
    Gaussian,
}

impl std::fmt::Display for KernelShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Box => "box",
            Self::Tent => "tent",
            Self::Gaussian => "gaussian",
        })
    }
}

/// Square convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    size: usize,
}

impl Kernel {
    /// Builds a `size x size` kernel of the given shape.
    ///
    /// With `normalize`, every weight is divided by the total so the kernel
    /// sums to 1.0 and convolution preserves average brightness.
    ///
    /// # Errors
    ///
    /// [`OpsError::Allocation`] if `size` is zero or the weights cannot be
    /// reserved; [`OpsError::InvalidGeometry`] if `size * size` overflows.
    pub fn build(size: usize, shape: KernelShape, normalize: bool) -> OpsResult<Self> {
        trace!(size, %shape, normalize, "Kernel::build");

        let mut data = alloc_matrix(size, "kernel")?;
        let anchor = (size / 2) as f64;
        // Farthest cell from the anchor is the top-left corner.
        let reach = (2.0 * anchor * anchor).sqrt();
        let sigma = gaussian_sigma(size);
        let sigma2 = 2.0 * sigma * sigma;

        for row in 0..size {
            for col in 0..size {
                let dy = row as f64 - anchor;
                let dx = col as f64 - anchor;
                let d2 = dx * dx + dy * dy;
                data[row * size + col] = match shape {
                    KernelShape::Box => 1.0,
                    KernelShape::Tent => 1.0 - d2.sqrt() / (reach + 1.0),
                    KernelShape::Gaussian => (-d2 / sigma2).exp(),
                };
            }
        }

        if normalize {
            let sum: f64 = data.iter().sum();
            for w in &mut data {
                *w /= sum;
            }
        }

        debug!(size, %shape, normalize, "Built kernel");
        Ok(Self { data, size })
    }

    /// Creates a kernel from explicit row-major weights.
    ///
    /// ```rust
    /// use feather_ops::kernel::Kernel;
    ///
    /// let identity = Kernel::from_weights(1, vec![1.0]).unwrap();
    /// assert_eq!(identity.sum(), 1.0);
    /// assert!(Kernel::from_weights(2, vec![1.0; 3]).is_err());
    /// ```
    pub fn from_weights(size: usize, weights: Vec<f64>) -> OpsResult<Self> {
        if size == 0 || weights.len() != size * size {
            return Err(OpsError::InvalidGeometry(format!(
                "kernel data size {} doesn't match {}x{}",
                weights.len(),
                size,
                size
            )));
        }
        Ok(Self {
            data: weights,
            size,
        })
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row and column of the anchor cell.
    #[inline]
    pub fn anchor(&self) -> usize {
        self.size / 2
    }

    /// Weight at (row, col).
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.data
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Gaussian sigma for a kernel of `size` taps.
///
/// Same rule of thumb common imaging libraries use when only an aperture
/// is given: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_sigma(size: usize) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Reserves a zeroed `size x size` matrix of weights.
pub(crate) fn alloc_matrix(size: usize, what: &str) -> OpsResult<Vec<f64>> {
    if size == 0 {
        return Err(OpsError::Allocation {
            requested: 0,
            reason: format!("{} size must be positive", what),
        });
    }
    let len = size.checked_mul(size).ok_or_else(|| {
        OpsError::InvalidGeometry(format!("{} size {} overflows", what, size))
    })?;
    Ok(try_alloc(len, 0.0f64)?)
}
