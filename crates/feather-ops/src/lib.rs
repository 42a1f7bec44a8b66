//! # feather-ops
//!
//! Localized feathered blur for 8-bit images.
//!
//! A square region of the image is blurred with a convolution kernel and
//! blended back through a radial mask, so the blur fades out toward the
//! region's edge instead of ending at a visible seam.
//!
//! # Modules
//!
//! - [`kernel`] - Convolution kernel construction
//! - [`mask`] - Radial blend masks
//! - [`region`] - Region extraction into a working buffer
//! - [`convolve`] - Kernel application with full-image fallback
//! - [`integrate`] - Mask-weighted write-back
//! - [`pipeline`] - Parameters and the multi-pass driver
//!
//! # Example
//!
//! ```rust
//! use feather_core::PixelBuffer;
//! use feather_ops::{apply, BlurParams, KernelShape};
//!
//! let img = PixelBuffer::new(64, 64, 3).unwrap();
//! let params = BlurParams::at(32, 32)
//!     .with_size(20)
//!     .with_kernel_size(5)
//!     .with_kernel_shape(KernelShape::Box)
//!     .with_iterations(2);
//! let outcome = apply(&img, &params).unwrap();
//! assert_eq!(outcome.report.passes, 2);
//! ```
//!
//! # Stages
//!
//! Each stage is exposed on its own for callers that manage buffers
//! themselves:
//!
//! ```rust,ignore
//! let region = params.region_in(img.width(), img.height());
//! extract(&img, &mut area_in, region)?;
//! convolve(&area_in, &mut area_out, region, channels, &img, &kernel)?;
//! integrate(&area_out, &mask, &mut img, region)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convolve;
pub mod integrate;
pub mod kernel;
pub mod mask;
pub mod pipeline;
pub mod region;

pub use convolve::{convolve, convolve_timed, SampleSource, TileSampler};
pub use error::{OpsError, OpsResult};
pub use integrate::integrate;
pub use kernel::{gaussian_sigma, Kernel, KernelShape};
pub use mask::Mask;
pub use pipeline::{apply, apply_in_place, Anchor, BlurOutcome, BlurParams, BlurReport, FeatherBlur};
pub use region::{area_len, extract};
