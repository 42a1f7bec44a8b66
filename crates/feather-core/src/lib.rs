//! # feather-core
//!
//! Core types shared by the feather crates.
//!
//! - [`PixelBuffer`] - 8-bit, row-major, channel-interleaved image buffer
//! - [`Rect`] - Rectangular region in pixel coordinates
//! - [`Error`] - Buffer and geometry errors
//!
//! ## Crate Structure
//!
//! ```text
//! feather-core (this crate)
//!    ^
//!    |
//!    +-- feather-io (PNG/JPEG decode and encode)
//!    +-- feather-ops (kernel, mask, extract, convolve, integrate)
//!    +-- feather-cli (the `feather` binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod rect;

pub use buffer::{try_alloc, PixelBuffer, MAX_CHANNELS};
pub use error::{Error, Result};
pub use rect::Rect;
