//! 8-bit pixel buffer.
//!
//! [`PixelBuffer`] is the decoded form of an image: `width * height *
//! channels` samples, one byte each.
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, top-to-bottom, channels interleaved:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  ← Row 0
//!         [R G B R G B R G B ...]  ← Row 1
//!         ...
//! ```
//!
//! # Allocation
//!
//! Every buffer is reserved through [`try_alloc`], so an oversized image
//! reports [`Error::AllocationFailed`] instead of aborting the process.
//!
//! # Usage
//!
//! ```rust
//! use feather_core::PixelBuffer;
//!
//! let mut img = PixelBuffer::new(4, 4, 3).unwrap();
//! img.set_pixel(1, 2, &[255, 128, 0]).unwrap();
//! assert_eq!(img.pixel(1, 2).unwrap(), &[255, 128, 0]);
//!
//! // Reads outside the image replicate the nearest edge pixel
//! assert_eq!(img.sample_clamped(-5, 2, 0), img.sample_clamped(0, 2, 0));
//! ```

use crate::{Error, Rect, Result};

/// Largest supported channel count (RGBA).
pub const MAX_CHANNELS: u8 = 4;

/// Reserves exactly `len` elements and fills them with `fill`.
///
/// Uses [`Vec::try_reserve_exact`], so allocator exhaustion is returned as
/// [`Error::AllocationFailed`] with the requested byte count.
///
/// # Example
///
/// ```rust
/// use feather_core::try_alloc;
///
/// let buf = try_alloc(16, 0u8).unwrap();
/// assert_eq!(buf.len(), 16);
/// ```
pub fn try_alloc<T: Clone>(len: usize, fill: T) -> Result<Vec<T>> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| Error::allocation_failed(bytes, e.to_string()))?;
    data.resize(len, fill);
    Ok(data)
}

/// Owned 8-bit image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for a zero dimension, a channel count
    ///   outside `1..=4`, or a sample count that overflows `usize`
    /// - [`Error::AllocationFailed`] if the samples cannot be reserved
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        let len = Self::layout_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: try_alloc(len, 0u8)?,
        })
    }

    /// Wraps existing sample data.
    ///
    /// `data` must hold exactly `width * height * channels` samples.
    ///
    /// ```rust
    /// use feather_core::PixelBuffer;
    ///
    /// let img = PixelBuffer::from_data(2, 2, 1, vec![0, 64, 128, 255]).unwrap();
    /// assert_eq!(img.sample_count(), 4);
    /// assert!(PixelBuffer::from_data(2, 2, 1, vec![0; 3]).is_err());
    /// ```
    pub fn from_data(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = Self::layout_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Copies this buffer through [`try_alloc`].
    ///
    /// Unlike [`Clone::clone`], a failed reservation is reported instead of
    /// aborting.
    pub fn try_clone(&self) -> Result<Self> {
        let mut data = try_alloc(self.data.len(), 0u8)?;
        data.copy_from_slice(&self.data);
        Ok(Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        })
    }

    fn layout_len(width: u32, height: u32, channels: u8) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "zero-sized image"));
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("unsupported channel count {}", channels),
            ));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "sample count overflow"))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// The full image as a rectangle at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Total number of samples (pixels * channels).
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    /// Raw samples.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw samples, mutable.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Index of the first sample of pixel (x, y). Caller checks bounds.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// Returns the samples of pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Result<&[u8]> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let idx = self.index(x, y);
        Ok(&self.data[idx..idx + self.channels as usize])
    }

    /// Overwrites pixel (x, y). `value` must have one sample per channel.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: &[u8]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        if value.len() != self.channels as usize {
            return Err(Error::channel_mismatch(self.channels as usize, value.len()));
        }
        let idx = self.index(x, y);
        self.data[idx..idx + value.len()].copy_from_slice(value);
        Ok(())
    }

    /// Reads one sample at a signed coordinate with edge replication.
    ///
    /// Coordinates outside `[0, width) x [0, height)` are clamped to the
    /// nearest valid pixel; nothing outside the buffer is ever read.
    #[inline]
    pub fn sample_clamped(&self, x: i64, y: i64, channel: usize) -> u8 {
        let sx = x.clamp(0, self.width as i64 - 1) as usize;
        let sy = y.clamp(0, self.height as i64 - 1) as usize;
        let c = channel.min(self.channels as usize - 1);
        self.data[(sy * self.width as usize + sx) * self.channels as usize + c]
    }
}
