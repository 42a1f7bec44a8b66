//! JPEG format support.
//!
//! JPEG is 8-bit only and carries no alpha. Decoding maps the decoder's
//! pixel formats onto the buffer layouts:
//!
//! | Decoder format | Channels | Conversion                 |
//! |----------------|----------|----------------------------|
//! | `L8`           | 1        | none                       |
//! | `L16`          | 1        | high byte kept             |
//! | `RGB24`        | 3        | none                       |
//! | `CMYK32`       | 3        | naive CMYK to RGB          |
//!
//! Encoding accepts every channel count; alpha is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use feather_io::jpeg::{JpegWriter, JpegWriterOptions};
//! use feather_io::ImageWriter;
//!
//! let writer = JpegWriter::with_options(JpegWriterOptions { quality: 95 });
//! writer.write("preview.jpg", &image)?;
//! ```

use crate::detect::JPEG_MAGIC;
use crate::{ImageReader, ImageWriter, IoError, IoResult};
use feather_core::PixelBuffer;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::debug;

// ============================================================================
// Options
// ============================================================================

/// Options for writing JPEG files.
#[derive(Debug, Clone)]
pub struct JpegWriterOptions {
    /// Quality level 1-100. Higher = better quality, larger files.
    /// Default: 90.
    pub quality: u8,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

// ============================================================================
// JpegReader
// ============================================================================

/// JPEG file reader.
#[derive(Debug, Clone, Default)]
pub struct JpegReader;

impl JpegReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    fn decode<R: Read>(&self, input: R) -> IoResult<PixelBuffer> {
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(input));
        let pixels = decoder
            .decode()
            .map_err(|e| IoError::DecodeError(e.to_string()))?;
        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

        let width = info.width as u32;
        let height = info.height as u32;

        let (channels, data) = match info.pixel_format {
            jpeg_decoder::PixelFormat::L8 => (1, pixels),
            jpeg_decoder::PixelFormat::RGB24 => (3, pixels),
            jpeg_decoder::PixelFormat::L16 => {
                // Big-endian samples, keep the high byte.
                (1, pixels.chunks_exact(2).map(|l16| l16[0]).collect())
            }
            jpeg_decoder::PixelFormat::CMYK32 => {
                let rgb = pixels
                    .chunks_exact(4)
                    .flat_map(|cmyk| {
                        let k = 1.0 - cmyk[3] as f32 / 255.0;
                        let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0).round() as u8;
                        [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
                    })
                    .collect();
                (3, rgb)
            }
        };

        debug!(width, height, channels, format = ?info.pixel_format, "Decoded JPEG");
        Ok(PixelBuffer::from_data(width, height, channels, data)?)
    }
}

impl ImageReader for JpegReader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer> {
        let data = std::fs::read(path.as_ref())?;
        self.decode(Cursor::new(data))
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        self.decode(Cursor::new(data))
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&JPEG_MAGIC)
    }
}

// ============================================================================
// JpegWriter
// ============================================================================

/// JPEG file writer.
#[derive(Debug, Clone, Default)]
pub struct JpegWriter {
    options: JpegWriterOptions,
}

impl JpegWriter {
    /// Creates a writer with default options (quality 90).
    pub fn new() -> Self {
        Self::with_options(JpegWriterOptions::default())
    }

    /// Creates a writer with custom options.
    pub fn with_options(options: JpegWriterOptions) -> Self {
        Self { options }
    }
}

impl ImageWriter for JpegWriter {
    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>> {
        use jpeg_encoder::{ColorType, Encoder};

        let width = u16::try_from(image.width())
            .map_err(|_| IoError::EncodeError(format!("width {} exceeds JPEG limit", image.width())))?;
        let height = u16::try_from(image.height())
            .map_err(|_| IoError::EncodeError(format!("height {} exceeds JPEG limit", image.height())))?;

        let bytes = image.as_bytes();
        let (color_type, pixels): (ColorType, Vec<u8>) = match image.channels() {
            1 => (ColorType::Luma, bytes.to_vec()),
            2 => (ColorType::Luma, bytes.chunks_exact(2).map(|ga| ga[0]).collect()),
            3 => (ColorType::Rgb, bytes.to_vec()),
            4 => (
                ColorType::Rgb,
                bytes
                    .chunks_exact(4)
                    .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                    .collect(),
            ),
            n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
        };

        let mut buffer = Vec::new();
        let encoder = Encoder::new(&mut buffer, self.options.quality.clamp(1, 100));
        encoder
            .encode(&pixels, width, height, color_type)
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

        Ok(buffer)
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Reads a JPEG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    JpegReader::new().read(path)
}

/// Writes a JPEG file with default options (quality 90).
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    JpegWriter::new().write(path, image)
}

// ============================================================================
// Tests
// ============================================================================
