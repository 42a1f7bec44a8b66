//! PNG format support.
//!
//! Decoding normalizes everything to 8 bits per sample: palette and
//! sub-byte images are expanded, 16-bit samples are stripped to their high
//! byte. The channel count (gray, gray+alpha, RGB, RGBA) is kept as is.
//!
//! # Example
//!
//! ```rust,ignore
//! use feather_io::png;
//!
//! let image = png::read("input.png")?;
//! png::write("output.png", &image)?;
//! ```

use crate::detect::PNG_MAGIC;
use crate::{ImageReader, ImageWriter, IoError, IoResult};
use feather_core::{try_alloc, PixelBuffer};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;
use tracing::debug;

/// PNG file reader.
#[derive(Debug, Clone, Default)]
pub struct PngReader;

impl PngReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    fn decode<R: BufRead + Seek>(&self, input: R) -> IoResult<PixelBuffer> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
        let mut buf = try_alloc(buf_size, 0u8)?;
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let channels = match (info.color_type, info.bit_depth) {
            (png::ColorType::Grayscale, png::BitDepth::Eight) => 1,
            (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => 2,
            (png::ColorType::Rgb, png::BitDepth::Eight) => 3,
            (png::ColorType::Rgba, png::BitDepth::Eight) => 4,
            (color_type, bit_depth) => {
                return Err(IoError::UnsupportedBitDepth(format!(
                    "{:?} {:?}",
                    color_type, bit_depth
                )));
            }
        };

        buf.truncate(info.buffer_size());
        debug!(width = info.width, height = info.height, channels, "Decoded PNG");
        Ok(PixelBuffer::from_data(info.width, info.height, channels, buf)?)
    }
}

impl ImageReader for PngReader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer> {
        let file = File::open(path.as_ref())?;
        self.decode(BufReader::new(file))
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        self.decode(Cursor::new(data))
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&PNG_MAGIC)
    }
}

/// PNG file writer.
///
/// Always writes 8 bits per sample with an sRGB chunk.
#[derive(Debug, Clone, Default)]
pub struct PngWriter;

impl PngWriter {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for PngWriter {
    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>> {
        let color_type = match image.channels() {
            1 => png::ColorType::Grayscale,
            2 => png::ColorType::GrayscaleAlpha,
            3 => png::ColorType::Rgb,
            4 => png::ColorType::Rgba,
            n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
        };

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(image.as_bytes())
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;

        Ok(out)
    }
}

/// Reads a PNG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    PngReader::new().read(path)
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    PngWriter::new().write(path, image)
}
