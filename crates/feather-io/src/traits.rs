//! I/O traits for image readers and writers.

use crate::IoResult;
use feather_core::PixelBuffer;
use std::path::Path;

/// Trait for image format readers.
///
/// # Example
///
/// ```rust,ignore
/// use feather_io::{ImageReader, png::PngReader};
///
/// let image = PngReader::new().read("input.png")?;
/// ```
pub trait ImageReader {
    /// Reads an image from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer>;

    /// Reads an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer>;

    /// Returns true if `header` starts with this format's signature.
    fn can_read(&self, header: &[u8]) -> bool;
}

/// Trait for image format writers.
pub trait ImageWriter {
    /// Writes an image to a file path.
    ///
    /// The image is encoded completely before the file is created.
    fn write<P: AsRef<Path>>(&self, path: P, image: &PixelBuffer) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }

    /// Writes an image to memory.
    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>>;
}
