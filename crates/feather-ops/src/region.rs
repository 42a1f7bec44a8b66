//! Region extraction.
//!
//! Copies a rectangle of the image into a caller-owned working buffer.
//! The rectangle may hang over the right or bottom image edge (its origin
//! is clamped to `[0, width] x [0, height]`, its size is not); overhanging
//! cells receive the nearest in-bounds pixel.

use crate::{OpsError, OpsResult};
use feather_core::{PixelBuffer, Rect};
use tracing::trace;

/// Number of samples a working buffer for `region` must hold.
///
/// Returns `None` on overflow.
pub fn area_len(region: Rect, channels: u8) -> Option<usize> {
    usize::try_from(region.area())
        .ok()
        .and_then(|n| n.checked_mul(channels as usize))
}

/// Copies `region` of `source` into `area`, channel-interleaved.
///
/// Source coordinates outside the image are clamped to the nearest valid
/// pixel (edge replication). No allocation; `area` must hold exactly
/// `region.width * region.height * channels` samples.
///
/// # Errors
///
/// [`OpsError::Extraction`] for an empty region or a wrongly sized `area`.
///
/// # Example
///
/// ```rust
/// use feather_core::{PixelBuffer, Rect};
/// use feather_ops::extract;
///
/// let img = PixelBuffer::from_data(2, 1, 1, vec![10, 20]).unwrap();
/// let mut area = vec![0u8; 3 * 2];
/// extract(&img, &mut area, Rect::new(1, 0, 3, 2)).unwrap();
/// assert_eq!(area, vec![20, 20, 20, 20, 20, 20]);
/// ```
pub fn extract(source: &PixelBuffer, area: &mut [u8], region: Rect) -> OpsResult<()> {
    trace!(%region, width = source.width(), height = source.height(), "extract");

    if region.is_empty() {
        return Err(OpsError::Extraction(format!("empty region {}", region)));
    }
    let channels = source.channels() as usize;
    let expected = area_len(region, source.channels())
        .ok_or_else(|| OpsError::Extraction(format!("region {} too large", region)))?;
    if area.len() != expected {
        return Err(OpsError::Extraction(format!(
            "working buffer holds {} samples, region {} needs {}",
            area.len(),
            region,
            expected
        )));
    }

    let max_x = source.width() - 1;
    let max_y = source.height() - 1;
    let data = source.as_bytes();
    let row_len = region.width as usize * channels;

    for (row, dst_row) in area.chunks_exact_mut(row_len).enumerate() {
        let sy = (region.y as u64 + row as u64).min(max_y as u64) as u32;
        for (col, dst) in dst_row.chunks_exact_mut(channels).enumerate() {
            let sx = (region.x as u64 + col as u64).min(max_x as u64) as u32;
            let idx = source.index(sx, sy);
            dst.copy_from_slice(&data[idx..idx + channels]);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 single-channel image where each sample encodes its position.
    fn numbered() -> PixelBuffer {
        let data = (0..12u8).collect();
        PixelBuffer::from_data(4, 3, 1, data).unwrap()
    }

    #[test]
    fn test_area_len() {
        assert_eq!(area_len(Rect::new(3, 4, 20, 10), 3), Some(600));
        assert_eq!(area_len(Rect::square(0, 0, 0), 4), Some(0));
        assert_eq!(area_len(Rect::square(0, 0, u32::MAX), 4), None);
    }

    #[test]
    fn test_extract_inside() {
        let img = numbered();
        let mut area = vec![0u8; 4];
        extract(&img, &mut area, Rect::square(1, 1, 2)).unwrap();
        assert_eq!(area, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_extract_replicates_edges() {
        let img = numbered();
        let mut area = vec![0u8; 9];
        extract(&img, &mut area, Rect::square(2, 1, 3)).unwrap();
        // Column 4 and row 3 fall outside and repeat the last column/row.
        assert_eq!(area, vec![6, 7, 7, 10, 11, 11, 10, 11, 11]);
    }

    #[test]
    fn test_extract_origin_at_far_edge() {
        let img = numbered();
        let mut area = vec![0u8; 4];
        extract(&img, &mut area, Rect::square(4, 3, 2)).unwrap();
        assert_eq!(area, vec![11; 4]);
    }

    #[test]
    fn test_extract_multichannel() {
        let img = PixelBuffer::from_data(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mut area = vec![0u8; 3 * 3];
        extract(&img, &mut area, Rect::new(0, 0, 3, 1)).unwrap();
        assert_eq!(area, vec![1, 2, 3, 4, 5, 6, 4, 5, 6]);
    }

    #[test]
    fn test_extract_rejects_bad_geometry() {
        let img = numbered();
        let mut area = vec![0u8; 4];
        assert!(matches!(
            extract(&img, &mut area, Rect::square(0, 0, 0)),
            Err(OpsError::Extraction(_))
        ));
        assert!(matches!(
            extract(&img, &mut area, Rect::square(0, 0, 3)),
            Err(OpsError::Extraction(_))
        ));
    }
}
