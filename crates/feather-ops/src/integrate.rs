//! Region integration.
//!
//! Writes a convolved working buffer back into the image, blending each
//! sample toward the pixel it replaces:
//!
//! ```text
//! blended = m * convolved + (1 - m) * original
//! ```
//!
//! where `m` is the [`Mask`] weight stretched over the region.

use crate::convolve::quantize;
use crate::region::area_len;
use crate::{Mask, OpsError, OpsResult};
use feather_core::{PixelBuffer, Rect};
use tracing::trace;

/// Blends `area_out` (holding `region`) into `dest` through `mask`.
///
/// The original value is read from `dest` right before it is overwritten.
/// Region pixels that fall outside `dest` are dropped silently.
///
/// # Errors
///
/// [`OpsError::Integration`] for an empty region or an `area_out` whose
/// length does not match the region.
///
/// # Example
///
/// ```rust
/// use feather_core::{PixelBuffer, Rect};
/// use feather_ops::{integrate, Mask};
///
/// let mut img = PixelBuffer::from_data(2, 1, 1, vec![0, 0]).unwrap();
/// let half = Mask::uniform(1, 0.5).unwrap();
/// integrate(&[200, 100], &half, &mut img, Rect::new(0, 0, 2, 1)).unwrap();
/// assert_eq!(img.as_bytes(), &[100, 50]);
/// ```
pub fn integrate(area_out: &[u8], mask: &Mask, dest: &mut PixelBuffer, region: Rect) -> OpsResult<()> {
    trace!(%region, width = dest.width(), height = dest.height(), "integrate");

    if region.is_empty() {
        return Err(OpsError::Integration(format!("empty region {}", region)));
    }
    let expected = area_len(region, dest.channels())
        .ok_or_else(|| OpsError::Integration(format!("region {} too large", region)))?;
    if area_out.len() != expected {
        return Err(OpsError::Integration(format!(
            "working buffer holds {} samples, region {} needs {}",
            area_out.len(),
            region,
            expected
        )));
    }

    let Some(visible) = region.clamp_to(dest.width(), dest.height()) else {
        trace!(%region, "Region lies outside the image, nothing to write");
        return Ok(());
    };

    let channels = dest.channels() as usize;
    for y in visible.y..visible.bottom() {
        let row = y - region.y;
        for x in visible.x..visible.right() {
            let col = x - region.x;
            let m = mask.weight_for(col, row, region.width, region.height);
            let src = (row as usize * region.width as usize + col as usize) * channels;
            let dst = dest.index(x, y);
            let pixels = dest.as_bytes_mut();
            for c in 0..channels {
                let original = pixels[dst + c] as f64;
                let convolved = area_out[src + c] as f64;
                pixels[dst + c] = quantize(m * convolved + (1.0 - m) * original);
            }
        }
    }

    Ok(())
}
