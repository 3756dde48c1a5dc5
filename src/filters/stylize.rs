//! Stylize filters: Posterize, Solarize.
//!
//! Per-pixel artistic effects on R, G, B. Alpha is preserved.

use log::debug;

use crate::error::{Error, Result};
use crate::raster::Raster;

// ============================================================================
// Posterize
// ============================================================================

/// Snap each color channel down to a multiple of `step`.
///
/// `step` is a divisor, not a level count: `value = (value / step) * step`
/// with truncating division. A step of 1 leaves the image unchanged and a
/// step above 255 turns every color channel black.
///
/// # Errors
/// [`Error::InvalidParameter`] if `step` is zero.
pub fn posterize(raster: &mut Raster, step: u32) -> Result<()> {
    if step == 0 {
        return Err(Error::invalid_parameter("step", step));
    }
    debug!("posterize step={}", step);

    for mut px in raster.pixels_mut() {
        for c in 0..3 {
            let v = px[c] as u32;
            px[c] = ((v / step) * step) as u8;
        }
    }
    Ok(())
}

// ============================================================================
// Solarize
// ============================================================================

/// Invert pixels whose average brightness is below `threshold`.
///
/// The average is `(R + G + B) / 3` floored. A threshold of 0 never inverts.
pub fn solarize(raster: &mut Raster, threshold: u8) {
    debug!("solarize threshold={}", threshold);

    for mut px in raster.pixels_mut() {
        let average = (px[0] as u16 + px[1] as u16 + px[2] as u16) / 3;
        if average < threshold as u16 {
            for c in 0..3 {
                px[c] = 255 - px[c];
            }
        }
    }
}
