//! Bit-depth reduction with optional Floyd-Steinberg error diffusion.
//!
//! Each color channel is snapped to a multiple of `256 / 2^depth` by
//! rounding. Without dithering every pixel is quantized on its own. With
//! Floyd-Steinberg the quantization error is pushed into neighboring
//! pixels, scanning column by column (x outer, y inner).
//!
//! Stores behave like a byte-clamped buffer: every write saturates to
//! 0-255, while the error is computed from the unclamped quantized value.

use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// Error diffusion targets as `(dx, dy, weight / 16)`.
const FLOYD_STEINBERG: [(isize, isize, i32); 4] = [(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)];

/// Dithering applied while reducing bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    #[default]
    None,
    FloydSteinberg,
}

impl FromStr for Dither {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(Dither::None),
            "floyd-steinberg" => Ok(Dither::FloydSteinberg),
            other => Err(Error::invalid_parameter("dither", other)),
        }
    }
}

/// Quantization step for a bit depth in `1..=8`.
pub fn quantization_step(depth: u32) -> Result<i32> {
    if !(1..=8).contains(&depth) {
        return Err(Error::invalid_parameter("depth", depth));
    }
    Ok(256 >> depth)
}

/// `round(value / step) * step`, rounding halves up. May return 256.
#[inline]
fn quantize(value: i32, step: i32) -> i32 {
    ((2 * value + step) / (2 * step)) * step
}

#[inline]
fn saturate(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Reduce R, G and B to `depth` bits per channel.
///
/// Depth 8 leaves the raster unchanged with either dither mode.
///
/// # Errors
/// [`Error::InvalidParameter`] if `depth` is outside `1..=8`.
pub fn reduce_bit_depth(raster: &mut Raster, depth: u32, dither: Dither) -> Result<()> {
    let step = quantization_step(depth)?;
    debug!(
        "bit depth {} ({:?}) on {}x{}",
        depth,
        dither,
        raster.width(),
        raster.height()
    );

    match dither {
        Dither::None => quantize_plain(raster, step),
        Dither::FloydSteinberg => floyd_steinberg(raster, step),
    }
    Ok(())
}

fn quantize_plain(raster: &mut Raster, step: i32) {
    for mut px in raster.pixels_mut() {
        for c in 0..3 {
            px[c] = saturate(quantize(px[c] as i32, step));
        }
    }
}

fn floyd_steinberg(raster: &mut Raster, step: i32) {
    let (width, height) = (raster.width(), raster.height());

    for x in 0..width {
        for y in 0..height {
            for c in 0..3 {
                let old = raster.channel(x, y, c) as i32;
                let new = quantize(old, step);
                raster.set_channel(x, y, c, saturate(new));

                let error = old - new;
                if error == 0 {
                    continue;
                }

                for (dx, dy, weight) in FLOYD_STEINBERG {
                    let (nx, ny) = (x as isize + dx, y as isize + dy);
                    if !raster.contains(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    // Integer division truncates toward zero.
                    let value = raster.channel(nx, ny, c) as i32 + error * weight / 16;
                    raster.set_channel(nx, ny, c, saturate(value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: usize, height: usize, values: &[u8]) -> Raster {
        let data = values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        Raster::new(width, height, data).unwrap()
    }

    fn reds(raster: &Raster) -> Vec<u8> {
        raster.as_bytes().chunks(4).map(|px| px[0]).collect()
    }

    fn ramp() -> Raster {
        let data: Vec<u8> = (0..256u32).map(|v| (v * 97 % 256) as u8).collect();
        Raster::new(8, 8, data).unwrap()
    }

    #[test]
    fn test_quantization_steps() {
        assert_eq!(quantization_step(1).unwrap(), 128);
        assert_eq!(quantization_step(4).unwrap(), 16);
        assert_eq!(quantization_step(8).unwrap(), 1);
        assert!(quantization_step(0).is_err());
        assert!(quantization_step(9).is_err());
    }

    #[test]
    fn test_quantize_rounds_half_up() {
        assert_eq!(quantize(64, 128), 128);
        assert_eq!(quantize(63, 128), 0);
        assert_eq!(quantize(200, 128), 256);
        assert_eq!(quantize(8, 16), 16);
        assert_eq!(quantize(7, 16), 0);
        assert_eq!(quantize(123, 1), 123);
    }

    #[test]
    fn test_depth_eight_is_identity() {
        for dither in [Dither::None, Dither::FloydSteinberg] {
            let mut raster = ramp();
            let original = raster.clone();
            reduce_bit_depth(&mut raster, 8, dither).unwrap();
            assert_eq!(raster, original);
        }
    }

    #[test]
    fn test_plain_quantization_saturates_and_keeps_alpha() {
        let mut raster = Raster::new(2, 1, vec![200, 64, 63, 17, 255, 0, 128, 99]).unwrap();
        reduce_bit_depth(&mut raster, 1, Dither::None).unwrap();
        assert_eq!(raster.as_bytes(), &[255, 128, 0, 17, 255, 0, 128, 99]);
    }

    #[test]
    fn test_floyd_steinberg_column_major_diffusion() {
        // 2x2, all 60, one bit per channel.
        let mut raster = gray(2, 2, &[60, 60, 60, 60]);
        reduce_bit_depth(&mut raster, 1, Dither::FloydSteinberg).unwrap();

        // (1,0) pushes error back into the already visited (0,1).
        assert_eq!(reds(&raster), vec![0, 128, 121, 0]);
        assert!(raster.as_bytes().chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_floyd_steinberg_single_pixel_matches_plain() {
        let mut dithered = gray(1, 1, &[150]);
        let mut plain = dithered.clone();
        reduce_bit_depth(&mut dithered, 2, Dither::FloydSteinberg).unwrap();
        reduce_bit_depth(&mut plain, 2, Dither::None).unwrap();
        assert_eq!(dithered, plain);
    }

    #[test]
    fn test_invalid_depth_leaves_raster_untouched() {
        let mut raster = ramp();
        let original = raster.clone();
        assert!(reduce_bit_depth(&mut raster, 0, Dither::None).is_err());
        assert!(reduce_bit_depth(&mut raster, 9, Dither::FloydSteinberg).is_err());
        assert_eq!(raster, original);
    }

    #[test]
    fn test_parse_dither() {
        assert_eq!("none".parse::<Dither>().unwrap(), Dither::None);
        assert_eq!(
            "floyd-steinberg".parse::<Dither>().unwrap(),
            Dither::FloydSteinberg
        );
        assert!("atkinson".parse::<Dither>().is_err());
    }
}
