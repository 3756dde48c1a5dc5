//! Grayscale and channel-suppression filters.
//!
//! These are pure per-pixel transforms: every output pixel depends only on
//! the same pixel's original values, so no snapshot is taken. Alpha is
//! never touched.

use std::str::FromStr;

use log::debug;

use crate::error::Error;
use crate::raster::Raster;

/// Luminance weights (fixed-point era approximation, not BT.709)
const LUMA_R: f64 = 0.21;
const LUMA_G: f64 = 0.72;
const LUMA_B: f64 = 0.07;

// ============================================================================
// Modes
// ============================================================================

/// A color channel of an RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Index of the channel within a pixel.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Channel::Red),
            "green" => Ok(Channel::Green),
            "blue" => Ok(Channel::Blue),
            other => Err(Error::invalid_parameter("channel", other)),
        }
    }
}

/// Which extreme of R, G, B the decomposition mode keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

impl FromStr for Extreme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(Extreme::Max),
            "min" => Ok(Extreme::Min),
            other => Err(Error::invalid_parameter("decomposition", other)),
        }
    }
}

/// How a pixel's color is reduced to a single gray value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayscaleMode {
    /// Midpoint of the largest and smallest channel.
    Desaturation,
    /// Mean of R, G and B.
    Average,
    /// Weighted sum 0.21 R + 0.72 G + 0.07 B.
    Luminance,
    /// Largest or smallest channel.
    Decomposition(Extreme),
    /// A single channel copied to all three.
    SingleColor(Channel),
}

impl GrayscaleMode {
    /// Parse a mode name and its optional sub-mode.
    pub fn parse(mode: &str, sub_mode: Option<&str>) -> Result<Self, Error> {
        let sub = || sub_mode.ok_or_else(|| Error::invalid_parameter("subMode", "missing"));
        match mode {
            "desaturation" => Ok(GrayscaleMode::Desaturation),
            "average" => Ok(GrayscaleMode::Average),
            "luminance" => Ok(GrayscaleMode::Luminance),
            "decomposition" => Ok(GrayscaleMode::Decomposition(sub()?.parse()?)),
            "single-color" => Ok(GrayscaleMode::SingleColor(sub()?.parse()?)),
            other => Err(Error::invalid_parameter("grayscale mode", other)),
        }
    }

    /// Gray value for one pixel.
    #[inline]
    pub fn gray(self, r: u8, g: u8, b: u8) -> u8 {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        match self {
            GrayscaleMode::Desaturation => ((max as u16 + min as u16) / 2) as u8,
            GrayscaleMode::Average => ((r as u16 + g as u16 + b as u16) / 3) as u8,
            GrayscaleMode::Luminance => {
                let lum = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
                lum.floor().clamp(0.0, 255.0) as u8
            }
            GrayscaleMode::Decomposition(Extreme::Max) => max,
            GrayscaleMode::Decomposition(Extreme::Min) => min,
            GrayscaleMode::SingleColor(channel) => [r, g, b][channel.index()],
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Convert every pixel to gray using `mode`.
///
/// The gray value is written to R, G and B; alpha is preserved.
pub fn grayscale(raster: &mut Raster, mode: GrayscaleMode) {
    debug!(
        "grayscale {:?} on {}x{}",
        mode,
        raster.width(),
        raster.height()
    );

    for mut px in raster.pixels_mut() {
        let gray = mode.gray(px[0], px[1], px[2]);
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
    }
}

/// Keep only `keep`, zeroing the other two color channels.
pub fn monochrome(raster: &mut Raster, keep: Channel) {
    debug!("monochrome {:?}", keep);

    for mut px in raster.pixels_mut() {
        for c in 0..3 {
            if c != keep.index() {
                px[c] = 0;
            }
        }
    }
}

/// Zero `drop`, leaving the other two color channels unchanged.
pub fn dichrome(raster: &mut Raster, drop: Channel) {
    debug!("dichrome {:?}", drop);

    for mut px in raster.pixels_mut() {
        px[drop.index()] = 0;
    }
}
