//! Filter modules for RGBA rasters.
//!
//! Every filter mutates a [`Raster`](crate::Raster) in place and keeps its
//! dimensions. Filters that need spatial context (flip, glass, blur, Sobel)
//! read from a snapshot taken at the start of the pass, so results never
//! depend on the order pixels are written in.
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: grayscale, monochrome, dichrome, posterize, solarize
//! - **Geometry**: flip
//! - **Noise**: glass
//! - **Blur**: motion, box, tent
//! - **Edge detection**: linear and combined Sobel
//! - **Bit depth**: quantization with optional Floyd-Steinberg dithering
//!
//! Alpha is preserved everywhere except blur (averaged with the color
//! channels) and Sobel (forced to 255).

use std::str::FromStr;

use crate::error::Error;

pub mod blur;
pub mod dither;
pub mod edge;
pub mod geometry;
pub mod grayscale;
pub mod noise;
pub mod stylize;

pub use blur::{blur, box_blur, motion_blur, tent_blur, BlurMode};
pub use dither::{reduce_bit_depth, Dither};
pub use edge::{combined_sobel, linear_sobel, sobel, SobelMode};
pub use geometry::{flip, FlipAxis};
pub use grayscale::{dichrome, grayscale, monochrome, Channel, Extreme, GrayscaleMode};
pub use noise::glass;
pub use stylize::{posterize, solarize};

/// Axis a one-dimensional pass runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Along each column (top to bottom).
    Vertical,
    /// Along each row (left to right).
    Horizontal,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(Error::invalid_parameter("orientation", other)),
        }
    }
}
