//! Flip filter.
//!
//! Mirrors the raster around its vertical axis, horizontal axis, or both.
//! The source coordinate for target `(i, j)` is `width - i` / `height - j`,
//! so the mirror is shifted by one pixel: the first column (or row) has no
//! source inside the raster and is left as it was.

use std::str::FromStr;

use log::debug;

use crate::error::Error;
use crate::raster::Raster;

/// Axis a flip mirrors across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Swap top and bottom.
    Horizontal,
    /// Swap left and right.
    Vertical,
    Both,
}

impl FlipAxis {
    fn mirrors_columns(self) -> bool {
        matches!(self, FlipAxis::Vertical | FlipAxis::Both)
    }

    fn mirrors_rows(self) -> bool {
        matches!(self, FlipAxis::Horizontal | FlipAxis::Both)
    }
}

impl FromStr for FlipAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(FlipAxis::Horizontal),
            "vertical" => Ok(FlipAxis::Vertical),
            "both" => Ok(FlipAxis::Both),
            other => Err(Error::invalid_parameter("axis", other)),
        }
    }
}

/// Flip the raster across `axis`.
///
/// Target pixels whose mirrored source falls outside the raster keep their
/// original value. Flipping twice with the same axis restores the input.
pub fn flip(raster: &mut Raster, axis: FlipAxis) {
    let (width, height) = (raster.width(), raster.height());
    debug!("flip {:?} on {}x{}", axis, width, height);

    let backup = raster.snapshot();

    for i in 0..width {
        for j in 0..height {
            let si = if axis.mirrors_columns() { width - i } else { i };
            let sj = if axis.mirrors_rows() { height - j } else { j };

            if let Some(px) = backup.get(si as isize, sj as isize) {
                raster.put(i, j, px);
            }
        }
    }
}
