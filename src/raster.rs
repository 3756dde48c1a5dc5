//! RGBA raster storage.
//!
//! A [`Raster`] owns an `(height, width, 4)` array of `u8` in standard
//! (row-major) layout, so pixel `(x, y)` lives at byte offset
//! `(x + y * width) * 4` of the flat buffer handed in by the caller.
//!
//! Neighborhood filters read from a [`Snapshot`] taken at the start of the
//! pass and write into the live raster, so a pass never observes its own
//! writes.

use ndarray::{Array3, ArrayView3, ArrayViewMut1, ArrayViewMut3, Axis};

use crate::error::{Error, Result};

/// Number of channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An RGBA image with 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    data: Array3<u8>,
}

impl Raster {
    /// Wrap a flat RGBA buffer of length `width * height * 4`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        let invalid = Error::InvalidDimension { width, height, len };

        if width == 0 || height == 0 {
            return Err(invalid);
        }
        if width.checked_mul(height).and_then(|n| n.checked_mul(CHANNELS)) != Some(len) {
            return Err(invalid);
        }

        let data = Array3::from_shape_vec((height, width, CHANNELS), data).map_err(|_| invalid)?;
        Ok(Self { data })
    }

    /// Wrap an `(height, width, 4)` array.
    pub fn from_array(array: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = array.dim();
        if width == 0 || height == 0 || channels != CHANNELS {
            return Err(Error::InvalidDimension {
                width,
                height,
                len: array.len(),
            });
        }

        let data = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// A raster with every pixel set to `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        let data = rgba.repeat(width.saturating_mul(height));
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// The flat RGBA buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.data
            .as_slice()
            .expect("raster storage is always in standard layout")
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    pub(crate) fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.data.view_mut()
    }

    /// Whether `(x, y)` addresses a pixel of this raster.
    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        in_rectangle(x, y, self.width(), self.height())
    }

    /// Byte offset of pixel `(x, y)` in the flat buffer.
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width() && y < self.height()).then(|| (x + y * self.width()) * CHANNELS)
    }

    /// Read a pixel, failing with [`Error::OutOfBounds`] outside the raster.
    pub fn pixel(&self, x: isize, y: isize) -> Result<[u8; 4]> {
        if !self.contains(x, y) {
            return Err(Error::OutOfBounds { x, y });
        }
        Ok(self.get(x as usize, y as usize))
    }

    /// Write a pixel, failing with [`Error::OutOfBounds`] outside the raster.
    pub fn set_pixel(&mut self, x: isize, y: isize, rgba: [u8; 4]) -> Result<()> {
        if !self.contains(x, y) {
            return Err(Error::OutOfBounds { x, y });
        }
        self.put(x as usize, y as usize, rgba);
        Ok(())
    }

    /// Copy the current buffer for use as the read source of a filter pass.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data: self.data.clone(),
        }
    }

    /// Iterate over every pixel as a mutable 4-element lane, row by row.
    pub(crate) fn pixels_mut(&mut self) -> impl Iterator<Item = ArrayViewMut1<'_, u8>> {
        self.data.lanes_mut(Axis(2)).into_iter()
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> [u8; 4] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
            self.data[[y, x, 3]],
        ]
    }

    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        for (c, v) in rgba.into_iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    #[inline]
    pub(crate) fn channel(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[[y, x, c]]
    }

    #[inline]
    pub(crate) fn set_channel(&mut self, x: usize, y: usize, c: usize, value: u8) {
        self.data[[y, x, c]] = value;
    }
}

/// Read-only copy of a raster taken before a neighborhood pass.
#[derive(Debug)]
pub struct Snapshot {
    data: Array3<u8>,
}

impl Snapshot {
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// The pixel at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> Option<[u8; 4]> {
        if !in_rectangle(x, y, self.width(), self.height()) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some([
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
            self.data[[y, x, 3]],
        ])
    }
}

#[inline]
pub(crate) fn in_rectangle(x: isize, y: isize, width: usize, height: usize) -> bool {
    x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height
}
