//! Error types shared by every filter.

use thiserror::Error;

/// Errors reported by raster construction, filter validation and settings
/// parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero width or height, or a buffer whose length is not `width * height * 4`.
    #[error("invalid raster dimensions: {width}x{height} with {len} bytes")]
    InvalidDimension {
        width: usize,
        height: usize,
        len: usize,
    },

    /// A filter parameter is out of range or a mode string is not recognized.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// A checked pixel accessor was called with coordinates outside the raster.
    #[error("pixel ({x}, {y}) is outside the raster")]
    OutOfBounds { x: isize, y: isize },

    /// Settings could not be read or parsed.
    #[error("{0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, value: impl ToString) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

/// Result type for raster operations
pub type Result<T> = std::result::Result<T, Error>;
