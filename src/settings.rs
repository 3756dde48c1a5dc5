//! Render settings: a filter followed by a bit-depth pass.
//!
//! This is what the display layer runs every time it redraws: the selected
//! filter, then the bit-depth reducer. Settings load from JSON:
//!
//! ```json
//! {
//!   "filter": { "mode": "solarize", "params": { "threshold": 90 } },
//!   "bitDepth": { "depth": 3, "dither": "floyd-steinberg" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filters::{self, Dither};
use crate::raster::Raster;
use crate::request::{FilterRequest, FilterSelection};

/// Bit-depth pass as selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitDepthSelection {
    pub depth: i64,
    pub dither: String,
}

impl Default for BitDepthSelection {
    fn default() -> Self {
        Self {
            depth: 8,
            dither: "none".to_string(),
        }
    }
}

/// A validated bit-depth pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth {
    depth: u32,
    dither: Dither,
}

impl BitDepth {
    /// # Errors
    /// [`Error::InvalidParameter`] if `depth` is outside `1..=8`.
    pub fn new(depth: u32, dither: Dither) -> Result<Self> {
        filters::dither::quantization_step(depth)?;
        Ok(Self { depth, dither })
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn dither(&self) -> Dither {
        self.dither
    }

    pub fn apply(&self, raster: &mut Raster) -> Result<()> {
        filters::reduce_bit_depth(raster, self.depth, self.dither)
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self {
            depth: 8,
            dither: Dither::None,
        }
    }
}

impl TryFrom<&BitDepthSelection> for BitDepth {
    type Error = Error;

    fn try_from(selection: &BitDepthSelection) -> Result<Self> {
        let depth = u32::try_from(selection.depth)
            .map_err(|_| Error::invalid_parameter("depth", selection.depth))?;
        BitDepth::new(depth, selection.dither.parse()?)
    }
}

/// Everything needed to produce the displayed raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    pub filter: FilterSelection,
    #[serde(default)]
    pub bit_depth: BitDepthSelection,
}

impl RenderSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {e}")))
    }

    /// Validate both passes, then run the filter and the bit-depth pass.
    ///
    /// Nothing is written to `raster` unless every parameter is valid.
    pub fn apply(&self, raster: &mut Raster) -> Result<()> {
        let filter = FilterRequest::try_from(&self.filter)?;
        let bit_depth = BitDepth::try_from(&self.bit_depth)?;

        filter.apply(raster)?;
        bit_depth.apply(raster)
    }
}

/// Read render settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<RenderSettings> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read settings {}: {e}", path.display())))?;
    RenderSettings::from_json(&data)
}
