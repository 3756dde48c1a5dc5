//! Filter selection and dispatch.
//!
//! The presentation layer describes the wanted filter with a
//! [`FilterSelection`], a loosely typed record of mode strings and numbers
//! that deserializes straight from JSON:
//!
//! ```json
//! { "mode": "blur", "params": { "mode": "motion", "subMode": "vertical", "distance": 4 } }
//! ```
//!
//! It is validated once into a [`FilterRequest`], a closed enum with one
//! variant per filter, and [`FilterRequest::apply`] dispatches on it.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filters::{
    self, BlurMode, Channel, FlipAxis, GrayscaleMode, Orientation, SobelMode,
};
use crate::raster::Raster;

// ============================================================================
// Boundary record
// ============================================================================

/// Mode-specific parameters of a [`FilterSelection`].
///
/// Which fields are required depends on the selection's mode; unused fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    /// Glass only. A missing seed is taken from the clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// A filter as chosen by the user: a mode name plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub mode: String,
    #[serde(default)]
    pub params: FilterParams,
}

impl FilterSelection {
    pub fn new(mode: impl Into<String>, params: FilterParams) -> Self {
        Self {
            mode: mode.into(),
            params,
        }
    }

    /// Parse a selection from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("Failed to parse filter: {e}")))
    }
}

// ============================================================================
// Validated request
// ============================================================================

/// A validated filter with typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRequest {
    /// Leave the raster as it is.
    Original,
    Flip(FlipAxis),
    Grayscale(GrayscaleMode),
    Monochrome(Channel),
    Dichrome(Channel),
    Glass { distance: usize, seed: u64 },
    Blur { mode: BlurMode, distance: usize },
    Posterize { step: u32 },
    Solarize { threshold: u8 },
    Edge(SobelMode),
}

impl FilterRequest {
    /// Short name of the filter, as used in selections.
    pub fn name(&self) -> &'static str {
        match self {
            FilterRequest::Original => "original",
            FilterRequest::Flip(_) => "flip",
            FilterRequest::Grayscale(_) => "grayscale",
            FilterRequest::Monochrome(_) => "monochrome",
            FilterRequest::Dichrome(_) => "dichrome",
            FilterRequest::Glass { .. } => "glass",
            FilterRequest::Blur { .. } => "blur",
            FilterRequest::Posterize { .. } => "posterize",
            FilterRequest::Solarize { .. } => "solarize",
            FilterRequest::Edge(_) => "edge",
        }
    }

    /// Run the filter on `raster`.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] for a zero posterize step. The raster is
    /// left untouched on error.
    pub fn apply(&self, raster: &mut Raster) -> Result<()> {
        debug!(
            "applying {} to {}x{} raster",
            self.name(),
            raster.width(),
            raster.height()
        );

        match *self {
            FilterRequest::Original => {}
            FilterRequest::Flip(axis) => filters::flip(raster, axis),
            FilterRequest::Grayscale(mode) => filters::grayscale(raster, mode),
            FilterRequest::Monochrome(channel) => filters::monochrome(raster, channel),
            FilterRequest::Dichrome(channel) => filters::dichrome(raster, channel),
            FilterRequest::Glass { distance, seed } => filters::glass(raster, distance, seed),
            FilterRequest::Blur { mode, distance } => filters::blur(raster, distance, mode),
            FilterRequest::Posterize { step } => filters::posterize(raster, step)?,
            FilterRequest::Solarize { threshold } => filters::solarize(raster, threshold),
            FilterRequest::Edge(mode) => filters::sobel(raster, mode),
        }
        Ok(())
    }
}

impl TryFrom<&FilterSelection> for FilterRequest {
    type Error = Error;

    fn try_from(selection: &FilterSelection) -> Result<Self> {
        parse_selection(selection).inspect_err(|e| {
            warn!("rejected {} filter selection: {}", selection.mode, e);
        })
    }
}

impl TryFrom<FilterSelection> for FilterRequest {
    type Error = Error;

    fn try_from(selection: FilterSelection) -> Result<Self> {
        FilterRequest::try_from(&selection)
    }
}

fn parse_selection(selection: &FilterSelection) -> Result<FilterRequest> {
    let params = &selection.params;

    let request = match selection.mode.as_str() {
        "original" => FilterRequest::Original,
        "flip" => FilterRequest::Flip(required(&params.axis, "axis")?.parse()?),
        "grayscale" => FilterRequest::Grayscale(GrayscaleMode::parse(
            required(&params.mode, "mode")?,
            params.sub_mode.as_deref(),
        )?),
        "monochrome" => FilterRequest::Monochrome(required(&params.mode, "mode")?.parse()?),
        "dichrome" => FilterRequest::Dichrome(required(&params.mode, "mode")?.parse()?),
        "glass" => FilterRequest::Glass {
            distance: distance(params.distance)?,
            seed: params.seed.unwrap_or_else(clock_seed),
        },
        "blur" => {
            let mode = match required(&params.mode, "mode")? {
                "motion" => {
                    let orientation: Orientation = required(&params.sub_mode, "subMode")?.parse()?;
                    BlurMode::Motion(orientation)
                }
                "box" => BlurMode::Box,
                "tent" => BlurMode::Tent,
                other => return Err(Error::invalid_parameter("blur mode", other)),
            };
            FilterRequest::Blur {
                mode,
                distance: distance(params.distance)?,
            }
        }
        "posterize" => {
            let step = params
                .step
                .ok_or_else(|| Error::invalid_parameter("step", "missing"))?;
            match u32::try_from(step) {
                Ok(step) if step >= 1 => FilterRequest::Posterize { step },
                _ => return Err(Error::invalid_parameter("step", step)),
            }
        }
        "solarize" => {
            let threshold = params
                .threshold
                .ok_or_else(|| Error::invalid_parameter("threshold", "missing"))?;
            let threshold =
                u8::try_from(threshold).map_err(|_| Error::invalid_parameter("threshold", threshold))?;
            FilterRequest::Solarize { threshold }
        }
        "edge" => match required(&params.mode, "mode")? {
            "sobel" => FilterRequest::Edge(required(&params.sub_mode, "subMode")?.parse()?),
            other => return Err(Error::invalid_parameter("edge mode", other)),
        },
        other => return Err(Error::invalid_parameter("mode", other)),
    };

    Ok(request)
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::invalid_parameter(name, "missing"))
}

fn distance(value: Option<i64>) -> Result<usize> {
    let value = value.ok_or_else(|| Error::invalid_parameter("distance", "missing"))?;
    usize::try_from(value).map_err(|_| Error::invalid_parameter("distance", value))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
