//! WebAssembly exports for rasterfx.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat RGBA byte arrays (length = width * height * 4), the
//! layout of a canvas `ImageData`. Errors are returned as JS strings.

use wasm_bindgen::prelude::*;

use crate::{BitDepth, FilterRequest, FilterSelection, Raster, RenderSettings};

fn to_js_err(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// Filters
// ============================================================================

/// Apply one filter to an RGBA image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `selection` - Filter as JSON, e.g. `{"mode": "solarize", "params": {"threshold": 80}}`
///
/// # Returns
/// Flat array of filtered RGBA bytes
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    selection: &str,
) -> Result<Vec<u8>, JsValue> {
    let request = FilterSelection::from_json(selection)
        .and_then(FilterRequest::try_from)
        .map_err(to_js_err)?;
    let mut raster = Raster::new(width, height, data.to_vec()).map_err(to_js_err)?;

    request.apply(&mut raster).map_err(to_js_err)?;
    Ok(raster.into_bytes())
}

// ============================================================================
// Bit Depth
// ============================================================================

/// Reduce an RGBA image to `depth` bits per color channel.
///
/// `dither` is `"none"` or `"floyd-steinberg"`.
#[wasm_bindgen]
pub fn reduce_bit_depth_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    depth: u32,
    dither: &str,
) -> Result<Vec<u8>, JsValue> {
    let pass = dither
        .parse()
        .and_then(|dither| BitDepth::new(depth, dither))
        .map_err(to_js_err)?;
    let mut raster = Raster::new(width, height, data.to_vec()).map_err(to_js_err)?;

    pass.apply(&mut raster).map_err(to_js_err)?;
    Ok(raster.into_bytes())
}

// ============================================================================
// Full Render
// ============================================================================

/// Run render settings (filter, then bit depth) on an RGBA image.
///
/// # Arguments
/// * `settings` - JSON with `filter` and optional `bitDepth`
#[wasm_bindgen]
pub fn render_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    settings: &str,
) -> Result<Vec<u8>, JsValue> {
    let settings = RenderSettings::from_json(settings).map_err(to_js_err)?;
    let mut raster = Raster::new(width, height, data.to_vec()).map_err(to_js_err)?;

    settings.apply(&mut raster).map_err(to_js_err)?;
    Ok(raster.into_bytes())
}
