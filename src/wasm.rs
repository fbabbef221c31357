//! WebAssembly exports for the dehaze pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. The host reads
//! pixels from a canvas (`ImageData.data`), calls in, and writes the returned
//! bytes back with `putImageData`.
//!
//! Errors surface as thrown JavaScript strings.

use wasm_bindgen::prelude::*;

use crate::buffer::rgba_view;
use crate::error::DehazeError;
use crate::filters::haze::estimate_atmosphere;
use crate::params::PipelineParams;
use crate::pipeline::process;

fn to_js(e: DehazeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ============================================================================
// Pipeline
// ============================================================================

/// Dehaze an RGBA u8 image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `params_json` - JSON object of pipeline parameters; empty string for defaults
///
/// # Returns
/// Flat array of RGBA bytes, same length as `data`
#[wasm_bindgen]
pub fn dehaze_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    params_json: &str,
) -> Result<Vec<u8>, JsValue> {
    let params = PipelineParams::from_json(params_json).map_err(to_js)?;
    process(width, height, data, &params).map_err(to_js)
}

/// Dehaze an RGBA u8 image with default parameters.
#[wasm_bindgen]
pub fn dehaze_rgba_default_wasm(
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsValue> {
    process(width, height, data, &PipelineParams::default()).map_err(to_js)
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Estimate the atmospheric light of an RGBA u8 image.
///
/// # Returns
/// `[r, g, b]` as floats in 0.0-255.0
#[wasm_bindgen]
pub fn estimate_atmosphere_wasm(
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<f64>, JsValue> {
    let input = rgba_view(data, width, height).map_err(to_js)?;
    let a = estimate_atmosphere(input);
    Ok(vec![a.r, a.g, a.b])
}
