//! Pipeline parameters.
//!
//! Every field is optional when deserialized; missing fields fall back to the
//! constants the filter was tuned with. JSON keys are camelCase so the same
//! object can be passed straight from JavaScript. Unknown keys are rejected.
//!
//! Besides the nested `sharpen` / `regionCorrection` objects, the flat keys
//! `sharpenAmount`, `darkThreshold`, `darkBoost`, `whiteThreshold` and
//! `darkenAmount` are accepted. A flat key and its nested counterpart may not
//! appear together.

use serde::{Deserialize, Serialize};

use crate::error::DehazeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawParams")]
pub struct PipelineParams {
    /// Contrast stretch amount, -255..255. 0 leaves the image unchanged.
    pub contrast_amount: i32,
    /// Run atmosphere/transmission estimation and the dehaze pass.
    pub dehaze: bool,
    pub sharpen: SharpenMode,
    /// Saturation multiplier. 1.0 = no change.
    pub saturation_amount: f64,
    /// 3x3 box smoothing after saturation.
    pub smooth: bool,
    /// Dark/bright region correction as the final pass. `None` skips it.
    pub region_correction: Option<RegionCorrection>,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            contrast_amount: 3,
            dehaze: true,
            sharpen: SharpenMode::default(),
            saturation_amount: 1.1,
            smooth: false,
            region_correction: None,
        }
    }
}

impl PipelineParams {
    /// Parse parameters from JSON. An empty or whitespace-only string yields
    /// the defaults.
    pub fn from_json(json: &str) -> Result<Self, DehazeError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Parameters under which every stage is an identity on any image.
    pub fn neutral() -> Self {
        Self {
            contrast_amount: 0,
            dehaze: false,
            sharpen: SharpenMode::None,
            saturation_amount: 1.0,
            smooth: false,
            region_correction: None,
        }
    }
}

/// Wire form of [`PipelineParams`], nested and flat keys side by side.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct RawParams {
    contrast_amount: i32,
    dehaze: bool,
    sharpen: Option<SharpenMode>,
    sharpen_amount: Option<f64>,
    saturation_amount: f64,
    smooth: bool,
    region_correction: Option<RegionCorrection>,
    dark_threshold: Option<u8>,
    dark_boost: Option<u8>,
    white_threshold: Option<u8>,
    darken_amount: Option<f64>,
}

impl Default for RawParams {
    fn default() -> Self {
        let defaults = PipelineParams::default();
        Self {
            contrast_amount: defaults.contrast_amount,
            dehaze: defaults.dehaze,
            sharpen: None,
            sharpen_amount: None,
            saturation_amount: defaults.saturation_amount,
            smooth: defaults.smooth,
            region_correction: None,
            dark_threshold: None,
            dark_boost: None,
            white_threshold: None,
            darken_amount: None,
        }
    }
}

impl TryFrom<RawParams> for PipelineParams {
    type Error = String;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        let sharpen = match (raw.sharpen, raw.sharpen_amount) {
            (Some(_), Some(_)) => return Err("`sharpen` and `sharpenAmount` are mutually exclusive".into()),
            (Some(mode), None) => mode,
            (None, Some(amount)) => SharpenMode::Laplacian { amount },
            (None, None) => SharpenMode::default(),
        };

        let has_flat_region = raw.dark_threshold.is_some()
            || raw.dark_boost.is_some()
            || raw.white_threshold.is_some()
            || raw.darken_amount.is_some();
        let region_correction = match (raw.region_correction, has_flat_region) {
            (Some(_), true) => {
                return Err("`regionCorrection` cannot be combined with flat region correction keys".into())
            }
            (nested, false) => nested,
            (None, true) => {
                let defaults = RegionCorrection::default();
                Some(RegionCorrection {
                    dark_threshold: raw.dark_threshold.unwrap_or(defaults.dark_threshold),
                    dark_boost: raw.dark_boost.unwrap_or(defaults.dark_boost),
                    white_threshold: raw.white_threshold.unwrap_or(defaults.white_threshold),
                    darken_amount: raw.darken_amount.unwrap_or(defaults.darken_amount),
                })
            }
        };

        Ok(Self {
            contrast_amount: raw.contrast_amount,
            dehaze: raw.dehaze,
            sharpen,
            saturation_amount: raw.saturation_amount,
            smooth: raw.smooth,
            region_correction,
        })
    }
}

/// Which 3x3 sharpening kernel to run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SharpenMode {
    None,
    /// Center `1 + amount`, 4-neighbors `-amount / 4`.
    Laplacian { amount: f64 },
    /// Fixed `[-1, -1, -1, -1, 9, -1, -1, -1, -1]` kernel.
    HighPass,
    /// Original plus `amount` times its difference from the 3x3 box blur.
    Unsharp { amount: f64 },
}

impl Default for SharpenMode {
    fn default() -> Self {
        SharpenMode::Laplacian { amount: 0.05 }
    }
}

/// Heuristic lift of near-black pixels and pull-down of near-white pixels.
///
/// The thresholds are tuning constants, not derived from any haze model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RegionCorrection {
    /// Pixels whose darkest channel is below this are boosted.
    pub dark_threshold: u8,
    pub dark_boost: u8,
    /// Pixels whose mean intensity exceeds this are darkened.
    pub white_threshold: u8,
    /// Darkening applied at full white, scaled linearly from the threshold.
    pub darken_amount: f64,
}

impl Default for RegionCorrection {
    fn default() -> Self {
        Self {
            dark_threshold: 30,
            dark_boost: 20,
            white_threshold: 240,
            darken_amount: 20.0,
        }
    }
}
