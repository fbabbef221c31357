//! Dark/bright region correction.
//!
//! A heuristic post-pass: lifts pixels that are nearly black in any channel
//! and pulls near-white pixels down in proportion to how far past the white
//! threshold they are. The thresholds are tunable constants
//! ([`RegionCorrection`]), not derived from the haze model.

use ndarray::{Array3, ArrayView3};

use super::clamp_u8;
use crate::params::RegionCorrection;

/// Amount to subtract from a pixel with mean intensity `avg`.
///
/// Zero at or below the threshold, rising linearly to `darken_amount` at 255.
/// A threshold of 255 disables darkening.
#[inline]
pub fn darken_for_intensity(avg: f64, settings: &RegionCorrection) -> f64 {
    let threshold = settings.white_threshold as f64;
    if settings.white_threshold == u8::MAX || avg <= threshold {
        return 0.0;
    }
    settings.darken_amount * (avg - threshold) / (255.0 - threshold)
}

/// Apply dark-region boost and bright-region darkening (u8 version).
///
/// Both tests look at the incoming pixel:
/// - `min(r, g, b) < dark_threshold`: add `dark_boost` to R, G and B
/// - `mean(r, g, b) > white_threshold`: subtract [`darken_for_intensity`]
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `settings` - Thresholds and amounts
///
/// # Returns
/// Corrected image with same channel count, alpha unchanged
pub fn region_correction_u8(input: ArrayView3<u8>, settings: &RegionCorrection) -> Array3<u8> {
    let (height, width, channels) = input.dim();

    if channels < 3 {
        return input.to_owned();
    }

    let mut output = input.to_owned();

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]];
            let g = input[[y, x, 1]];
            let b = input[[y, x, 2]];

            let mut shift = 0.0f64;
            if r.min(g).min(b) < settings.dark_threshold {
                shift += settings.dark_boost as f64;
            }
            let avg = (r as f64 + g as f64 + b as f64) / 3.0;
            shift -= darken_for_intensity(avg, settings);

            if shift != 0.0 {
                for c in 0..3 {
                    output[[y, x, c]] = clamp_u8(input[[y, x, c]] as f64 + shift);
                }
            }
        }
    }
    output
}
