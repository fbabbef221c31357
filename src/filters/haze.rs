//! Haze removal: atmospheric light, transmission map, scene recovery.
//!
//! Follows the haze model `I = J * t + A * (1 - t)`, where `I` is the observed
//! pixel, `A` the atmospheric light (airlight) and `t` the fraction of scene
//! light that reaches the camera. Dehazing solves for `J`:
//!
//! ```text
//! J = (I - A) / t + A
//! ```
//!
//! Transmission here is a cheap per-pixel estimate (Chebyshev distance to the
//! airlight in RGB space) rather than a dark-channel prior, so no patch
//! minimum filter is needed.
//!
//! All functions require at least 3 channels; a 4th (alpha) channel is
//! preserved unchanged.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use rayon::prelude::*;

use super::clamp_u8;
use crate::error::DehazeError;

/// Fraction of the brightest pixels averaged into the airlight estimate.
pub const ATMOSPHERE_TOP_FRACTION: f64 = 0.001;

/// Transmission floor applied where the raw estimate is above 0.5.
pub const TRANSMISSION_FLOOR_HIGH: f64 = 0.1;
/// Transmission floor applied where the raw estimate is at or below 0.5.
///
/// Higher than [`TRANSMISSION_FLOOR_HIGH`], so the floor jumps at t = 0.5.
pub const TRANSMISSION_FLOOR_LOW: f64 = 0.2;

/// Estimated airlight color, one value per channel in 0.0-255.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Atmosphere {
    #[inline]
    pub fn channel(&self, c: usize) -> f64 {
        match c {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }
}

/// Number of pixels averaged for the airlight estimate. Never less than 1.
pub fn atmosphere_sample_count(pixel_count: usize) -> usize {
    ((pixel_count as f64 * ATMOSPHERE_TOP_FRACTION).floor() as usize).max(1)
}

// ============================================================================
// Atmosphere
// ============================================================================

/// Estimate the atmospheric light.
///
/// Ranks pixels by brightness `(r + g + b) / 3`, takes the top 0.1% (at least
/// one pixel) and averages their colors. Uses partial selection, so this is
/// O(n) rather than a full sort. When several pixels tie at the selection
/// boundary any of them may be picked.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
///
/// # Returns
/// Average color of the brightest pixels
pub fn estimate_atmosphere(input: ArrayView3<u8>) -> Atmosphere {
    let (height, width, _) = input.dim();
    let pixel_count = height * width;
    if pixel_count == 0 {
        return Atmosphere { r: 0.0, g: 0.0, b: 0.0 };
    }

    // (r + g + b) orders pixels the same way as its mean, without floats
    let mut ranked: Vec<(u16, [u8; 3])> = Vec::with_capacity(pixel_count);
    for y in 0..height {
        for x in 0..width {
            let rgb = [input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]];
            let sum = rgb[0] as u16 + rgb[1] as u16 + rgb[2] as u16;
            ranked.push((sum, rgb));
        }
    }

    let count = atmosphere_sample_count(pixel_count);
    if count < pixel_count {
        // Brightest `count` pixels end up in ranked[..count], in no particular order
        ranked.select_nth_unstable_by(count - 1, |a, b| b.0.cmp(&a.0));
    }

    let mut sum = [0u64; 3];
    for (_, rgb) in &ranked[..count] {
        for c in 0..3 {
            sum[c] += rgb[c] as u64;
        }
    }

    let n = count as f64;
    Atmosphere {
        r: sum[0] as f64 / n,
        g: sum[1] as f64 / n,
        b: sum[2] as f64 / n,
    }
}

// ============================================================================
// Transmission
// ============================================================================

/// Transmission for a single pixel given its Chebyshev distance to the airlight.
#[inline]
pub fn transmission_from_distance(distance: f64) -> f64 {
    let t = 1.0 - distance / 255.0;
    let floor = if t > 0.5 {
        TRANSMISSION_FLOOR_HIGH
    } else {
        TRANSMISSION_FLOOR_LOW
    };
    t.max(floor)
}

/// Estimate the per-pixel transmission map.
///
/// `t = 1 - max(|r - Ar|, |g - Ag|, |b - Ab|) / 255`, then floored
/// (see [`TRANSMISSION_FLOOR_LOW`]). Pixels close to the airlight color are
/// treated as haze-free.
///
/// # Returns
/// Transmission map of shape (height, width), values in 0.1-1.0
pub fn estimate_transmission(input: ArrayView3<u8>, atmosphere: &Atmosphere) -> Array2<f64> {
    let (height, width, _) = input.dim();

    Array2::from_shape_fn((height, width), |(y, x)| {
        let mut distance = 0.0f64;
        for c in 0..3 {
            let d = (input[[y, x, c]] as f64 - atmosphere.channel(c)).abs();
            distance = distance.max(d);
        }
        transmission_from_distance(distance)
    })
}

// ============================================================================
// Dehaze
// ============================================================================

/// Recover scene radiance `J = (I - A) / t + A` for every pixel (u8 version).
///
/// Results are clamped to 0-255. Rows are processed in parallel.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `atmosphere` - Airlight from [`estimate_atmosphere`]
/// * `transmission` - Map from [`estimate_transmission`], shape (height, width)
///
/// # Returns
/// Dehazed image with same channel count, or `InvalidBuffer` if the map shape
/// does not match the image
pub fn dehaze_u8(
    input: ArrayView3<u8>,
    atmosphere: &Atmosphere,
    transmission: ArrayView2<f64>,
) -> Result<Array3<u8>, DehazeError> {
    let (height, width, channels) = input.dim();
    if transmission.dim() != (height, width) {
        return Err(DehazeError::invalid_buffer(format!(
            "transmission map is {:?}, image is {:?}",
            transmission.dim(),
            (height, width)
        )));
    }

    let mut output_flat = vec![0u8; height * width * channels];
    output_flat
        .par_chunks_mut((width * channels).max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let t = transmission[[y, x]];
                for c in 0..3 {
                    let a = atmosphere.channel(c);
                    let v = input[[y, x, c]] as f64;
                    row[x * channels + c] = clamp_u8((v - a) / t + a);
                }
                for c in 3..channels {
                    row[x * channels + c] = input[[y, x, c]];
                }
            }
        });

    Array3::from_shape_vec((height, width, channels), output_flat)
        .map_err(|e| DehazeError::invalid_buffer(e.to_string()))
}

/// Estimate airlight and transmission, then dehaze.
///
/// Returns the dehazed image along with the airlight that was used.
pub fn dehaze_auto_u8(input: ArrayView3<u8>) -> Result<(Array3<u8>, Atmosphere), DehazeError> {
    let atmosphere = estimate_atmosphere(input);
    let transmission = estimate_transmission(input, &atmosphere);
    let output = dehaze_u8(input, &atmosphere, transmission.view())?;
    Ok((output, atmosphere))
}
