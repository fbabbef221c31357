//! Smoothing filter: 3x3 box blur.
//!
//! Used as an optional final softening pass after sharpening and saturation,
//! to take the edge off noise amplified by the dehaze step.

use ndarray::{Array3, ArrayView3};

use super::convolve::{convolve_3x3_u8, Kernel3x3};
use crate::error::DehazeError;

/// Apply a 3x3 box blur to color channels (u8 version).
///
/// Uniform 1/9 weights with edge-clamped borders. Alpha is not blurred.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
///
/// # Returns
/// Smoothed image with same channel count
pub fn smooth_u8(input: ArrayView3<u8>) -> Result<Array3<u8>, DehazeError> {
    convolve_3x3_u8(input, &Kernel3x3::BOX)
}
