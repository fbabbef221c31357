//! Sharpen filters: Laplacian Sharpen, High Pass Sharpen, Unsharp Mask.
//!
//! All three are 3x3 convolutions (see [`super::convolve`]) and share its
//! edge-clamp border policy. Alpha is preserved unchanged.

use ndarray::{Array3, ArrayView3};

use super::convolve::{convolve_3x3_u8, Kernel3x3};
use crate::error::DehazeError;
use crate::params::SharpenMode;

/// Subtle cross-kernel sharpening (u8 version).
///
/// `out = c * (1 + amount) - (top + bottom + left + right) * amount / 4`
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `amount` - Sharpening strength, 0.0 = no change (0.05 is barely visible)
pub fn sharpen_u8(input: ArrayView3<u8>, amount: f64) -> Result<Array3<u8>, DehazeError> {
    convolve_3x3_u8(input, &Kernel3x3::laplacian(amount))
}

/// Strong sharpening with the fixed `[-1 x8, 9]` kernel (u8 version).
pub fn high_pass_sharpen_u8(input: ArrayView3<u8>) -> Result<Array3<u8>, DehazeError> {
    convolve_3x3_u8(input, &Kernel3x3::HIGH_PASS)
}

/// Unsharp mask against a 3x3 box blur (u8 version).
///
/// `out = original + amount * (original - box_blur(original))`
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `amount` - Fraction of the high-frequency detail added back, 0.0 = no change
pub fn unsharp_mask_u8(input: ArrayView3<u8>, amount: f64) -> Result<Array3<u8>, DehazeError> {
    convolve_3x3_u8(input, &Kernel3x3::unsharp(amount))
}

/// Run the sharpening variant selected by `mode`.
pub fn sharpen_with_mode_u8(input: ArrayView3<u8>, mode: SharpenMode) -> Result<Array3<u8>, DehazeError> {
    match mode {
        SharpenMode::None => Ok(input.to_owned()),
        SharpenMode::Laplacian { amount } => sharpen_u8(input, amount),
        SharpenMode::HighPass => high_pass_sharpen_u8(input),
        SharpenMode::Unsharp { amount } => unsharp_mask_u8(input, amount),
    }
}
