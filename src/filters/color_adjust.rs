//! Color adjustment filters: Contrast, Saturation.
//!
//! These are pixel-wise operations that don't require spatial context.
//!
//! ## Supported Formats
//!
//! Both filters accept images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - single luminance channel
//! - **RGB**: (height, width, 3) - red, green, blue
//! - **RGBA**: (height, width, 4) - red, green, blue, alpha
//!
//! Alpha channel (if present) is always preserved unchanged.

use ndarray::{Array3, ArrayView3};

use super::{clamp_u8, color_channels};

// ============================================================================
// Contrast
// ============================================================================

/// Contrast factor for an integer amount in -255..=255.
///
/// `factor = 259 * (c + 255) / (255 * (259 - c))`. Amounts outside the range
/// are clamped first so the denominator never reaches zero.
pub fn contrast_factor(amount: i32) -> f64 {
    let c = amount.clamp(-255, 255) as f64;
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Stretch contrast around mid-gray 128 (u8 version).
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `amount` - Contrast amount, -255 (flat gray) to 255 (hard threshold), 0 = no change
///
/// # Returns
/// Contrast-adjusted image with same channel count
pub fn contrast_u8(input: ArrayView3<u8>, amount: i32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let factor = contrast_factor(amount);
    let color_channels = color_channels(channels);

    for y in 0..height {
        for x in 0..width {
            for c in 0..color_channels {
                let v = input[[y, x, c]] as f64;
                output[[y, x, c]] = clamp_u8(factor * (v - 128.0) + 128.0);
            }
            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }
    output
}

// ============================================================================
// Saturation
// ============================================================================

// BT.601 luma coefficients
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Luma of an RGB triple.
#[inline]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Scale each pixel's chroma away from (or toward) its luma (u8 version).
///
/// For grayscale images, this is a no-op (saturation requires color channels).
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `amount` - Saturation multiplier: 0.0 (grayscale), 1.0 = no change, >1.0 more vivid
///
/// # Returns
/// Saturation-adjusted image with same channel count
pub fn saturation_u8(input: ArrayView3<u8>, amount: f64) -> Array3<u8> {
    let (height, width, channels) = input.dim();

    if channels < 3 {
        return input.to_owned();
    }

    let mut output = Array3::<u8>::zeros((height, width, channels));

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]] as f64;
            let g = input[[y, x, 1]] as f64;
            let b = input[[y, x, 2]] as f64;

            let gray = luma(r, g, b);

            output[[y, x, 0]] = clamp_u8(gray + amount * (r - gray));
            output[[y, x, 1]] = clamp_u8(gray + amount * (g - gray));
            output[[y, x, 2]] = clamp_u8(gray + amount * (b - gray));

            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(r: u8, g: u8, b: u8, a: u8) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((1, 1, 4));
        img[[0, 0, 0]] = r;
        img[[0, 0, 1]] = g;
        img[[0, 0, 2]] = b;
        img[[0, 0, 3]] = a;
        img
    }

    // ========================================================================
    // Contrast Tests
    // ========================================================================

    #[test]
    fn test_contrast_factor_neutral() {
        assert_eq!(contrast_factor(0), 1.0);
    }

    #[test]
    fn test_contrast_factor_clamped() {
        // 259 would divide by zero; it is treated as 255
        assert_eq!(contrast_factor(259), contrast_factor(255));
        assert!(contrast_factor(1000).is_finite());
        assert_eq!(contrast_factor(-1000), 0.0);
    }

    #[test]
    fn test_contrast_zero_is_identity() {
        let mut img = Array3::<u8>::zeros((4, 4, 4));
        for (i, v) in img.iter_mut().enumerate() {
            *v = (i * 17 % 256) as u8;
        }

        let result = contrast_u8(img.view(), 0);

        assert_eq!(result, img);
    }

    #[test]
    fn test_contrast_u8_rgba() {
        let img = rgba(100, 128, 200, 77);

        let result = contrast_u8(img.view(), 64);

        // factor = 259 * 319 / (255 * 195) ~ 1.6616
        assert!((result[[0, 0, 0]] as i32 - 81).abs() <= 1);
        assert_eq!(result[[0, 0, 1]], 128); // mid-gray is the pivot
        assert!((result[[0, 0, 2]] as i32 - 248).abs() <= 1);
        assert_eq!(result[[0, 0, 3]], 77); // Alpha preserved
    }

    #[test]
    fn test_contrast_u8_clamps() {
        let img = rgba(10, 250, 128, 255);

        let result = contrast_u8(img.view(), 255);

        assert_eq!(result[[0, 0, 0]], 0);
        assert_eq!(result[[0, 0, 1]], 255);
    }

    #[test]
    fn test_contrast_u8_default_amount_is_subtle() {
        let img = rgba(200, 60, 128, 255);

        let result = contrast_u8(img.view(), 3);

        // factor ~ 1.0236
        assert_eq!(result[[0, 0, 0]], 202);
        assert_eq!(result[[0, 0, 1]], 58);
        assert_eq!(result[[0, 0, 2]], 128);
    }

    #[test]
    fn test_contrast_u8_grayscale() {
        let mut img = Array3::<u8>::zeros((1, 1, 1));
        img[[0, 0, 0]] = 200;

        let result = contrast_u8(img.view(), 64);

        assert_eq!(result.dim().2, 1);
        assert!(result[[0, 0, 0]] > 200);
    }

    // ========================================================================
    // Saturation Tests
    // ========================================================================

    #[test]
    fn test_saturation_one_is_identity() {
        let mut img = Array3::<u8>::zeros((3, 5, 4));
        for (i, v) in img.iter_mut().enumerate() {
            *v = (i * 37 % 256) as u8;
        }

        let result = saturation_u8(img.view(), 1.0);

        assert_eq!(result, img);
    }

    #[test]
    fn test_saturation_zero_is_luma() {
        let img = rgba(255, 0, 0, 255);

        let result = saturation_u8(img.view(), 0.0);

        // 0.299 * 255 = 76.245
        assert_eq!(result[[0, 0, 0]], 76);
        assert_eq!(result[[0, 0, 1]], 76);
        assert_eq!(result[[0, 0, 2]], 76);
    }

    #[test]
    fn test_saturation_boost() {
        let img = rgba(200, 100, 100, 40);

        let result = saturation_u8(img.view(), 1.5);

        // gray = 129.9; r = 129.9 + 1.5 * 70.1 = 235.05
        assert_eq!(result[[0, 0, 0]], 235);
        assert!(result[[0, 0, 1]] < 100);
        assert_eq!(result[[0, 0, 3]], 40); // Alpha preserved
    }

    #[test]
    fn test_saturation_uses_double_precision() {
        let img = rgba(44, 212, 100, 255);

        let result = saturation_u8(img.view(), 1.1);

        // r = 33.499999999999986 in f64; single precision lands on 33.5
        assert_eq!(result[[0, 0, 0]], 33);
        assert_eq!(result[[0, 0, 1]], 218);
        assert_eq!(result[[0, 0, 2]], 95);
    }

    #[test]
    fn test_saturation_gray_pixel_unchanged() {
        let img = rgba(128, 128, 128, 255);

        let result = saturation_u8(img.view(), 1.1);

        assert_eq!(result, img);
    }

    #[test]
    fn test_saturation_grayscale_noop() {
        let mut img = Array3::<u8>::zeros((1, 1, 1));
        img[[0, 0, 0]] = 128;

        let result = saturation_u8(img.view(), 2.0);

        assert_eq!(result[[0, 0, 0]], 128);
    }
}
