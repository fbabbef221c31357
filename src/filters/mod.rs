//! Filter modules for the dehaze pipeline.
//!
//! ## Supported Formats
//!
//! Filters take `ndarray` views shaped `(height, width, channels)`:
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! The pipeline itself only accepts RGBA8; the individual filters also work on
//! the other layouts where it makes sense (haze and tone filters need color).
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Read the input view, return a new image; never modify in place
//! - **Alpha preservation** - Alpha channel (if present) is always preserved
//! - **Clamp and round** - Float results are clamped to 0-255 and rounded
//! - **Edge-clamped borders** - Neighborhood filters replicate edge pixels
//! - **Thread-safe** - Neighborhood filters split rows across rayon
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: contrast, saturation, region correction
//! - **Haze**: atmosphere, transmission, dehaze
//! - **Neighborhood**: sharpen, high-pass sharpen, unsharp mask, smooth

pub mod color_adjust;
pub mod haze;
pub mod convolve;
pub mod sharpen;
pub mod blur;
pub mod tone;

/// Number of channels a filter should modify (everything except alpha).
#[inline]
pub(crate) fn color_channels(channels: usize) -> usize {
    if channels == 4 {
        3
    } else {
        channels
    }
}

/// Clamp to 0-255 and round to the nearest integer, ties to even.
///
/// Same conversion as a browser `Uint8ClampedArray` store.
#[inline]
pub(crate) fn clamp_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round_ties_even() as u8
}
