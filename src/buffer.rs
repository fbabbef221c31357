//! Validation of raw RGBA8 buffers.
//!
//! Hosts hand the pipeline a flat `R,G,B,A` byte sequence in row-major
//! order. Everything downstream works on `(height, width, 4)` ndarray views,
//! so this is the one place where lengths and dimensions are checked.

use ndarray::ArrayView3;

use crate::error::DehazeError;

/// Channels per pixel in every buffer the pipeline accepts.
pub const RGBA_CHANNELS: usize = 4;

/// Expected byte length of an RGBA8 buffer, or `None` on overflow.
pub fn rgba_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(RGBA_CHANNELS)
}

/// Borrow a flat RGBA8 buffer as a `(height, width, 4)` view.
///
/// Rejects zero dimensions and any length other than `width * height * 4`.
pub fn rgba_view(pixels: &[u8], width: usize, height: usize) -> Result<ArrayView3<'_, u8>, DehazeError> {
    if width == 0 || height == 0 {
        return Err(DehazeError::invalid_buffer(format!(
            "dimensions must be positive, got {width}x{height}"
        )));
    }
    let expected = rgba_len(width, height).ok_or_else(|| {
        DehazeError::invalid_buffer(format!("dimensions {width}x{height} overflow"))
    })?;
    if pixels.len() != expected {
        return Err(DehazeError::invalid_buffer(format!(
            "expected {expected} bytes for {width}x{height} RGBA, got {}",
            pixels.len()
        )));
    }

    ArrayView3::from_shape((height, width, RGBA_CHANNELS), pixels)
        .map_err(|e| DehazeError::invalid_buffer(e.to_string()))
}

/// Check that an already-shaped image is non-empty RGBA.
pub fn check_rgba(input: &ArrayView3<u8>) -> Result<(), DehazeError> {
    let (height, width, channels) = input.dim();
    if width == 0 || height == 0 {
        return Err(DehazeError::invalid_buffer(format!(
            "dimensions must be positive, got {width}x{height}"
        )));
    }
    if channels != RGBA_CHANNELS {
        return Err(DehazeError::invalid_buffer(format!(
            "expected 4 channels (RGBA), got {channels}"
        )));
    }
    Ok(())
}
