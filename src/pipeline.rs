//! The dehaze pipeline: an ordered chain of filters over one RGBA8 image.
//!
//! Each stage reads the previous stage's output and produces a fresh image,
//! so neighborhood filters never see partially updated pixels. Input is
//! validated once, before the first stage runs; after that every stage is
//! total.

use ndarray::{Array3, ArrayView3};
use tracing::{debug, debug_span};

use crate::buffer::{check_rgba, rgba_view};
use crate::error::DehazeError;
use crate::filters::{blur, color_adjust, haze, sharpen, tone};
use crate::params::{PipelineParams, SharpenMode};

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Contrast,
    Dehaze,
    Sharpen,
    Saturation,
    Smooth,
    RegionCorrection,
}

impl PipelineParams {
    /// Stages these parameters enable, in the order they run.
    ///
    /// Contrast and saturation always run; at their neutral amounts they are
    /// identities.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::Contrast];
        if self.dehaze {
            stages.push(Stage::Dehaze);
        }
        if self.sharpen != SharpenMode::None {
            stages.push(Stage::Sharpen);
        }
        stages.push(Stage::Saturation);
        if self.smooth {
            stages.push(Stage::Smooth);
        }
        if self.region_correction.is_some() {
            stages.push(Stage::RegionCorrection);
        }
        stages
    }
}

/// Run the pipeline over a flat RGBA8 buffer.
///
/// # Arguments
/// * `width`, `height` - Image dimensions in pixels, both non-zero
/// * `pixels` - Row-major RGBA bytes, length `width * height * 4`
/// * `params` - Stage settings
///
/// # Returns
/// A new buffer of the same length, or `InvalidBuffer` if the input does not
/// describe an RGBA image of the given size
pub fn process(
    width: usize,
    height: usize,
    pixels: &[u8],
    params: &PipelineParams,
) -> Result<Vec<u8>, DehazeError> {
    let input = rgba_view(pixels, width, height)?;
    let output = process_image(input, params)?;
    // Every stage allocates a fresh standard-layout array
    Ok(output.into_raw_vec_and_offset().0)
}

/// Run the pipeline over a `(height, width, 4)` image.
pub fn process_image(input: ArrayView3<u8>, params: &PipelineParams) -> Result<Array3<u8>, DehazeError> {
    check_rgba(&input)?;

    let (height, width, _) = input.dim();
    let _span = debug_span!("dehaze_pipeline", width, height).entered();

    let mut image = input.to_owned();
    for stage in params.stages() {
        debug!(?stage, "running stage");
        image = apply_stage(image.view(), stage, params)?;
    }
    Ok(image)
}

fn apply_stage(image: ArrayView3<u8>, stage: Stage, params: &PipelineParams) -> Result<Array3<u8>, DehazeError> {
    let output = match stage {
        Stage::Contrast => color_adjust::contrast_u8(image, params.contrast_amount),
        Stage::Dehaze => {
            let atmosphere = haze::estimate_atmosphere(image);
            debug!(r = atmosphere.r, g = atmosphere.g, b = atmosphere.b, "estimated atmosphere");
            let transmission = haze::estimate_transmission(image, &atmosphere);
            haze::dehaze_u8(image, &atmosphere, transmission.view())?
        }
        Stage::Sharpen => sharpen::sharpen_with_mode_u8(image, params.sharpen)?,
        Stage::Saturation => color_adjust::saturation_u8(image, params.saturation_amount),
        Stage::Smooth => blur::smooth_u8(image)?,
        Stage::RegionCorrection => match &params.region_correction {
            Some(settings) => tone::region_correction_u8(image, settings),
            None => image.to_owned(),
        },
    };
    Ok(output)
}
