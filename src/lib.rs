//! Dehaze Rust Core
//!
//! Image dehazing and enhancement for RGBA8 pixel buffers, with WASM bindings
//! for the browser and Python bindings via PyO3.
//!
//! ## Image Format
//! The pipeline works on 8-bit RGBA, row-major, top-left origin:
//! - flat buffers of `width * height * 4` bytes ([`process`])
//! - `(height, width, 4)` ndarray views ([`process_image`])
//!
//! Alpha is carried through every stage unchanged.
//!
//! ## Pipeline
//! Contrast stretch, atmospheric-light estimation, transmission estimation,
//! dehaze, sharpening, saturation, then optional smoothing and dark/bright
//! region correction. See [`PipelineParams`] for the knobs and their defaults.
//!
//! Decoding images and displaying results are left to the host.

pub mod buffer;
pub mod error;
pub mod filters;
pub mod params;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::DehazeError;
pub use params::{PipelineParams, RegionCorrection, SharpenMode};
pub use pipeline::{process, process_image, Stage};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::check_rgba;
    use crate::error::DehazeError;
    use crate::filters::haze::estimate_atmosphere;
    use crate::params::PipelineParams;
    use crate::pipeline::process_image;

    fn value_error(e: DehazeError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    /// Dehaze an RGBA u8 image of shape (height, width, 4).
    ///
    /// # Arguments
    /// * `image` - Input image, left unmodified
    /// * `params_json` - Optional JSON object with pipeline parameters
    ///   (camelCase keys, missing keys use defaults, unknown keys rejected)
    #[pyfunction]
    #[pyo3(signature = (image, params_json=None))]
    pub fn dehaze<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        params_json: Option<String>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = PipelineParams::from_json(params_json.as_deref().unwrap_or("")).map_err(value_error)?;
        let input = image.as_array();
        let result = process_image(input, &params).map_err(value_error)?;
        Ok(result.into_pyarray(py))
    }

    /// Estimate the atmospheric light of an RGBA u8 image.
    ///
    /// Returns (r, g, b) in 0.0-255.0.
    #[pyfunction]
    pub fn atmosphere(image: PyReadonlyArray3<'_, u8>) -> PyResult<(f64, f64, f64)> {
        let input = image.as_array();
        check_rgba(&input).map_err(value_error)?;
        let a = estimate_atmosphere(input);
        Ok((a.r, a.g, a.b))
    }

    /// Dehaze Rust extension module
    #[pymodule]
    pub fn dehaze_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(dehaze, m)?)?;
        m.add_function(wrap_pyfunction!(atmosphere, m)?)?;
        Ok(())
    }
}
