//! rasterfx
//!
//! Pixel-level filters for in-memory RGBA rasters, with Python bindings via
//! PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! A [`Raster`] is `width * height` pixels of R, G, B, A bytes in row-major
//! order; pixel `(x, y)` starts at byte `(x + y * width) * 4`. Filters mutate
//! the raster in place and never change its dimensions.
//!
//! ## Filters
//! - flip, grayscale, monochrome, dichrome
//! - glass (random displacement)
//! - motion, box and tent blur
//! - posterize, solarize
//! - Sobel edge detection (linear or combined)
//! - bit-depth reduction with optional Floyd-Steinberg dithering
//!
//! ## Usage
//! ```
//! use rasterfx::{FilterRequest, FilterSelection, Raster};
//!
//! let mut raster = Raster::filled(4, 4, [200, 40, 90, 255]).unwrap();
//! let selection = FilterSelection::from_json(
//!     r#"{"mode": "grayscale", "params": {"mode": "average"}}"#,
//! ).unwrap();
//!
//! FilterRequest::try_from(&selection).unwrap().apply(&mut raster).unwrap();
//! assert_eq!(&raster.as_bytes()[..4], &[110, 110, 110, 255]);
//! ```

pub mod error;
pub mod filters;
pub mod raster;
pub mod request;
pub mod settings;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use raster::{Raster, Snapshot};
pub use request::{FilterParams, FilterRequest, FilterSelection};
pub use settings::{load_settings, BitDepth, BitDepthSelection, RenderSettings};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::{BitDepth, FilterRequest, FilterSelection, Raster, RenderSettings};

    fn to_py_err(err: crate::Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn raster_from(image: PyReadonlyArray3<'_, u8>) -> PyResult<Raster> {
        Raster::from_array(image.as_array().to_owned()).map_err(to_py_err)
    }

    /// Apply one filter to an RGBA u8 image of shape (height, width, 4).
    ///
    /// `selection` is the filter as JSON, e.g.
    /// `{"mode": "flip", "params": {"axis": "both"}}`.
    #[pyfunction]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        selection: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let request = FilterSelection::from_json(selection)
            .and_then(FilterRequest::try_from)
            .map_err(to_py_err)?;
        let mut raster = raster_from(image)?;
        request.apply(&mut raster).map_err(to_py_err)?;
        Ok(raster.into_array().into_pyarray(py))
    }

    /// Reduce an RGBA u8 image to `depth` bits per color channel.
    #[pyfunction]
    #[pyo3(signature = (image, depth, dither="none"))]
    pub fn reduce_bit_depth<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        depth: u32,
        dither: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let pass = dither
            .parse()
            .and_then(|dither| BitDepth::new(depth, dither))
            .map_err(to_py_err)?;
        let mut raster = raster_from(image)?;
        pass.apply(&mut raster).map_err(to_py_err)?;
        Ok(raster.into_array().into_pyarray(py))
    }

    /// Run full render settings (filter, then bit depth) given as JSON.
    #[pyfunction]
    pub fn render<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        settings: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let settings = RenderSettings::from_json(settings).map_err(to_py_err)?;
        let mut raster = raster_from(image)?;
        settings.apply(&mut raster).map_err(to_py_err)?;
        Ok(raster.into_array().into_pyarray(py))
    }

    /// rasterfx extension module
    #[pymodule]
    pub fn rasterfx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        m.add_function(wrap_pyfunction!(reduce_bit_depth, m)?)?;
        m.add_function(wrap_pyfunction!(render, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::rasterfx;
