//! landcover: rule-based land-cover classification for Sentinel-2 reflectance
//!
//! The pipeline derives spectral indices from a co-registered band stack,
//! assigns one of eight classes through an ordered list of threshold rules and
//! removes isolated labels with a circular majority filter, all clipped to an
//! area of interest.

pub mod types;
pub mod core;
#[cfg(feature = "gdal")]
pub mod io;

// Re-export main types and functions for easier access
pub use types::{
    AreaOfInterest, Band, BandRaster, ClassRaster, ClassSummary, CoordinateSystem, GeoTransform, IndexRaster,
    LandCoverClass, LandCoverError, LandCoverResult, SpectralIndex, SpectralIndices, NODATA_CLASS,
};

pub use crate::core::{
    classify, classify_landcover, compute_indices, legend, smooth, LandCoverPipeline, LegendEntry,
    PipelineParams, DEFAULT_SMOOTHING_RADIUS_M,
};

#[cfg(feature = "gdal")]
pub use io::{BandMapping, BandReader, ClassRasterWriter};

#[cfg(feature = "python")]
mod bindings {
    use crate::types::{AreaOfInterest, Band, BandRaster, CoordinateSystem, GeoTransform, LandCoverError, SpectralIndex};
    use numpy::{PyReadonlyArray2, ToPyArray};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use pyo3::types::{PyDict, PyList};

    type PyGeoTransform = (f64, f64, f64, f64, f64, f64);

    fn to_py_err(e: LandCoverError) -> PyErr {
        PyValueError::new_err(format!("{}", e))
    }

    /// Convert a dict of band name -> 2D float32 or float64 array into a
    /// BandRaster
    fn bands_from_dict(
        bands: &PyDict,
        geo_transform: PyGeoTransform,
        geographic: bool,
        epsg: u32,
    ) -> PyResult<BandRaster> {
        let (x0, pw, rx, y0, ry, ph) = geo_transform;
        let crs = if geographic {
            CoordinateSystem::Geographic
        } else {
            CoordinateSystem::Projected { epsg }
        };

        let mut raster = BandRaster::new(GeoTransform::from_gdal([x0, pw, rx, y0, ry, ph]), crs);
        for (key, value) in bands.iter() {
            let name: String = key.extract()?;
            let band: Band = name.parse().map_err(to_py_err)?;
            match value.extract::<PyReadonlyArray2<f32>>() {
                Ok(array) => raster.insert_band(band, array.as_array().to_owned()),
                Err(_) => {
                    let array: PyReadonlyArray2<f64> = value.extract()?;
                    raster.insert_band_f64(band, array.as_array())
                }
            };
        }
        Ok(raster)
    }

    /// Full pipeline: indices, rule classification, mode filter, AOI clip.
    /// Pixels outside the AOI are 255.
    #[pyfunction]
    #[pyo3(signature = (bands, geo_transform, aoi, smoothing_radius_m = 12.0, geographic = false, epsg = 0))]
    fn classify_landcover(
        py: Python,
        bands: &PyDict,
        geo_transform: PyGeoTransform,
        aoi: Vec<(f64, f64)>,
        smoothing_radius_m: f64,
        geographic: bool,
        epsg: u32,
    ) -> PyResult<PyObject> {
        let raster = bands_from_dict(bands, geo_transform, geographic, epsg)?;
        let area = AreaOfInterest::from_exterior(&aoi).map_err(to_py_err)?;

        let classes = py
            .allow_threads(|| crate::core::classify_landcover(&raster, &area, smoothing_radius_m))
            .map_err(to_py_err)?;

        let numpy_array = classes.masked_codes().to_pyarray(py);
        Ok(numpy_array.into())
    }

    /// Spectral indices as a dict of float64 arrays; undefined values are NaN
    #[pyfunction]
    #[pyo3(signature = (bands, geo_transform = (0.0, 10.0, 0.0, 0.0, 0.0, -10.0)))]
    fn compute_indices(py: Python, bands: &PyDict, geo_transform: PyGeoTransform) -> PyResult<PyObject> {
        let raster = bands_from_dict(bands, geo_transform, false, 0)?;
        let indices = py
            .allow_threads(|| crate::core::compute_indices(&raster))
            .map_err(to_py_err)?;

        let result = PyDict::new(py);
        for index in SpectralIndex::ALL {
            let plane = indices.plane(index).mapv(|v| v.unwrap_or(f64::NAN));
            result.set_item(index.name(), plane.to_pyarray(py))?;
        }
        Ok(result.into())
    }

    /// Class legend as a list of {class, name, color} dicts
    #[pyfunction]
    fn legend(py: Python) -> PyResult<PyObject> {
        let entries = PyList::empty(py);
        for entry in crate::core::legend() {
            let item = PyDict::new(py);
            item.set_item("class", entry.code)?;
            item.set_item("name", entry.name)?;
            item.set_item("color", entry.color)?;
            entries.append(item)?;
        }
        Ok(entries.into())
    }

    /// Python module definition
    #[pymodule]
    fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(classify_landcover, m)?)?;
        m.add_function(wrap_pyfunction!(compute_indices, m)?)?;
        m.add_function(wrap_pyfunction!(legend, m)?)?;
        Ok(())
    }
}
