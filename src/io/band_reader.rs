use crate::types::{Band, BandRaster, CoordinateSystem, GeoTransform, LandCoverError, LandCoverResult};
use gdal::{Dataset, Metadata};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which raster band (1-based, GDAL numbering) holds which spectral band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandMapping {
    pub entries: Vec<(Band, isize)>,
}

impl BandMapping {
    pub fn new(entries: Vec<(Band, isize)>) -> Self {
        Self { entries }
    }

    /// B2, B3, B4, B5, B8, B11 stacked as bands 1..=6
    pub fn sentinel2_stack() -> Self {
        Self::new(
            Band::REQUIRED
                .iter()
                .enumerate()
                .map(|(k, &band)| (band, k as isize + 1))
                .collect(),
        )
    }

    /// Build a mapping from band descriptions such as "B8" or "B08".
    /// Bands whose description does not parse are skipped.
    pub fn from_descriptions(dataset: &Dataset) -> LandCoverResult<Self> {
        let mut entries = Vec::new();
        for index in 1..=dataset.raster_count() {
            let description = dataset.rasterband(index)?.description()?;
            match description.trim().parse::<Band>() {
                Ok(band) => entries.push((band, index)),
                Err(_) => log::debug!("Skipping raster band {} ({:?})", index, description),
            }
        }
        Ok(Self::new(entries))
    }
}

/// Reader parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderParams {
    /// Multiplier from stored digital numbers to reflectance
    pub reflectance_scale: f64,
    /// Added after scaling
    pub reflectance_offset: f64,
}

impl Default for ReaderParams {
    fn default() -> Self {
        Self {
            // Sentinel-2 L2A surface reflectance is stored as DN * 10000
            reflectance_scale: 1.0 / 10_000.0,
            reflectance_offset: 0.0,
        }
    }
}

/// Multi-band GeoTIFF reader producing a [`BandRaster`]
pub struct BandReader {
    params: ReaderParams,
}

impl BandReader {
    pub fn new() -> Self {
        Self {
            params: ReaderParams::default(),
        }
    }

    pub fn with_params(params: ReaderParams) -> Self {
        Self { params }
    }

    /// Read the mapped bands of a raster file. Nodata becomes NaN, which
    /// the index calculator treats as undefined.
    pub fn read<P: AsRef<Path>>(&self, path: P, mapping: &BandMapping) -> LandCoverResult<BandRaster> {
        log::info!("Reading reflectance bands from: {}", path.as_ref().display());
        log::debug!("Band mapping: {:?}", mapping.entries);

        let dataset = Dataset::open(path.as_ref())?;
        let geo_transform = GeoTransform::from_gdal(dataset.geo_transform()?);
        let coordinate_system = detect_coordinate_system(&dataset);
        let (width, height) = dataset.raster_size();

        log::debug!("Raster size: {}x{}", width, height);
        log::debug!("Geotransform: {:?}", geo_transform);

        let mut raster = BandRaster::new(geo_transform, coordinate_system);
        let scale = self.params.reflectance_scale;
        let offset = self.params.reflectance_offset;

        for &(band, index) in &mapping.entries {
            if index < 1 || index > dataset.raster_count() {
                return Err(LandCoverError::InvalidParameter(format!(
                    "band {} mapped to raster band {}, file has {}",
                    band,
                    index,
                    dataset.raster_count()
                )));
            }

            let rasterband = dataset.rasterband(index)?;
            let nodata = rasterband.no_data_value();
            let buffer = rasterband.read_as::<f64>((0, 0), (width, height), (width, height), None)?;

            let values: Vec<f32> = buffer
                .data
                .iter()
                .map(|&dn| match nodata {
                    Some(nd) if dn == nd => f32::NAN,
                    _ => (dn * scale + offset) as f32,
                })
                .collect();

            let data = Array2::from_shape_vec((height, width), values)
                .map_err(|e| LandCoverError::InvalidParameter(format!("Failed to reshape band {}: {}", band, e)))?;
            raster.insert_band(band, data);
        }

        log::info!("Read {} bands", mapping.entries.len());
        Ok(raster)
    }
}

impl Default for BandReader {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_coordinate_system(dataset: &Dataset) -> CoordinateSystem {
    match dataset.spatial_ref() {
        Ok(srs) if srs.is_geographic() => CoordinateSystem::Geographic,
        Ok(srs) => CoordinateSystem::Projected {
            epsg: srs.auth_code().map(|code| code as u32).unwrap_or(0),
        },
        Err(e) => {
            log::warn!("No spatial reference found ({}), assuming projected meters", e);
            CoordinateSystem::Projected { epsg: 0 }
        }
    }
}
