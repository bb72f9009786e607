use crate::types::{Band, BandRaster, IndexRaster, LandCoverError, LandCoverResult, SpectralIndices};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// Index calculation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexParams {
    /// Soil brightness correction factor for SAVI
    pub savi_l: f64,
    /// EVI gain
    pub evi_gain: f64,
    /// EVI aerosol coefficient for red
    pub evi_c1: f64,
    /// EVI aerosol coefficient for blue
    pub evi_c2: f64,
    /// EVI canopy background term
    pub evi_l: f64,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            savi_l: 0.5,
            evi_gain: 2.5,
            evi_c1: 6.0,
            evi_c2: 7.5,
            evi_l: 1.0,
        }
    }
}

/// Reflectance of the six required bands at one pixel
#[derive(Debug, Clone, Copy)]
pub struct PixelBands {
    pub blue: f64,
    pub green: f64,
    pub red: f64,
    pub red_edge: f64,
    pub nir: f64,
    pub swir: f64,
}

/// Division that yields `None` for an exactly-zero denominator or any
/// non-finite operand/result
#[inline]
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// `(a - b) / (a + b)`
#[inline]
pub fn normalized_difference(a: f64, b: f64) -> Option<f64> {
    ratio(a - b, a + b)
}

/// Spectral index calculator
pub struct IndexCalculator {
    params: IndexParams,
}

impl IndexCalculator {
    /// Create a calculator with default coefficients
    pub fn new() -> Self {
        Self {
            params: IndexParams::default(),
        }
    }

    /// Create a calculator with custom coefficients
    pub fn with_params(params: IndexParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndexParams {
        &self.params
    }

    /// Compute every index for one pixel
    pub fn compute_pixel(&self, px: &PixelBands) -> SpectralIndices {
        let p = &self.params;

        let evi = ratio(
            p.evi_gain * (px.nir - px.red),
            px.nir + p.evi_c1 * px.red - p.evi_c2 * px.blue + p.evi_l,
        );
        let savi = ratio(px.nir - px.red, px.nir + px.red + p.savi_l).map(|v| v * (1.0 + p.savi_l));
        let bsi = ratio(
            (px.swir + px.red) - (px.nir + px.blue),
            (px.swir + px.red) + (px.nir + px.blue),
        );

        let brightness = (px.blue + px.green + px.red) / 3.0;

        SpectralIndices {
            ndvi: normalized_difference(px.nir, px.red),
            ndwi: normalized_difference(px.green, px.nir),
            ndbi: normalized_difference(px.swir, px.nir),
            evi,
            savi,
            ndre: normalized_difference(px.nir, px.red_edge),
            mndwi: normalized_difference(px.green, px.swir),
            bsi,
            brightness: brightness.is_finite().then_some(brightness),
        }
    }

    /// Compute the index raster for a band raster.
    ///
    /// Validation happens before any pixel is read: missing bands, then
    /// mismatched shapes, then an empty grid.
    pub fn compute(&self, bands: &BandRaster) -> LandCoverResult<IndexRaster> {
        let (rows, cols) = bands.validate()?;
        log::info!("Computing spectral indices for {}x{} raster", rows, cols);
        log::debug!("Index parameters: {:?}", self.params);

        let blue = bands.band(Band::B2)?;
        let green = bands.band(Band::B3)?;
        let red = bands.band(Band::B4)?;
        let red_edge = bands.band(Band::B5)?;
        let nir = bands.band(Band::B8)?;
        let swir = bands.band(Band::B11)?;

        let mut pixels = Array2::from_elem((rows, cols), SpectralIndices::default());
        let zip = Zip::indexed(&mut pixels);

        let per_pixel = |(i, j): (usize, usize), out: &mut SpectralIndices| {
            let px = PixelBands {
                blue: blue[[i, j]] as f64,
                green: green[[i, j]] as f64,
                red: red[[i, j]] as f64,
                red_edge: red_edge[[i, j]] as f64,
                nir: nir[[i, j]] as f64,
                swir: swir[[i, j]] as f64,
            };
            *out = self.compute_pixel(&px);
        };

        #[cfg(feature = "parallel")]
        zip.par_for_each(per_pixel);
        #[cfg(not(feature = "parallel"))]
        zip.for_each(per_pixel);

        let indices = IndexRaster::new(pixels);
        let undefined = indices.undefined_count();
        if undefined > 0 {
            let share = 100.0 * undefined as f64 / (rows * cols) as f64;
            if share > 50.0 {
                log::warn!("{:.1}% of pixels have undefined indices", share);
            } else {
                log::debug!("{} pixels have at least one undefined index", undefined);
            }
        }

        log::info!("Spectral index computation completed");
        Ok(indices)
    }
}

impl Default for IndexCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute indices with default coefficients
pub fn compute_indices(bands: &BandRaster) -> LandCoverResult<IndexRaster> {
    IndexCalculator::new().compute(bands)
}

/// Reject coefficient sets that cannot produce meaningful indices
pub fn validate_params(params: &IndexParams) -> LandCoverResult<()> {
    let values = [params.savi_l, params.evi_gain, params.evi_c1, params.evi_c2, params.evi_l];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LandCoverError::InvalidParameter(
            "index coefficients must be finite".to_string(),
        ));
    }
    if params.savi_l < 0.0 {
        return Err(LandCoverError::InvalidParameter(format!(
            "SAVI L must be non-negative, got {}",
            params.savi_l
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoordinateSystem, GeoTransform, SpectralIndex};
    use approx::assert_abs_diff_eq;

    fn pixel(blue: f64, green: f64, red: f64, red_edge: f64, nir: f64, swir: f64) -> PixelBands {
        PixelBands { blue, green, red, red_edge, nir, swir }
    }

    fn uniform_raster(values: [f32; 6], shape: (usize, usize)) -> BandRaster {
        let mut raster = BandRaster::new(GeoTransform::default(), CoordinateSystem::Projected { epsg: 32644 });
        for (band, value) in Band::REQUIRED.iter().zip(values) {
            raster.insert_band(*band, Array2::from_elem(shape, value));
        }
        raster
    }

    #[test]
    fn test_vegetation_pixel_formulas() {
        let calc = IndexCalculator::new();
        let idx = calc.compute_pixel(&pixel(0.04, 0.08, 0.05, 0.15, 0.45, 0.2));

        assert_abs_diff_eq!(idx.ndvi.unwrap(), 0.40 / 0.50, epsilon = 1e-12);
        assert_abs_diff_eq!(idx.ndwi.unwrap(), -0.37 / 0.53, epsilon = 1e-12);
        assert_abs_diff_eq!(idx.ndbi.unwrap(), -0.25 / 0.65, epsilon = 1e-12);
        assert_abs_diff_eq!(idx.evi.unwrap(), 2.5 * 0.40 / (0.45 + 0.30 - 0.30 + 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(idx.savi.unwrap(), 0.40 / 1.0 * 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(idx.ndre.unwrap(), 0.30 / 0.60, epsilon = 1e-12);
        assert_abs_diff_eq!(idx.mndwi.unwrap(), -0.12 / 0.28, epsilon = 1e-12);
        assert_abs_diff_eq!(idx.bsi.unwrap(), (0.25 - 0.49) / (0.25 + 0.49), epsilon = 1e-12);
        assert_abs_diff_eq!(idx.brightness.unwrap(), 0.17 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_denominator_is_undefined() {
        let calc = IndexCalculator::new();
        // NIR and red both zero: NDVI denominator is exactly zero
        let idx = calc.compute_pixel(&pixel(0.1, 0.1, 0.0, 0.1, 0.0, 0.1));

        assert_eq!(idx.ndvi, None);
        // SAVI keeps its L offset so it stays defined
        assert_eq!(idx.savi, Some(0.0));
        assert!(idx.has_undefined());
    }

    #[test]
    fn test_evi_zero_denominator() {
        let calc = IndexCalculator::new();
        // nir + 6*red - 7.5*blue + 1 = 0.875 + 0 - 1.875 + 1 = 0
        let idx = calc.compute_pixel(&pixel(0.25, 0.1, 0.0, 0.1, 0.875, 0.1));
        assert_eq!(idx.evi, None);
        assert!(idx.ndvi.is_some());
    }

    #[test]
    fn test_non_finite_band_propagates_as_undefined() {
        let calc = IndexCalculator::new();
        let idx = calc.compute_pixel(&pixel(f64::NAN, 0.1, 0.1, 0.1, 0.3, 0.2));

        assert_eq!(idx.evi, None);
        assert_eq!(idx.bsi, None);
        assert_eq!(idx.brightness, None);
        assert!(idx.ndvi.is_some());
        assert!(idx.mndwi.is_some());
    }

    #[test]
    fn test_no_clamping_above_one() {
        let calc = IndexCalculator::new();
        let idx = calc.compute_pixel(&pixel(1.2, 1.1, 1.05, 1.0, 1.3, 1.02));
        assert_abs_diff_eq!(idx.brightness.unwrap(), (1.2 + 1.1 + 1.05) / 3.0, epsilon = 1e-12);
        assert!(idx.ndvi.unwrap() > 0.0);
    }

    #[test]
    fn test_flat_reflectance_raster() {
        let indices = compute_indices(&uniform_raster([0.2; 6], (3, 4))).unwrap();
        assert_eq!(indices.dim(), (3, 4));

        for px in indices.pixels.iter() {
            for index in [
                SpectralIndex::Ndvi,
                SpectralIndex::Ndwi,
                SpectralIndex::Ndbi,
                SpectralIndex::Evi,
                SpectralIndex::Savi,
                SpectralIndex::Ndre,
                SpectralIndex::Mndwi,
                SpectralIndex::Bsi,
            ] {
                assert_eq!(px.get(index), Some(0.0), "{} should be zero", index);
            }
            assert_abs_diff_eq!(px.brightness.unwrap(), 0.2f32 as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_missing_band_error() {
        let mut raster = BandRaster::new(GeoTransform::default(), CoordinateSystem::Geographic);
        for band in [Band::B2, Band::B3, Band::B4, Band::B8, Band::B11] {
            raster.insert_band(band, Array2::zeros((2, 2)));
        }
        match compute_indices(&raster) {
            Err(LandCoverError::MissingBand(Band::B5)) => {}
            other => panic!("expected MissingBand(B5), got {:?}", other),
        }
    }

    #[test]
    fn test_empty_raster_error() {
        let result = compute_indices(&uniform_raster([0.1; 6], (0, 0)));
        assert!(matches!(result, Err(LandCoverError::EmptyRaster)));
    }

    #[test]
    fn test_custom_savi_l() {
        let calc = IndexCalculator::with_params(IndexParams {
            savi_l: 1.0,
            ..IndexParams::default()
        });
        let idx = calc.compute_pixel(&pixel(0.04, 0.08, 0.1, 0.15, 0.5, 0.2));
        assert_abs_diff_eq!(idx.savi.unwrap(), 0.4 / 1.6 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_params() {
        assert!(validate_params(&IndexParams::default()).is_ok());
        assert!(validate_params(&IndexParams { savi_l: -0.1, ..IndexParams::default() }).is_err());
        assert!(validate_params(&IndexParams { evi_gain: f64::NAN, ..IndexParams::default() }).is_err());
    }
}
