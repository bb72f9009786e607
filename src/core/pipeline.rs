use crate::core::classify::{ClassifierThresholds, RuleClassifier};
use crate::core::indices::{validate_params, IndexCalculator, IndexParams};
use crate::core::smoothing::{ModeFilter, SmoothingParams};
use crate::types::{
    AreaOfInterest, BandRaster, ClassRaster, ClassSummary, CoordinateSystem, IndexRaster, LandCoverError,
    LandCoverResult,
};
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEGREE: f64 = 111_320.0;

/// End-to-end processing parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineParams {
    pub indices: IndexParams,
    pub thresholds: ClassifierThresholds,
    pub smoothing: SmoothingParams,
    /// Ground pixel size in meters; derived from the geotransform when unset
    pub pixel_size_m: Option<f64>,
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Smoothed classes with the AOI mask attached
    pub classes: ClassRaster,
    pub indices: IndexRaster,
    pub summary: ClassSummary,
    pub pixel_size_m: f64,
}

/// Index calculation, rule classification and mode filtering clipped to an
/// area of interest
pub struct LandCoverPipeline {
    params: PipelineParams,
}

impl LandCoverPipeline {
    pub fn new() -> Self {
        Self {
            params: PipelineParams::default(),
        }
    }

    pub fn with_params(params: PipelineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Ground pixel size used to convert the smoothing radius to pixels
    pub fn pixel_size_m(&self, bands: &BandRaster) -> LandCoverResult<f64> {
        let size = match self.params.pixel_size_m {
            Some(size) => size,
            None => ground_pixel_size(bands)?,
        };

        if !size.is_finite() || size <= 0.0 {
            return Err(LandCoverError::InvalidParameter(format!(
                "pixel size must be a positive finite number of meters, got {}",
                size
            )));
        }
        Ok(size)
    }

    /// Run the full pipeline.
    ///
    /// Band validation errors surface before any pixel is processed. Nothing
    /// partial is returned on failure.
    pub fn run(&self, bands: &BandRaster, aoi: &AreaOfInterest) -> LandCoverResult<PipelineOutput> {
        log::info!("Starting land-cover classification");
        validate_params(&self.params.indices)?;

        let indices = IndexCalculator::with_params(self.params.indices.clone()).compute(bands)?;
        let pixel_size_m = self.pixel_size_m(bands)?;

        let mask = aoi.mask(indices.dim(), &bands.geo_transform);
        let inside = mask.iter().filter(|&&m| m).count();
        if inside == 0 {
            return Err(LandCoverError::InvalidAreaOfInterest(
                "area of interest does not cover any pixel centre".to_string(),
            ));
        }
        log::debug!("Area of interest covers {} of {} pixels", inside, mask.len());

        let classifier = RuleClassifier::with_thresholds(self.params.thresholds.clone());
        let raw = classifier.classify(&indices).with_mask(mask)?;

        let classes = ModeFilter::with_params(self.params.smoothing.clone()).apply(&raw, pixel_size_m)?;
        let summary = ClassSummary::from_raster(&classes, pixel_size_m, bands.acquisition_time);

        for area in &summary.classes {
            log::debug!(
                "{}: {} pixels, {:.0} m2",
                area.class.name(),
                area.pixel_count,
                area.area_m2
            );
        }
        log::info!("Land-cover classification completed");

        Ok(PipelineOutput {
            classes,
            indices,
            summary,
            pixel_size_m,
        })
    }
}

impl Default for LandCoverPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel size in meters from the geotransform. Geographic rasters are
/// converted at the latitude of the raster centre.
pub fn ground_pixel_size(bands: &BandRaster) -> LandCoverResult<f64> {
    let (rows, cols) = bands.validate()?;
    let gt = &bands.geo_transform;
    let width = gt.pixel_width.abs();
    let height = gt.pixel_height.abs();

    let size = match bands.coordinate_system {
        CoordinateSystem::Projected { .. } => (width * height).sqrt(),
        CoordinateSystem::Geographic => {
            let (_, lat) = gt.pixel_center(rows / 2, cols / 2);
            let meters_x = width * METERS_PER_DEGREE * lat.to_radians().cos();
            let meters_y = height * METERS_PER_DEGREE;
            (meters_x * meters_y).sqrt()
        }
    };

    log::debug!("Derived ground pixel size: {:.3} m", size);
    Ok(size)
}

/// Classify a band raster inside `aoi` with default parameters and the given
/// smoothing radius
pub fn classify_landcover(
    bands: &BandRaster,
    aoi: &AreaOfInterest,
    smoothing_radius_m: f64,
) -> LandCoverResult<ClassRaster> {
    let params = PipelineParams {
        smoothing: SmoothingParams {
            radius_meters: smoothing_radius_m,
        },
        ..PipelineParams::default()
    };
    LandCoverPipeline::with_params(params)
        .run(bands, aoi)
        .map(|output| output.classes)
}
