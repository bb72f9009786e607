use crate::types::{ClassRaster, IndexRaster, LandCoverClass, SpectralIndices};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// Decision thresholds for the rule list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    /// BSI above which a low-NDVI pixel is explicit bare soil
    pub bare_soil_bsi: f64,
    /// NDVI below which a high-BSI pixel is bare soil
    pub bare_soil_ndvi: f64,
    /// NDBI above which a pixel is built up
    pub built_up_ndbi: f64,
    /// NDVI below which a built-up pixel is not vegetated
    pub built_up_ndvi: f64,
    /// Brightness splitting roads (at or below) from buildings (above)
    pub road_brightness: f64,
    /// Lower (exclusive) SAVI bound for grassland
    pub grassland_savi_min: f64,
    /// Upper (inclusive) SAVI bound for grassland
    pub grassland_savi_max: f64,
    /// NDVI ceiling (inclusive) for grassland, floor (exclusive) for forest
    pub forest_ndvi: f64,
    /// EVI splitting mixed (at or below) from dense forest (above)
    pub dense_forest_evi: f64,
    /// NDRE above which a high-EVI pixel is dense forest
    pub dense_forest_ndre: f64,
    /// MNDWI above which a pixel is shallow water
    pub shallow_water_mndwi: f64,
    /// MNDWI above which a pixel is deep water
    pub deep_water_mndwi: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            bare_soil_bsi: 0.1,
            bare_soil_ndvi: 0.15,
            built_up_ndbi: 0.0,
            built_up_ndvi: 0.1,
            road_brightness: 0.08,
            grassland_savi_min: 0.15,
            grassland_savi_max: 0.35,
            forest_ndvi: 0.4,
            dense_forest_evi: 0.4,
            dense_forest_ndre: 0.3,
            shallow_water_mndwi: 0.1,
            deep_water_mndwi: 0.3,
        }
    }
}

// Comparisons against an undefined index are always false.
#[inline]
fn gt(value: Option<f64>, threshold: f64) -> bool {
    matches!(value, Some(v) if v > threshold)
}

#[inline]
fn lt(value: Option<f64>, threshold: f64) -> bool {
    matches!(value, Some(v) if v < threshold)
}

#[inline]
fn le(value: Option<f64>, threshold: f64) -> bool {
    matches!(value, Some(v) if v <= threshold)
}

/// Predicate over one pixel's indices
pub type RulePredicate = fn(&SpectralIndices, &ClassifierThresholds) -> bool;

/// One entry of the ordered rule list
#[derive(Clone, Copy)]
pub struct ClassRule {
    pub name: &'static str,
    pub class: LandCoverClass,
    pub predicate: RulePredicate,
}

impl std::fmt::Debug for ClassRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRule")
            .field("name", &self.name)
            .field("class", &self.class)
            .finish()
    }
}

fn is_bare_soil(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.bsi, t.bare_soil_bsi) && lt(px.ndvi, t.bare_soil_ndvi)
}

fn is_built_up(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.ndbi, t.built_up_ndbi) && lt(px.ndvi, t.built_up_ndvi)
}

fn is_road(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    is_built_up(px, t) && le(px.brightness, t.road_brightness)
}

fn is_building(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    is_built_up(px, t) && gt(px.brightness, t.road_brightness)
}

fn is_grassland(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.savi, t.grassland_savi_min) && le(px.savi, t.grassland_savi_max) && le(px.ndvi, t.forest_ndvi)
}

fn is_mixed_forest(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.ndvi, t.forest_ndvi) && le(px.evi, t.dense_forest_evi)
}

fn is_dense_forest(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.evi, t.dense_forest_evi) && gt(px.ndre, t.dense_forest_ndre)
}

fn is_shallow_water(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.mndwi, t.shallow_water_mndwi) && le(px.mndwi, t.deep_water_mndwi)
}

fn is_deep_water(px: &SpectralIndices, t: &ClassifierThresholds) -> bool {
    gt(px.mndwi, t.deep_water_mndwi)
}

/// Class written before any rule is evaluated
pub const DEFAULT_CLASS: LandCoverClass = LandCoverClass::BareSoil;

/// Rules in evaluation order. Each match overwrites whatever an earlier rule
/// wrote, so the last matching rule decides the class.
pub const RULES: [ClassRule; 8] = [
    ClassRule { name: "bare_soil", class: LandCoverClass::BareSoil, predicate: is_bare_soil },
    ClassRule { name: "roads", class: LandCoverClass::Roads, predicate: is_road },
    ClassRule { name: "buildings", class: LandCoverClass::Buildings, predicate: is_building },
    ClassRule { name: "grassland", class: LandCoverClass::Grassland, predicate: is_grassland },
    ClassRule { name: "mixed_forest", class: LandCoverClass::MixedForest, predicate: is_mixed_forest },
    ClassRule { name: "dense_forest", class: LandCoverClass::DenseForest, predicate: is_dense_forest },
    ClassRule { name: "shallow_water", class: LandCoverClass::ShallowWater, predicate: is_shallow_water },
    ClassRule { name: "deep_water", class: LandCoverClass::DeepWater, predicate: is_deep_water },
];

/// Ordered-overwrite rule classifier
pub struct RuleClassifier {
    thresholds: ClassifierThresholds,
}

impl RuleClassifier {
    /// Create a classifier with the default thresholds
    pub fn new() -> Self {
        Self {
            thresholds: ClassifierThresholds::default(),
        }
    }

    /// Create a classifier with custom thresholds
    pub fn with_thresholds(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// The rule list in evaluation order
    pub fn rules(&self) -> &'static [ClassRule] {
        &RULES
    }

    /// Classify one pixel
    pub fn classify_pixel(&self, px: &SpectralIndices) -> LandCoverClass {
        let mut class = DEFAULT_CLASS;
        for rule in &RULES {
            if (rule.predicate)(px, &self.thresholds) {
                class = rule.class;
            }
        }
        class
    }

    /// Names of every rule that fires for a pixel, in evaluation order
    pub fn matching_rules(&self, px: &SpectralIndices) -> Vec<&'static str> {
        RULES
            .iter()
            .filter(|rule| (rule.predicate)(px, &self.thresholds))
            .map(|rule| rule.name)
            .collect()
    }

    /// Classify a whole index raster
    pub fn classify(&self, indices: &IndexRaster) -> ClassRaster {
        let (rows, cols) = indices.dim();
        log::info!("Classifying {}x{} index raster with {} rules", rows, cols, RULES.len());
        log::debug!("Thresholds: {:?}", self.thresholds);

        let mut codes = Array2::<u8>::from_elem((rows, cols), DEFAULT_CLASS.code());
        let zip = Zip::from(&mut codes).and(&indices.pixels);

        let per_pixel = |code: &mut u8, px: &SpectralIndices| {
            *code = self.classify_pixel(px).code();
        };

        #[cfg(feature = "parallel")]
        zip.par_for_each(per_pixel);
        #[cfg(not(feature = "parallel"))]
        zip.for_each(per_pixel);

        let classes = ClassRaster::new(codes);
        log::debug!("Class histogram before smoothing: {:?}", classes.histogram());
        log::info!("Classification completed");
        classes
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default thresholds
pub fn classify(indices: &IndexRaster) -> ClassRaster {
    RuleClassifier::new().classify(indices)
}
