use chrono::{DateTime, Utc};
use geo::{Coord, Intersects, Polygon};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Real-valued reflectance sample
pub type Reflectance = f32;

/// 2D reflectance grid for a single band (rows x cols)
pub type BandImage = Array2<Reflectance>;

/// Value written for pixels outside the area of interest on export
pub const NODATA_CLASS: u8 = 255;

/// Coordinate system enumeration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Geographic coordinates (longitude, latitude in degrees)
    Geographic,
    /// Projected coordinates in meters (e.g., UTM)
    Projected { epsg: u32 },
}

/// Sentinel-2 spectral bands used by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// Blue (490 nm)
    B2,
    /// Green (560 nm)
    B3,
    /// Red (665 nm)
    B4,
    /// Vegetation red edge (705 nm)
    B5,
    /// Near infrared (842 nm)
    B8,
    /// Short-wave infrared (1610 nm)
    B11,
    /// Cloud/quality bitmask, consumed upstream
    QA60,
}

impl Band {
    /// Bands that must be present before any index can be computed
    pub const REQUIRED: [Band; 6] = [Band::B2, Band::B3, Band::B4, Band::B5, Band::B8, Band::B11];
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::B2 => write!(f, "B2"),
            Band::B3 => write!(f, "B3"),
            Band::B4 => write!(f, "B4"),
            Band::B5 => write!(f, "B5"),
            Band::B8 => write!(f, "B8"),
            Band::B11 => write!(f, "B11"),
            Band::QA60 => write!(f, "QA60"),
        }
    }
}

impl FromStr for Band {
    type Err = LandCoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "B2" | "B02" => Ok(Band::B2),
            "B3" | "B03" => Ok(Band::B3),
            "B4" | "B04" => Ok(Band::B4),
            "B5" | "B05" => Ok(Band::B5),
            "B8" | "B08" => Ok(Band::B8),
            "B11" => Ok(Band::B11),
            "QA60" => Ok(Band::QA60),
            _ => Err(LandCoverError::InvalidParameter(format!("Unknown band: {}", s))),
        }
    }
}

/// Geospatial transformation parameters (GDAL ordering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform with square pixels
    pub fn north_up(top_left_x: f64, top_left_y: f64, pixel_size: f64) -> Self {
        Self {
            top_left_x,
            pixel_width: pixel_size,
            rotation_x: 0.0,
            top_left_y,
            rotation_y: 0.0,
            pixel_height: -pixel_size,
        }
    }

    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self {
            top_left_x: gt[0],
            pixel_width: gt[1],
            rotation_x: gt[2],
            top_left_y: gt[3],
            rotation_y: gt[4],
            pixel_height: gt[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }

    /// World coordinates of the centre of pixel (row, col)
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        let px = col as f64 + 0.5;
        let py = row as f64 + 0.5;
        (
            self.top_left_x + px * self.pixel_width + py * self.rotation_x,
            self.top_left_y + px * self.rotation_y + py * self.pixel_height,
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::north_up(0.0, 0.0, 10.0)
    }
}

/// Multi-band reflectance raster handed over by the imagery provider.
///
/// Bands are expected to be co-registered; the index calculator checks this
/// before touching any pixel.
#[derive(Debug, Clone)]
pub struct BandRaster {
    bands: HashMap<Band, BandImage>,
    pub geo_transform: GeoTransform,
    pub coordinate_system: CoordinateSystem,
    pub acquisition_time: Option<DateTime<Utc>>,
}

impl BandRaster {
    pub fn new(geo_transform: GeoTransform, coordinate_system: CoordinateSystem) -> Self {
        Self {
            bands: HashMap::new(),
            geo_transform,
            coordinate_system,
            acquisition_time: None,
        }
    }

    pub fn with_band(mut self, band: Band, data: BandImage) -> Self {
        self.bands.insert(band, data);
        self
    }

    pub fn with_acquisition_time(mut self, time: DateTime<Utc>) -> Self {
        self.acquisition_time = Some(time);
        self
    }

    /// Insert or replace a band, returning the previous data if any
    pub fn insert_band(&mut self, band: Band, data: BandImage) -> Option<BandImage> {
        self.bands.insert(band, data)
    }

    /// Insert double-precision reflectance, narrowed to `f32`
    pub fn insert_band_f64(&mut self, band: Band, data: ArrayView2<f64>) -> Option<BandImage> {
        self.insert_band(band, data.mapv(|v| v as Reflectance))
    }

    pub fn band(&self, band: Band) -> LandCoverResult<&BandImage> {
        self.bands.get(&band).ok_or(LandCoverError::MissingBand(band))
    }

    pub fn has_band(&self, band: Band) -> bool {
        self.bands.contains_key(&band)
    }

    /// Band names present, sorted
    pub fn bands(&self) -> Vec<Band> {
        let mut names: Vec<Band> = self.bands.keys().copied().collect();
        names.sort();
        names
    }

    /// Dimensions shared by the required bands.
    ///
    /// Fails on the first missing band, then on the first band whose shape
    /// differs from B2, then on a zero-pixel grid.
    pub fn validate(&self) -> LandCoverResult<(usize, usize)> {
        for band in Band::REQUIRED {
            if !self.has_band(band) {
                return Err(LandCoverError::MissingBand(band));
            }
        }

        let expected = self.band(Band::B2)?.dim();
        for band in self.bands() {
            let found = self.bands[&band].dim();
            if found != expected {
                return Err(LandCoverError::ShapeMismatch { band, expected, found });
            }
        }

        if expected.0 == 0 || expected.1 == 0 {
            return Err(LandCoverError::EmptyRaster);
        }

        Ok(expected)
    }
}

/// Spectral indices derived by the index calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectralIndex {
    Ndvi,
    Ndwi,
    Ndbi,
    Evi,
    Savi,
    Ndre,
    Mndwi,
    Bsi,
    Brightness,
}

impl SpectralIndex {
    pub const ALL: [SpectralIndex; 9] = [
        SpectralIndex::Ndvi,
        SpectralIndex::Ndwi,
        SpectralIndex::Ndbi,
        SpectralIndex::Evi,
        SpectralIndex::Savi,
        SpectralIndex::Ndre,
        SpectralIndex::Mndwi,
        SpectralIndex::Bsi,
        SpectralIndex::Brightness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpectralIndex::Ndvi => "NDVI",
            SpectralIndex::Ndwi => "NDWI",
            SpectralIndex::Ndbi => "NDBI",
            SpectralIndex::Evi => "EVI",
            SpectralIndex::Savi => "SAVI",
            SpectralIndex::Ndre => "NDRE",
            SpectralIndex::Mndwi => "MNDWI",
            SpectralIndex::Bsi => "BSI",
            SpectralIndex::Brightness => "brightness",
        }
    }
}

impl std::fmt::Display for SpectralIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Index values for one pixel. `None` marks an undefined value (zero
/// denominator or non-finite input); every comparison against it is false.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralIndices {
    pub ndvi: Option<f64>,
    pub ndwi: Option<f64>,
    pub ndbi: Option<f64>,
    pub evi: Option<f64>,
    pub savi: Option<f64>,
    pub ndre: Option<f64>,
    pub mndwi: Option<f64>,
    pub bsi: Option<f64>,
    pub brightness: Option<f64>,
}

impl SpectralIndices {
    pub fn get(&self, index: SpectralIndex) -> Option<f64> {
        match index {
            SpectralIndex::Ndvi => self.ndvi,
            SpectralIndex::Ndwi => self.ndwi,
            SpectralIndex::Ndbi => self.ndbi,
            SpectralIndex::Evi => self.evi,
            SpectralIndex::Savi => self.savi,
            SpectralIndex::Ndre => self.ndre,
            SpectralIndex::Mndwi => self.mndwi,
            SpectralIndex::Bsi => self.bsi,
            SpectralIndex::Brightness => self.brightness,
        }
    }

    /// True when any index at this pixel is undefined
    pub fn has_undefined(&self) -> bool {
        SpectralIndex::ALL.iter().any(|&idx| self.get(idx).is_none())
    }
}

/// Per-pixel index grid, same shape as the band raster it came from
#[derive(Debug, Clone)]
pub struct IndexRaster {
    pub pixels: Array2<SpectralIndices>,
}

impl IndexRaster {
    pub fn new(pixels: Array2<SpectralIndices>) -> Self {
        Self { pixels }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    /// Extract a single index as its own grid
    pub fn plane(&self, index: SpectralIndex) -> Array2<Option<f64>> {
        self.pixels.map(|px| px.get(index))
    }

    /// Number of pixels with at least one undefined index
    pub fn undefined_count(&self) -> usize {
        self.pixels.iter().filter(|px| px.has_undefined()).count()
    }
}

/// The eight land-cover classes, by output code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LandCoverClass {
    DeepWater = 0,
    ShallowWater = 1,
    DenseForest = 2,
    MixedForest = 3,
    Grassland = 4,
    Buildings = 5,
    Roads = 6,
    BareSoil = 7,
}

impl LandCoverClass {
    pub const ALL: [LandCoverClass; 8] = [
        LandCoverClass::DeepWater,
        LandCoverClass::ShallowWater,
        LandCoverClass::DenseForest,
        LandCoverClass::MixedForest,
        LandCoverClass::Grassland,
        LandCoverClass::Buildings,
        LandCoverClass::Roads,
        LandCoverClass::BareSoil,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Display name used by the legend
    pub const fn name(self) -> &'static str {
        match self {
            LandCoverClass::DeepWater => "Deep Water",
            LandCoverClass::ShallowWater => "Wetland/Shallow Water",
            LandCoverClass::DenseForest => "Dense Forest",
            LandCoverClass::MixedForest => "Mixed Forest",
            LandCoverClass::Grassland => "Grassland",
            LandCoverClass::Buildings => "Buildings",
            LandCoverClass::Roads => "Roads",
            LandCoverClass::BareSoil => "Bare Soil",
        }
    }

    /// Display colour as `#rrggbb`
    pub const fn color(self) -> &'static str {
        match self {
            LandCoverClass::DeepWater => "#00008b",
            LandCoverClass::ShallowWater => "#00ced1",
            LandCoverClass::DenseForest => "#006400",
            LandCoverClass::MixedForest => "#228b22",
            LandCoverClass::Grassland => "#9acd32",
            LandCoverClass::Buildings => "#cd853f",
            LandCoverClass::Roads => "#404040",
            LandCoverClass::BareSoil => "#d2b48c",
        }
    }
}

impl std::fmt::Display for LandCoverClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Grid of class codes, optionally restricted to an area of interest
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRaster {
    pub codes: Array2<u8>,
    /// `true` where the pixel centre lies inside the area of interest
    pub mask: Option<Array2<bool>>,
}

impl ClassRaster {
    pub fn new(codes: Array2<u8>) -> Self {
        Self { codes, mask: None }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.codes.dim()
    }

    pub fn class_at(&self, row: usize, col: usize) -> Option<LandCoverClass> {
        self.codes.get((row, col)).copied().and_then(LandCoverClass::from_code)
    }

    pub fn is_inside(&self, row: usize, col: usize) -> bool {
        match &self.mask {
            Some(mask) => mask.get((row, col)).copied().unwrap_or(false),
            None => row < self.codes.nrows() && col < self.codes.ncols(),
        }
    }

    /// Attach an area-of-interest mask; it must match the raster shape
    pub fn with_mask(mut self, mask: Array2<bool>) -> LandCoverResult<Self> {
        if mask.dim() != self.codes.dim() {
            return Err(LandCoverError::InvalidAreaOfInterest(format!(
                "mask shape {:?} does not match raster shape {:?}",
                mask.dim(),
                self.codes.dim()
            )));
        }
        self.mask = Some(mask);
        Ok(self)
    }

    /// Codes with out-of-AOI pixels replaced by [`NODATA_CLASS`]
    pub fn masked_codes(&self) -> Array2<u8> {
        match &self.mask {
            Some(mask) => {
                let mut out = self.codes.clone();
                ndarray::Zip::from(&mut out).and(mask).for_each(|code, &inside| {
                    if !inside {
                        *code = NODATA_CLASS;
                    }
                });
                out
            }
            None => self.codes.clone(),
        }
    }

    /// Pixel count per class code over in-AOI pixels
    pub fn histogram(&self) -> [usize; 8] {
        let mut counts = [0usize; 8];
        for ((row, col), &code) in self.codes.indexed_iter() {
            if self.is_inside(row, col) {
                if let Some(slot) = counts.get_mut(code as usize) {
                    *slot += 1;
                }
            }
        }
        counts
    }
}

/// Polygon the pipeline is clipped to, in the raster's coordinate system
#[derive(Debug, Clone)]
pub struct AreaOfInterest {
    polygon: Polygon<f64>,
}

impl AreaOfInterest {
    pub fn new(polygon: Polygon<f64>) -> Self {
        Self { polygon }
    }

    /// Build from an exterior ring of (x, y) vertices; the ring is closed
    /// automatically
    pub fn from_exterior(vertices: &[(f64, f64)]) -> LandCoverResult<Self> {
        if vertices.len() < 3 {
            return Err(LandCoverError::InvalidAreaOfInterest(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(LandCoverError::InvalidAreaOfInterest(
                "polygon vertices must be finite".to_string(),
            ));
        }
        Ok(Self::new(Polygon::new(vertices.to_vec().into(), vec![])))
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Boundary-inclusive point test
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.polygon.intersects(&Coord { x, y })
    }

    /// Rasterise the polygon onto a grid by pixel-centre sampling
    pub fn mask(&self, shape: (usize, usize), geo_transform: &GeoTransform) -> Array2<bool> {
        Array2::from_shape_fn(shape, |(row, col)| {
            let (x, y) = geo_transform.pixel_center(row, col);
            self.contains_point(x, y)
        })
    }
}

/// Area statistics for one class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassArea {
    pub class: LandCoverClass,
    pub pixel_count: usize,
    pub area_m2: f64,
}

/// Per-class totals for a classified scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSummary {
    pub classes: Vec<ClassArea>,
    pub total_pixels: usize,
    pub acquisition_time: Option<DateTime<Utc>>,
}

impl ClassSummary {
    pub fn from_raster(
        raster: &ClassRaster,
        pixel_size_m: f64,
        acquisition_time: Option<DateTime<Utc>>,
    ) -> Self {
        let counts = raster.histogram();
        let pixel_area = pixel_size_m * pixel_size_m;
        let classes = LandCoverClass::ALL
            .iter()
            .map(|&class| {
                let pixel_count = counts[class.code() as usize];
                ClassArea {
                    class,
                    pixel_count,
                    area_m2: pixel_count as f64 * pixel_area,
                }
            })
            .collect();

        Self {
            classes,
            total_pixels: counts.iter().sum(),
            acquisition_time,
        }
    }

    /// Share of classified pixels belonging to `class`, in percent
    pub fn percentage(&self, class: LandCoverClass) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.classes
            .iter()
            .find(|c| c.class == class)
            .map(|c| 100.0 * c.pixel_count as f64 / self.total_pixels as f64)
            .unwrap_or(0.0)
    }
}

/// Error types for land-cover processing
#[derive(Debug, thiserror::Error)]
pub enum LandCoverError {
    #[error("Required band {0} is missing")]
    MissingBand(Band),

    #[error("Band {band} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        band: Band,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Input raster has no pixels")]
    EmptyRaster,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid area of interest: {0}")]
    InvalidAreaOfInterest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// Result type for land-cover operations
pub type LandCoverResult<T> = Result<T, LandCoverError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_raster(rows: usize, cols: usize) -> BandRaster {
        let mut raster = BandRaster::new(GeoTransform::default(), CoordinateSystem::Projected { epsg: 32644 });
        for band in Band::REQUIRED {
            raster.insert_band(band, Array2::from_elem((rows, cols), 0.1));
        }
        raster
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!("b8".parse::<Band>().unwrap(), Band::B8);
        assert_eq!("B02".parse::<Band>().unwrap(), Band::B2);
        assert_eq!("B11".parse::<Band>().unwrap(), Band::B11);
        assert!("B12".parse::<Band>().is_err());
        assert_eq!(Band::B11.to_string(), "B11");
    }

    #[test]
    fn test_insert_band_f64() {
        let mut raster = flat_raster(2, 3);
        let doubles = Array2::from_shape_fn((2, 3), |(i, j)| 0.25 * (i + j) as f64);
        let previous = raster.insert_band_f64(Band::B8, doubles.view());

        assert!(previous.is_some());
        assert_eq!(raster.band(Band::B8).unwrap()[[1, 2]], 0.75f32);
        assert_eq!(raster.validate().unwrap(), (2, 3));
    }

    #[test]
    fn test_validate_reports_missing_band_first() {
        let mut raster = flat_raster(4, 4);
        raster.bands.remove(&Band::B5);
        raster.insert_band(Band::B8, Array2::zeros((2, 2)));

        match raster.validate() {
            Err(LandCoverError::MissingBand(Band::B5)) => {}
            other => panic!("expected missing B5, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_shape_mismatch() {
        let raster = flat_raster(4, 4).with_band(Band::B11, Array2::zeros((4, 5)));

        match raster.validate() {
            Err(LandCoverError::ShapeMismatch { band, expected, found }) => {
                assert_eq!(band, Band::B11);
                assert_eq!(expected, (4, 4));
                assert_eq!(found, (4, 5));
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_checks_optional_bands_too() {
        let raster = flat_raster(3, 3).with_band(Band::QA60, Array2::zeros((2, 3)));
        assert!(matches!(
            raster.validate(),
            Err(LandCoverError::ShapeMismatch { band: Band::QA60, .. })
        ));
    }

    #[test]
    fn test_validate_empty() {
        let raster = flat_raster(0, 7);
        assert!(matches!(raster.validate(), Err(LandCoverError::EmptyRaster)));
    }

    #[test]
    fn test_class_codes_round_trip_names() {
        for class in LandCoverClass::ALL {
            assert_eq!(LandCoverClass::from_code(class.code()), Some(class));
        }
        assert_eq!(LandCoverClass::from_code(8), None);
        assert_eq!(LandCoverClass::ShallowWater.name(), "Wetland/Shallow Water");
    }

    #[test]
    fn test_pixel_center_north_up() {
        let gt = GeoTransform::north_up(500_000.0, 2_560_000.0, 10.0);
        let (x, y) = gt.pixel_center(0, 0);
        assert_eq!((x, y), (500_005.0, 2_559_995.0));
        let (x, y) = gt.pixel_center(2, 3);
        assert_eq!((x, y), (500_035.0, 2_559_975.0));
    }

    #[test]
    fn test_area_of_interest_mask() {
        // Square covering the left half of a 4x4 grid of 10 m pixels
        let aoi = AreaOfInterest::from_exterior(&[(0.0, 0.0), (20.0, 0.0), (20.0, -40.0), (0.0, -40.0)]).unwrap();
        let mask = aoi.mask((4, 4), &GeoTransform::north_up(0.0, 0.0, 10.0));

        for row in 0..4 {
            assert!(mask[[row, 0]]);
            assert!(mask[[row, 1]]);
            assert!(!mask[[row, 2]]);
            assert!(!mask[[row, 3]]);
        }
    }

    #[test]
    fn test_area_of_interest_rejects_degenerate() {
        assert!(AreaOfInterest::from_exterior(&[(0.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(AreaOfInterest::from_exterior(&[(0.0, 0.0), (1.0, f64::NAN), (2.0, 0.0)]).is_err());
    }

    #[test]
    fn test_masked_codes_and_histogram() {
        let codes = Array2::from_shape_vec((2, 2), vec![0u8, 2, 2, 7]).unwrap();
        let mask = Array2::from_shape_vec((2, 2), vec![true, true, false, true]).unwrap();
        let raster = ClassRaster::new(codes).with_mask(mask).unwrap();

        let masked = raster.masked_codes();
        assert_eq!(masked[[1, 0]], NODATA_CLASS);
        assert_eq!(masked[[0, 1]], 2);

        let hist = raster.histogram();
        assert_eq!(hist[0], 1);
        assert_eq!(hist[2], 1);
        assert_eq!(hist[7], 1);
        assert_eq!(hist.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_mask_shape_must_match() {
        let raster = ClassRaster::new(Array2::zeros((3, 3)));
        assert!(raster.with_mask(Array2::from_elem((2, 3), true)).is_err());
    }

    #[test]
    fn test_summary_areas() {
        let raster = ClassRaster::new(Array2::from_shape_vec((1, 4), vec![2u8, 2, 4, 7]).unwrap());
        let summary = ClassSummary::from_raster(&raster, 10.0, None);

        assert_eq!(summary.total_pixels, 4);
        let forest = &summary.classes[LandCoverClass::DenseForest.code() as usize];
        assert_eq!(forest.pixel_count, 2);
        assert!((forest.area_m2 - 200.0).abs() < 1e-9);
        assert!((summary.percentage(LandCoverClass::DenseForest) - 50.0).abs() < 1e-9);
        assert_eq!(summary.percentage(LandCoverClass::DeepWater), 0.0);
    }
}
