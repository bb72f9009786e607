use crate::types::{ClassRaster, LandCoverError, LandCoverResult};
use ndarray::{Array2, ArrayViewMut1, Axis, Zip};
use serde::{Deserialize, Serialize};

/// Default smoothing radius in meters
pub const DEFAULT_SMOOTHING_RADIUS_M: f64 = 12.0;

/// Number of distinct class codes a neighbourhood can vote for
const CLASS_COUNT: usize = 8;

/// Majority filter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Neighbourhood radius in meters
    pub radius_meters: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_SMOOTHING_RADIUS_M,
        }
    }
}

/// Circular-neighbourhood mode filter for class rasters
pub struct ModeFilter {
    params: SmoothingParams,
}

impl ModeFilter {
    /// Create a filter with the default 12 m radius
    pub fn new() -> Self {
        Self {
            params: SmoothingParams::default(),
        }
    }

    /// Create a filter with custom parameters
    pub fn with_params(params: SmoothingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SmoothingParams {
        &self.params
    }

    /// Pixel offsets whose centres lie within `radius_meters` of the origin.
    ///
    /// The centre pixel is always part of the kernel, even for radii smaller
    /// than one pixel. The reach is capped at the extent of a raster of
    /// `shape`, beyond which no offset can land in bounds.
    pub fn kernel_offsets(
        radius_meters: f64,
        pixel_size_meters: f64,
        shape: (usize, usize),
    ) -> LandCoverResult<Vec<(isize, isize)>> {
        validate_positive("smoothing radius", radius_meters)?;
        validate_positive("pixel size", pixel_size_meters)?;

        let extent = shape.0.max(shape.1).saturating_sub(1);
        let reach_px = (radius_meters / pixel_size_meters).floor();
        if reach_px > extent as f64 {
            log::debug!(
                "Kernel reach of {} pixels capped at raster extent {}",
                reach_px, extent
            );
        }
        let reach = reach_px.min(extent as f64) as isize;
        let r_sq = radius_meters * radius_meters;

        let mut offsets = Vec::new();
        for dr in -reach..=reach {
            for dc in -reach..=reach {
                let dy = dr as f64 * pixel_size_meters;
                let dx = dc as f64 * pixel_size_meters;
                if dy * dy + dx * dx <= r_sq {
                    offsets.push((dr, dc));
                }
            }
        }

        Ok(offsets)
    }

    /// Apply the filter using `pixel_size_meters` to convert the radius
    pub fn apply(&self, classes: &ClassRaster, pixel_size_meters: f64) -> LandCoverResult<ClassRaster> {
        let (rows, cols) = classes.dim();
        let offsets = Self::kernel_offsets(self.params.radius_meters, pixel_size_meters, (rows, cols))?;

        log::info!(
            "Applying {:.1} m mode filter to {}x{} class raster",
            self.params.radius_meters, rows, cols
        );
        log::debug!("Kernel has {} pixels at {:.2} m pixel size", offsets.len(), pixel_size_meters);

        let mut smoothed = Array2::<u8>::zeros((rows, cols));

        let filter_row = |i: usize, mut row: ArrayViewMut1<u8>| {
            for (j, out) in row.iter_mut().enumerate() {
                *out = mode_at(classes, &offsets, i, j);
            }
        };

        // One task per output row
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            smoothed
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(i, row)| filter_row(i, row));
        }
        #[cfg(not(feature = "parallel"))]
        for (i, row) in smoothed.axis_iter_mut(Axis(0)).enumerate() {
            filter_row(i, row);
        }

        let changed = Zip::from(&smoothed)
            .and(&classes.codes)
            .fold(0usize, |acc, a, b| acc + usize::from(a != b));
        log::debug!("Mode filter changed {} pixels", changed);
        log::info!("Mode filtering completed");

        Ok(ClassRaster {
            codes: smoothed,
            mask: classes.mask.clone(),
        })
    }
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_positive(name: &str, value: f64) -> LandCoverResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LandCoverError::InvalidParameter(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Most frequent in-bounds, in-AOI neighbour code; ties go to the lowest code.
/// Pixels outside the AOI keep their input code.
fn mode_at(classes: &ClassRaster, offsets: &[(isize, isize)], i: usize, j: usize) -> u8 {
    let center = classes.codes[[i, j]];
    if !classes.is_inside(i, j) {
        return center;
    }

    let (rows, cols) = classes.dim();
    let mut votes = [0u32; CLASS_COUNT];

    for &(dr, dc) in offsets {
        let ni = i as isize + dr;
        let nj = j as isize + dc;
        if ni < 0 || nj < 0 || ni >= rows as isize || nj >= cols as isize {
            continue;
        }
        let (ni, nj) = (ni as usize, nj as usize);
        if !classes.is_inside(ni, nj) {
            continue;
        }
        if let Some(slot) = votes.get_mut(classes.codes[[ni, nj]] as usize) {
            *slot += 1;
        }
    }

    let mut best = center;
    let mut best_count = 0;
    for (code, &count) in votes.iter().enumerate() {
        // Strictly greater keeps the lowest code on ties
        if count > best_count {
            best = code as u8;
            best_count = count;
        }
    }
    best
}

/// Smooth a class raster with a circular mode filter
pub fn smooth(classes: &ClassRaster, radius_meters: f64, pixel_size_meters: f64) -> LandCoverResult<ClassRaster> {
    ModeFilter::with_params(SmoothingParams { radius_meters }).apply(classes, pixel_size_meters)
}
