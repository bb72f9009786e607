use crate::types::{ClassRaster, CoordinateSystem, GeoTransform, LandCoverResult, NODATA_CLASS};
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::DriverManager;
use std::path::Path;

/// GeoTIFF writer for class rasters
pub struct ClassRasterWriter;

impl ClassRasterWriter {
    /// Write a single `u8` band. Pixels outside the area of interest carry
    /// the nodata value 255.
    pub fn write_geotiff<P: AsRef<Path>>(
        raster: &ClassRaster,
        geo_transform: &GeoTransform,
        coordinate_system: CoordinateSystem,
        output_path: P,
    ) -> LandCoverResult<()> {
        log::info!("Writing class raster to: {}", output_path.as_ref().display());

        let (height, width) = raster.dim();
        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut dataset = driver.create_with_band_type::<u8, _>(
            output_path.as_ref(),
            width as isize,
            height as isize,
            1,
        )?;

        dataset.set_geo_transform(&geo_transform.to_gdal())?;

        let epsg = match coordinate_system {
            CoordinateSystem::Geographic => Some(4326),
            CoordinateSystem::Projected { epsg: 0 } => None,
            CoordinateSystem::Projected { epsg } => Some(epsg),
        };
        if let Some(code) = epsg {
            dataset.set_spatial_ref(&SpatialRef::from_epsg(code)?)?;
        }

        let mut rasterband = dataset.rasterband(1)?;
        let flat_data: Vec<u8> = raster.masked_codes().iter().copied().collect();
        let buffer = Buffer::new((width, height), flat_data);
        rasterband.write((0, 0), (width, height), &buffer)?;
        rasterband.set_no_data_value(Some(NODATA_CLASS as f64))?;

        log::debug!("Wrote {}x{} class raster", width, height);
        Ok(())
    }
}
