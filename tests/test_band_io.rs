#![cfg(feature = "gdal")]

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use landcover::io::{BandMapping, BandReader, ClassRasterWriter};
use landcover::{classify_landcover, AreaOfInterest, Band, CoordinateSystem, NODATA_CLASS};
use std::path::Path;

const WIDTH: usize = 6;
const HEIGHT: usize = 4;
const ORIGIN: (f64, f64) = (500_000.0, 3_000_000.0);

// Digital numbers (reflectance * 10000) in B2, B3, B4, B5, B8, B11 order
const WATER_DN: [u16; 6] = [500, 2700, 400, 300, 200, 1300];
const FOREST_DN: [u16; 6] = [300, 600, 300, 1500, 4500, 2000];

/// Left half deep water, right half dense forest
fn write_stack(path: &Path) {
    let driver = DriverManager::get_driver_by_name("GTiff").expect("GTiff driver");
    let mut dataset = driver
        .create_with_band_type::<u16, _>(path, WIDTH as isize, HEIGHT as isize, 6)
        .expect("Failed to create test raster");
    dataset
        .set_geo_transform(&[ORIGIN.0, 10.0, 0.0, ORIGIN.1, 0.0, -10.0])
        .expect("geotransform");
    dataset
        .set_spatial_ref(&SpatialRef::from_epsg(32644).expect("EPSG:32644"))
        .expect("spatial ref");

    for band in 0..6 {
        let data: Vec<u16> = (0..HEIGHT * WIDTH)
            .map(|k| if k % WIDTH < WIDTH / 2 { WATER_DN[band] } else { FOREST_DN[band] })
            .collect();
        let buffer = Buffer::new((WIDTH, HEIGHT), data);
        let mut rasterband = dataset.rasterband(band as isize + 1).expect("band");
        rasterband.write((0, 0), (WIDTH, HEIGHT), &buffer).expect("write band");
    }
}

#[test]
fn test_read_classify_write_roundtrip() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("stack.tif");
    let output = dir.path().join("classes.tif");
    write_stack(&input);

    let raster = BandReader::new()
        .read(&input, &BandMapping::sentinel2_stack())
        .expect("Failed to read band stack");
    assert_eq!(raster.validate().expect("valid"), (HEIGHT, WIDTH));
    assert_eq!(raster.coordinate_system, CoordinateSystem::Projected { epsg: 32644 });

    let b3 = raster.band(Band::B3).expect("B3");
    approx::assert_relative_eq!(b3[[0, 0]], 0.27, epsilon = 1e-6);

    // Everything but the bottom row
    let (x0, y0) = ORIGIN;
    let aoi = AreaOfInterest::from_exterior(&[
        (x0, y0),
        (x0 + 60.0, y0),
        (x0 + 60.0, y0 - 30.0),
        (x0, y0 - 30.0),
    ])
    .expect("AOI");

    let classes = classify_landcover(&raster, &aoi, 12.0).expect("classification");
    ClassRasterWriter::write_geotiff(&classes, &raster.geo_transform, raster.coordinate_system, &output)
        .expect("Failed to write class raster");

    let dataset = Dataset::open(&output).expect("Failed to open class raster");
    assert_eq!(dataset.raster_size(), (WIDTH, HEIGHT));
    let band = dataset.rasterband(1).expect("band");
    assert_eq!(band.no_data_value(), Some(NODATA_CLASS as f64));

    let codes = band
        .read_as::<u8>((0, 0), (WIDTH, HEIGHT), (WIDTH, HEIGHT), None)
        .expect("read classes");
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let code = codes.data[row * WIDTH + col];
            let expected = match (row, col < WIDTH / 2) {
                (3, _) => NODATA_CLASS,
                (_, true) => 0,
                (_, false) => 2,
            };
            assert_eq!(code, expected, "pixel ({}, {})", row, col);
        }
    }
}

#[test]
fn test_mapping_out_of_range_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("stack.tif");
    write_stack(&input);

    let mapping = BandMapping::new(vec![(Band::B2, 1), (Band::B11, 9)]);
    assert!(BandReader::new().read(&input, &mapping).is_err());
}
