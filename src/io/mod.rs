//! I/O modules for reading reflectance stacks and writing class rasters

pub mod band_reader;
pub mod writer;

pub use band_reader::{BandMapping, BandReader, ReaderParams};
pub use writer::ClassRasterWriter;
