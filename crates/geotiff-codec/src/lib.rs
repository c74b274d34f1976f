//! Minimal GeoTIFF reader/writer for single-band rasters.
//!
//! This crate implements just enough of the TIFF 6.0 baseline plus the
//! GeoTIFF extension tags to produce and verify georeferenced fixture
//! rasters:
//! - classic (non-Big) TIFF, one image directory, one band
//! - unsigned/signed integer and IEEE float samples (8-64 bit)
//! - uncompressed or DEFLATE (zlib) strips
//! - `ModelPixelScale`/`ModelTiepoint` georeferencing, GeoKey CRS codes,
//!   and the `GDAL_NODATA` sentinel tag
//!
//! Anything outside that envelope (tiles, multiple bands, palette images,
//! rotated transforms) is rejected with a typed error rather than guessed
//! at.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod samples;
pub mod tags;
pub mod transform;

pub use decoder::decode;
pub use encoder::{encode, Compression, GeoTiffImage};
pub use error::{GeoTiffError, GeoTiffResult};
pub use samples::{ByteOrder, SampleData};
pub use transform::GeoTransform;
