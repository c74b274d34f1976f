//! Uniform raster fixtures for geospatial pipelines.
//!
//! A uniform raster is a single-pixel GeoTIFF whose one cell covers the
//! entire globe in EPSG:4326 and holds a constant value. Pipelines use
//! them as degenerate inputs: any lookup anywhere on Earth resolves to the
//! same sample.

pub mod error;
pub mod sample_type;
pub mod writer;

pub use error::{FixtureError, FixtureResult};
pub use sample_type::{ParseSampleTypeError, SampleType};
pub use writer::{write_uniform_raster, UniformRaster, GEOGRAPHIC_CRS_EPSG, GLOBAL_TRANSFORM};
