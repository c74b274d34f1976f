//! Error types for fixture raster writing.

use std::path::PathBuf;

use thiserror::Error;

use crate::sample_type::SampleType;
use geotiff_codec::GeoTiffError;

/// Result type alias using FixtureError.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Primary error type for fixture raster operations.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The destination cannot be created or written; most commonly the
    /// parent directory does not exist (creating it is the caller's job).
    #[error("cannot write {}: {source}", .path.display())]
    PathUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested value does not fit the requested sample type. Values
    /// are never silently truncated.
    #[error("value {value} is not representable as {sample_type}: {reason}")]
    TypeMismatch {
        value: f64,
        sample_type: SampleType,
        reason: String,
    },

    #[error("GeoTIFF encoding failed: {0}")]
    Encoding(#[from] GeoTiffError),
}
