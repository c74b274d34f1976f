//! Error types for GeoTIFF encoding and decoding.

use thiserror::Error;

/// Result type alias using GeoTiffError.
pub type GeoTiffResult<T> = Result<T, GeoTiffError>;

/// Primary error type for GeoTIFF operations.
#[derive(Debug, Error)]
pub enum GeoTiffError {
    #[error("not a TIFF file (bad magic bytes)")]
    BadMagic,

    #[error("truncated TIFF: {0}")]
    Truncated(String),

    #[error("missing required tag: {0}")]
    MissingTag(&'static str),

    #[error("unsupported TIFF feature: {0}")]
    Unsupported(String),

    #[error("sample count {samples} does not match {width}x{height} grid")]
    ShapeMismatch {
        samples: usize,
        width: u32,
        height: u32,
    },

    #[error("transform has rotation or is not north-up; cannot be encoded as pixel scale + tiepoint")]
    UnencodableTransform,

    #[error("strip compression failed: {0}")]
    Compression(#[from] std::io::Error),
}
