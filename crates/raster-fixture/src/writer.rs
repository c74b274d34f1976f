//! The uniform raster writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{FixtureError, FixtureResult};
use crate::sample_type::SampleType;
use geotiff_codec::{Compression, GeoTiffImage, GeoTransform};

/// Affine transform placing one pixel over the whole globe: 360° wide,
/// 180° tall, anchored at (−180°, 90°) with the row axis pointing south.
pub const GLOBAL_TRANSFORM: GeoTransform =
    GeoTransform::new(360.0, 0.0, -180.0, 0.0, -180.0, 90.0);

/// EPSG code of the geographic CRS every fixture raster is written in.
pub const GEOGRAPHIC_CRS_EPSG: u16 = 4326;

/// Summary of a written fixture raster, as returned to the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct UniformRaster {
    pub path: PathBuf,
    pub value: f64,
    pub sample_type: SampleType,
    pub bytes_written: usize,
}

/// Write a 1×1 global-coverage GeoTIFF holding `value`.
///
/// The file is created or truncated at `path` (last writer wins; the
/// parent directory must already exist) and is fully flushed and closed
/// before this returns. The raster is always EPSG:4326 with the
/// [`GLOBAL_TRANSFORM`] affine and the nodata sentinel of `sample_type`;
/// only the stored sample varies. Identical inputs produce byte-identical
/// files.
///
/// Note that writing NaN into a floating raster is allowed and yields a
/// pixel indistinguishable from nodata on read-back.
pub fn write_uniform_raster(
    path: &Path,
    value: f64,
    sample_type: SampleType,
) -> FixtureResult<UniformRaster> {
    let samples = sample_type.encode_scalar(value)?;
    let image = GeoTiffImage {
        width: 1,
        height: 1,
        samples,
        transform: GLOBAL_TRANSFORM,
        epsg: GEOGRAPHIC_CRS_EPSG,
        nodata: Some(sample_type.nodata()),
        compression: Compression::None,
    };
    let bytes = geotiff_codec::encode(&image)?;

    fs::write(path, &bytes).map_err(|source| FixtureError::PathUnwritable {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        value,
        dtype = %sample_type,
        bytes = bytes.len(),
        "wrote uniform raster"
    );

    Ok(UniformRaster {
        path: path.to_path_buf(),
        value,
        sample_type,
        bytes_written: bytes.len(),
    })
}
