//! TIFF tag, field type, and GeoKey constants used by the codec.

// === Baseline TIFF tags ===
pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const COMPRESSION: u16 = 259;
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
pub const STRIP_OFFSETS: u16 = 273;
pub const SAMPLES_PER_PIXEL: u16 = 277;
pub const ROWS_PER_STRIP: u16 = 278;
pub const STRIP_BYTE_COUNTS: u16 = 279;
pub const PLANAR_CONFIGURATION: u16 = 284;
pub const SAMPLE_FORMAT: u16 = 339;

// === GeoTIFF extension tags ===
pub const MODEL_PIXEL_SCALE: u16 = 33550;
pub const MODEL_TIEPOINT: u16 = 33922;
pub const GEO_KEY_DIRECTORY: u16 = 34735;

/// GDAL's ASCII nodata sentinel tag.
pub const GDAL_NODATA: u16 = 42113;

// === TIFF field types ===
pub const TYPE_BYTE: u16 = 1;
pub const TYPE_ASCII: u16 = 2;
pub const TYPE_SHORT: u16 = 3;
pub const TYPE_LONG: u16 = 4;
pub const TYPE_RATIONAL: u16 = 5;
pub const TYPE_SBYTE: u16 = 6;
pub const TYPE_SSHORT: u16 = 8;
pub const TYPE_SLONG: u16 = 9;
pub const TYPE_FLOAT: u16 = 11;
pub const TYPE_DOUBLE: u16 = 12;

/// Size in bytes of one value of the given TIFF field type, if known.
pub fn field_type_size(field_type: u16) -> Option<usize> {
    match field_type {
        TYPE_BYTE | TYPE_ASCII | TYPE_SBYTE => Some(1),
        TYPE_SHORT | TYPE_SSHORT => Some(2),
        TYPE_LONG | TYPE_SLONG | TYPE_FLOAT => Some(4),
        TYPE_RATIONAL | TYPE_DOUBLE => Some(8),
        _ => None,
    }
}

// === Compression codes ===
pub const COMPRESSION_NONE: u16 = 1;
pub const COMPRESSION_DEFLATE: u16 = 8;
/// Pre-standard deflate code still emitted by some writers.
pub const COMPRESSION_DEFLATE_LEGACY: u16 = 32946;

// === SampleFormat values ===
pub const SAMPLE_FORMAT_UINT: u16 = 1;
pub const SAMPLE_FORMAT_INT: u16 = 2;
pub const SAMPLE_FORMAT_IEEE_FP: u16 = 3;

// === GeoKey ids (stored inside the GeoKeyDirectory tag) ===
pub const KEY_GT_MODEL_TYPE: u16 = 1024;
pub const KEY_GT_RASTER_TYPE: u16 = 1025;
pub const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
pub const KEY_PROJECTED_CS_TYPE: u16 = 3072;

/// GTModelTypeGeoKey value for geographic (lat/lon) rasters.
pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
/// GTRasterTypeGeoKey value for area (cell) pixels.
pub const RASTER_PIXEL_IS_AREA: u16 = 1;
