//! GeoTIFF encoding.
//!
//! Produces classic little-endian TIFF bytes with a single strip and a
//! single IFD. Layout: 8-byte header, strip data, IFD, then out-of-line
//! tag values. Tags are written in ascending order as TIFF requires.

use std::io::Write;

use tracing::debug;

use crate::error::{GeoTiffError, GeoTiffResult};
use crate::samples::SampleData;
use crate::tags;
use crate::transform::GeoTransform;

/// Strip compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw sample bytes (TIFF compression 1)
    #[default]
    None,
    /// zlib-wrapped DEFLATE (TIFF compression 8)
    Deflate,
}

impl Compression {
    fn code(&self) -> u16 {
        match self {
            Compression::None => tags::COMPRESSION_NONE,
            Compression::Deflate => tags::COMPRESSION_DEFLATE,
        }
    }
}

/// A single-band georeferenced raster, the unit of encoding and decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTiffImage {
    pub width: u32,
    pub height: u32,
    /// Row-major samples, exactly `width * height` of them
    pub samples: SampleData,
    pub transform: GeoTransform,
    /// EPSG code of the (geographic) CRS
    pub epsg: u16,
    /// Nodata sentinel recorded in the GDAL_NODATA tag
    pub nodata: Option<f64>,
    pub compression: Compression,
}

/// Encode an image as GeoTIFF bytes.
pub fn encode(image: &GeoTiffImage) -> GeoTiffResult<Vec<u8>> {
    if image.width == 0 || image.height == 0 {
        return Err(GeoTiffError::Unsupported("empty raster".to_string()));
    }
    let expected = image.width as usize * image.height as usize;
    if image.samples.len() != expected {
        return Err(GeoTiffError::ShapeMismatch {
            samples: image.samples.len(),
            width: image.width,
            height: image.height,
        });
    }

    let pixel_scale = image.transform.to_pixel_scale()?;
    let tiepoint = image.transform.to_tiepoint();

    // Single strip holding every row
    let strip = match image.compression {
        Compression::None => image.samples.to_le_bytes(),
        Compression::Deflate => deflate_strip(&image.samples.to_le_bytes())?,
    };

    const STRIP_OFFSET: u32 = 8;
    let mut entries = Vec::with_capacity(16);
    entries.push(IfdEntry::long(tags::IMAGE_WIDTH, image.width));
    entries.push(IfdEntry::long(tags::IMAGE_LENGTH, image.height));
    entries.push(IfdEntry::short(
        tags::BITS_PER_SAMPLE,
        image.samples.bits_per_sample(),
    ));
    entries.push(IfdEntry::short(tags::COMPRESSION, image.compression.code()));
    // BlackIsZero, the conventional photometric for grayscale data
    entries.push(IfdEntry::short(tags::PHOTOMETRIC_INTERPRETATION, 1));
    entries.push(IfdEntry::long(tags::STRIP_OFFSETS, STRIP_OFFSET));
    entries.push(IfdEntry::short(tags::SAMPLES_PER_PIXEL, 1));
    entries.push(IfdEntry::long(tags::ROWS_PER_STRIP, image.height));
    entries.push(IfdEntry::long(tags::STRIP_BYTE_COUNTS, strip.len() as u32));
    entries.push(IfdEntry::short(tags::PLANAR_CONFIGURATION, 1));
    entries.push(IfdEntry::short(
        tags::SAMPLE_FORMAT,
        image.samples.sample_format(),
    ));
    entries.push(IfdEntry::doubles(tags::MODEL_PIXEL_SCALE, &pixel_scale));
    entries.push(IfdEntry::doubles(tags::MODEL_TIEPOINT, &tiepoint));
    entries.push(IfdEntry::shorts(
        tags::GEO_KEY_DIRECTORY,
        &geo_key_directory(image.epsg),
    ));
    if let Some(nodata) = image.nodata {
        entries.push(IfdEntry::ascii(tags::GDAL_NODATA, &format_nodata(nodata)));
    }
    debug_assert!(entries.windows(2).all(|w| w[0].tag < w[1].tag));

    // Layout: header, strip (padded to a word boundary), IFD, out-of-line
    // values. The IFD size is even, so out-of-line doubles stay aligned.
    let mut ifd_offset = STRIP_OFFSET as usize + strip.len();
    if ifd_offset % 2 == 1 {
        ifd_offset += 1;
    }
    let ifd_size = 2 + entries.len() * 12 + 4;
    let external_base = ifd_offset + ifd_size;

    let mut ifd = Vec::with_capacity(ifd_size);
    let mut external: Vec<u8> = Vec::new();
    ifd.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in &entries {
        ifd.extend_from_slice(&entry.tag.to_le_bytes());
        ifd.extend_from_slice(&entry.field_type.to_le_bytes());
        ifd.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut value = [0u8; 4];
            value[..entry.data.len()].copy_from_slice(&entry.data);
            ifd.extend_from_slice(&value);
        } else {
            let offset = (external_base + external.len()) as u32;
            ifd.extend_from_slice(&offset.to_le_bytes());
            external.extend_from_slice(&entry.data);
            if external.len() % 2 == 1 {
                external.push(0);
            }
        }
    }
    // Offset of the next IFD: none
    ifd.extend_from_slice(&0u32.to_le_bytes());

    let mut out = Vec::with_capacity(external_base + external.len());
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&(ifd_offset as u32).to_le_bytes());
    out.extend_from_slice(&strip);
    while out.len() < ifd_offset {
        out.push(0);
    }
    out.extend_from_slice(&ifd);
    out.extend_from_slice(&external);

    debug!(
        width = image.width,
        height = image.height,
        bytes = out.len(),
        epsg = image.epsg,
        "encoded GeoTIFF"
    );
    Ok(out)
}

/// One IFD entry with its raw little-endian value bytes.
struct IfdEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

impl IfdEntry {
    fn short(tag: u16, value: u16) -> Self {
        Self::shorts(tag, &[value])
    }

    fn shorts(tag: u16, values: &[u16]) -> Self {
        Self {
            tag,
            field_type: tags::TYPE_SHORT,
            count: values.len() as u32,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            field_type: tags::TYPE_LONG,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    fn doubles(tag: u16, values: &[f64]) -> Self {
        Self {
            tag,
            field_type: tags::TYPE_DOUBLE,
            count: values.len() as u32,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn ascii(tag: u16, value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            field_type: tags::TYPE_ASCII,
            count: data.len() as u32,
            data,
        }
    }
}

/// GeoKey directory declaring a geographic CRS by EPSG code.
fn geo_key_directory(epsg: u16) -> [u16; 16] {
    [
        // Version 1.1, revision 0, three keys follow
        1,
        1,
        0,
        3,
        tags::KEY_GT_MODEL_TYPE,
        0,
        1,
        tags::MODEL_TYPE_GEOGRAPHIC,
        tags::KEY_GT_RASTER_TYPE,
        0,
        1,
        tags::RASTER_PIXEL_IS_AREA,
        tags::KEY_GEOGRAPHIC_TYPE,
        0,
        1,
        epsg,
    ]
}

/// Render a nodata value the way GDAL writes it ("nan" for NaN, shortest
/// decimal form otherwise).
fn format_nodata(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        value.to_string()
    }
}

/// Compress a strip with zlib DEFLATE.
fn deflate_strip(raw: &[u8]) -> GeoTiffResult<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_pixel(value: f32) -> GeoTiffImage {
        GeoTiffImage {
            width: 1,
            height: 1,
            samples: SampleData::Float32(vec![value]),
            transform: GeoTransform::new(360.0, 0.0, -180.0, 0.0, -180.0, 90.0),
            epsg: 4326,
            nodata: Some(f64::NAN),
            compression: Compression::None,
        }
    }

    #[test]
    fn test_header_and_strip_placement() {
        let bytes = encode(&one_pixel(42.5)).unwrap();

        // Little-endian classic TIFF header
        assert_eq!(&bytes[0..2], b"II");
        assert_eq!(u16::from_le_bytes([bytes[2], bytes[3]]), 42);

        // Strip sits right after the header; 42.5f32 little-endian
        assert_eq!(&bytes[8..12], &42.5f32.to_le_bytes());

        // IFD follows the 4-byte strip
        let ifd_offset = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(ifd_offset, 12);

        // 15 entries: all the baseline + geo tags plus GDAL_NODATA
        let count = u16::from_le_bytes([bytes[12], bytes[13]]);
        assert_eq!(count, 15);
    }

    #[test]
    fn test_tags_ascending() {
        let bytes = encode(&one_pixel(0.0)).unwrap();
        let ifd_offset = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let count = u16::from_le_bytes([bytes[ifd_offset], bytes[ifd_offset + 1]]) as usize;

        let mut prev = 0u16;
        for i in 0..count {
            let at = ifd_offset + 2 + i * 12;
            let tag = u16::from_le_bytes([bytes[at], bytes[at + 1]]);
            assert!(tag > prev, "tag {} out of order", tag);
            prev = tag;
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut image = one_pixel(1.0);
        image.width = 2;
        assert!(matches!(
            encode(&image),
            Err(GeoTiffError::ShapeMismatch { samples: 1, width: 2, height: 1 })
        ));
    }

    #[test]
    fn test_empty_raster_rejected() {
        let mut image = one_pixel(1.0);
        image.height = 0;
        image.samples = SampleData::Float32(vec![]);
        assert!(matches!(encode(&image), Err(GeoTiffError::Unsupported(_))));
    }

    #[test]
    fn test_nodata_formatting() {
        assert_eq!(format_nodata(f64::NAN), "nan");
        assert_eq!(format_nodata(-32768.0), "-32768");
        assert_eq!(format_nodata(0.5), "0.5");
    }

    #[test]
    fn test_deterministic_output() {
        let a = encode(&one_pixel(7.25)).unwrap();
        let b = encode(&one_pixel(7.25)).unwrap();
        assert_eq!(a, b);
    }
}
