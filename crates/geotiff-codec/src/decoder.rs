//! GeoTIFF decoding.
//!
//! Reads back the subset of TIFF this crate writes: classic TIFF in either
//! byte order, first IFD only, one band, stripped layout, uncompressed or
//! DEFLATE strips. Used chiefly to verify fixture files after writing.

use std::io::Read;

use bytes::Bytes;
use tracing::debug;

use crate::encoder::{Compression, GeoTiffImage};
use crate::error::{GeoTiffError, GeoTiffResult};
use crate::samples::{ByteOrder, SampleData};
use crate::tags;
use crate::transform::GeoTransform;

/// TileWidth: presence means a tiled layout, which this codec rejects.
const TILE_WIDTH: u16 = 322;

/// Decode a GeoTIFF from raw bytes.
pub fn decode(data: Bytes) -> GeoTiffResult<GeoTiffImage> {
    Reader::new(data)?.read_image()
}

/// One parsed IFD entry; `value_offset` addresses the 4-byte value field
/// inside the file, not the value itself.
struct RawEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    value_offset: usize,
}

struct Reader {
    data: Bytes,
    order: ByteOrder,
    entries: Vec<RawEntry>,
}

impl Reader {
    fn new(data: Bytes) -> GeoTiffResult<Self> {
        let order = match data.get(0..2) {
            Some(b"II") => ByteOrder::Little,
            Some(b"MM") => ByteOrder::Big,
            _ => return Err(GeoTiffError::BadMagic),
        };
        let mut reader = Self {
            data,
            order,
            entries: Vec::new(),
        };

        match reader.u16_at(2)? {
            42 => {}
            43 => return Err(GeoTiffError::Unsupported("BigTIFF".to_string())),
            _ => return Err(GeoTiffError::BadMagic),
        }

        let ifd_offset = reader.u32_at(4)? as usize;
        let count = reader.u16_at(ifd_offset)? as usize;
        for i in 0..count {
            let at = ifd_offset + 2 + i * 12;
            let entry = RawEntry {
                tag: reader.u16_at(at)?,
                field_type: reader.u16_at(at + 2)?,
                count: reader.u32_at(at + 4)?,
                value_offset: at + 8,
            };
            reader.entries.push(entry);
        }
        Ok(reader)
    }

    fn u16_at(&self, offset: usize) -> GeoTiffResult<u16> {
        let bytes = self
            .data
            .get(offset..offset + 2)
            .ok_or_else(|| GeoTiffError::Truncated(format!("u16 at offset {}", offset)))?;
        Ok(match self.order {
            ByteOrder::Little => u16::from_le_bytes([bytes[0], bytes[1]]),
            ByteOrder::Big => u16::from_be_bytes([bytes[0], bytes[1]]),
        })
    }

    fn u32_at(&self, offset: usize) -> GeoTiffResult<u32> {
        let bytes = self
            .data
            .get(offset..offset + 4)
            .ok_or_else(|| GeoTiffError::Truncated(format!("u32 at offset {}", offset)))?;
        let bytes = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }

    fn find(&self, tag: u16) -> Option<&RawEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Raw value bytes for an entry, following the offset indirection for
    /// values wider than the 4-byte value field.
    fn value_bytes(&self, entry: &RawEntry) -> GeoTiffResult<&[u8]> {
        let elem = tags::field_type_size(entry.field_type).ok_or_else(|| {
            GeoTiffError::Unsupported(format!("TIFF field type {}", entry.field_type))
        })?;
        let len = elem * entry.count as usize;
        let start = if len <= 4 {
            entry.value_offset
        } else {
            self.u32_at(entry.value_offset)? as usize
        };
        self.data
            .get(start..start + len)
            .ok_or_else(|| GeoTiffError::Truncated(format!("value of tag {}", entry.tag)))
    }

    /// SHORT or LONG values widened to u32.
    fn get_u32s(&self, tag: u16) -> GeoTiffResult<Option<Vec<u32>>> {
        let entry = match self.find(tag) {
            Some(e) => e,
            None => return Ok(None),
        };
        let bytes = self.value_bytes(entry)?;
        let values = match entry.field_type {
            tags::TYPE_SHORT => bytes
                .chunks_exact(2)
                .map(|c| read_u16(self.order, c) as u32)
                .collect(),
            tags::TYPE_LONG => bytes
                .chunks_exact(4)
                .map(|c| read_u32(self.order, c))
                .collect(),
            other => {
                return Err(GeoTiffError::Unsupported(format!(
                    "tag {} stored as field type {}",
                    tag, other
                )))
            }
        };
        Ok(Some(values))
    }

    fn get_u16s(&self, tag: u16) -> GeoTiffResult<Option<Vec<u16>>> {
        let entry = match self.find(tag) {
            Some(e) => e,
            None => return Ok(None),
        };
        if entry.field_type != tags::TYPE_SHORT {
            return Err(GeoTiffError::Unsupported(format!(
                "tag {} stored as field type {}",
                tag, entry.field_type
            )));
        }
        let bytes = self.value_bytes(entry)?;
        Ok(Some(
            bytes
                .chunks_exact(2)
                .map(|c| read_u16(self.order, c))
                .collect(),
        ))
    }

    fn get_f64s(&self, tag: u16) -> GeoTiffResult<Option<Vec<f64>>> {
        let entry = match self.find(tag) {
            Some(e) => e,
            None => return Ok(None),
        };
        if entry.field_type != tags::TYPE_DOUBLE {
            return Err(GeoTiffError::Unsupported(format!(
                "tag {} stored as field type {}",
                tag, entry.field_type
            )));
        }
        let bytes = self.value_bytes(entry)?;
        Ok(Some(
            bytes
                .chunks_exact(8)
                .map(|c| read_f64(self.order, c))
                .collect(),
        ))
    }

    fn get_ascii(&self, tag: u16) -> GeoTiffResult<Option<String>> {
        let entry = match self.find(tag) {
            Some(e) => e,
            None => return Ok(None),
        };
        let bytes = self.value_bytes(entry)?;
        let text = String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .trim()
            .to_string();
        Ok(Some(text))
    }

    fn scalar(&self, tag: u16, name: &'static str) -> GeoTiffResult<u32> {
        self.get_u32s(tag)?
            .and_then(|v| v.first().copied())
            .ok_or(GeoTiffError::MissingTag(name))
    }

    fn read_image(self) -> GeoTiffResult<GeoTiffImage> {
        if self.find(TILE_WIDTH).is_some() {
            return Err(GeoTiffError::Unsupported("tiled layout".to_string()));
        }

        let width = self.scalar(tags::IMAGE_WIDTH, "ImageWidth")?;
        let height = self.scalar(tags::IMAGE_LENGTH, "ImageLength")?;

        if let Some(spp) = self.get_u32s(tags::SAMPLES_PER_PIXEL)? {
            if spp.first() != Some(&1) {
                return Err(GeoTiffError::Unsupported("more than one band".to_string()));
            }
        }
        if let Some(planar) = self.get_u32s(tags::PLANAR_CONFIGURATION)? {
            if planar.first() != Some(&1) {
                return Err(GeoTiffError::Unsupported(
                    "planar configuration".to_string(),
                ));
            }
        }

        let bits = self.get_u32s(tags::BITS_PER_SAMPLE)?;
        let bits = match bits.as_deref() {
            Some([b, rest @ ..]) if rest.iter().all(|r| r == b) => *b as u16,
            Some([]) | None => return Err(GeoTiffError::MissingTag("BitsPerSample")),
            Some(_) => {
                return Err(GeoTiffError::Unsupported(
                    "mixed bits per sample".to_string(),
                ))
            }
        };
        let sample_format = self
            .get_u32s(tags::SAMPLE_FORMAT)?
            .and_then(|v| v.first().copied())
            .unwrap_or(tags::SAMPLE_FORMAT_UINT as u32) as u16;

        let compression = match self
            .get_u32s(tags::COMPRESSION)?
            .and_then(|v| v.first().copied())
            .unwrap_or(tags::COMPRESSION_NONE as u32) as u16
        {
            tags::COMPRESSION_NONE => Compression::None,
            tags::COMPRESSION_DEFLATE | tags::COMPRESSION_DEFLATE_LEGACY => Compression::Deflate,
            other => {
                return Err(GeoTiffError::Unsupported(format!(
                    "compression scheme {}",
                    other
                )))
            }
        };

        let offsets = self
            .get_u32s(tags::STRIP_OFFSETS)?
            .ok_or(GeoTiffError::MissingTag("StripOffsets"))?;
        let counts = self
            .get_u32s(tags::STRIP_BYTE_COUNTS)?
            .ok_or(GeoTiffError::MissingTag("StripByteCounts"))?;
        if offsets.len() != counts.len() {
            return Err(GeoTiffError::Truncated(
                "strip offset/count mismatch".to_string(),
            ));
        }

        let mut raw = Vec::new();
        for (&offset, &count) in offsets.iter().zip(counts.iter()) {
            let strip = self
                .data
                .get(offset as usize..offset as usize + count as usize)
                .ok_or_else(|| GeoTiffError::Truncated(format!("strip at offset {}", offset)))?;
            match compression {
                Compression::None => raw.extend_from_slice(strip),
                Compression::Deflate => {
                    flate2::read::ZlibDecoder::new(strip).read_to_end(&mut raw)?;
                }
            }
        }

        let samples = SampleData::from_bytes(sample_format, bits, &raw, self.order)?;
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(GeoTiffError::ShapeMismatch {
                samples: samples.len(),
                width,
                height,
            });
        }

        let scale = self
            .get_f64s(tags::MODEL_PIXEL_SCALE)?
            .ok_or(GeoTiffError::MissingTag("ModelPixelScaleTag"))?;
        let tiepoint = self
            .get_f64s(tags::MODEL_TIEPOINT)?
            .ok_or(GeoTiffError::MissingTag("ModelTiepointTag"))?;
        let transform = GeoTransform::from_scale_and_tiepoint(&scale, &tiepoint)?;

        let keys = self
            .get_u16s(tags::GEO_KEY_DIRECTORY)?
            .ok_or(GeoTiffError::MissingTag("GeoKeyDirectoryTag"))?;
        let epsg = crs_from_geo_keys(&keys)?;

        let nodata = match self.get_ascii(tags::GDAL_NODATA)? {
            Some(text) => Some(parse_nodata(&text)?),
            None => None,
        };

        debug!(width, height, epsg, "decoded GeoTIFF");
        Ok(GeoTiffImage {
            width,
            height,
            samples,
            transform,
            epsg,
            nodata,
            compression,
        })
    }
}

fn read_u16(order: ByteOrder, bytes: &[u8]) -> u16 {
    let b = [bytes[0], bytes[1]];
    match order {
        ByteOrder::Little => u16::from_le_bytes(b),
        ByteOrder::Big => u16::from_be_bytes(b),
    }
}

fn read_u32(order: ByteOrder, bytes: &[u8]) -> u32 {
    let b = [bytes[0], bytes[1], bytes[2], bytes[3]];
    match order {
        ByteOrder::Little => u32::from_le_bytes(b),
        ByteOrder::Big => u32::from_be_bytes(b),
    }
}

fn read_f64(order: ByteOrder, bytes: &[u8]) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(bytes);
    match order {
        ByteOrder::Little => f64::from_le_bytes(b),
        ByteOrder::Big => f64::from_be_bytes(b),
    }
}

/// Pull the EPSG code out of a GeoKey directory.
///
/// Keys are quadruples of (id, location, count, value) after a four-short
/// header; a zero location means the value is stored inline.
fn crs_from_geo_keys(keys: &[u16]) -> GeoTiffResult<u16> {
    if keys.len() < 4 {
        return Err(GeoTiffError::Truncated("GeoKeyDirectoryTag".to_string()));
    }
    for quad in keys[4..].chunks_exact(4) {
        let (id, location, value) = (quad[0], quad[1], quad[3]);
        if location == 0 && (id == tags::KEY_GEOGRAPHIC_TYPE || id == tags::KEY_PROJECTED_CS_TYPE)
        {
            return Ok(value);
        }
    }
    Err(GeoTiffError::MissingTag("GeographicTypeGeoKey"))
}

/// Parse a GDAL_NODATA string; GDAL writes "nan" for NaN sentinels.
fn parse_nodata(text: &str) -> GeoTiffResult<f64> {
    if text.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    text.parse::<f64>()
        .map_err(|_| GeoTiffError::Unsupported(format!("GDAL_NODATA value {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_magic() {
        assert!(matches!(
            decode(Bytes::from_static(b"PK\x03\x04....")),
            Err(GeoTiffError::BadMagic)
        ));
        assert!(matches!(
            decode(Bytes::from_static(b"")),
            Err(GeoTiffError::BadMagic)
        ));
    }

    #[test]
    fn test_bigtiff_rejected() {
        // "II" + version 43 header
        let data = Bytes::from_static(&[0x49, 0x49, 0x2b, 0x00, 0x08, 0x00, 0x00, 0x00]);
        assert!(matches!(decode(data), Err(GeoTiffError::Unsupported(_))));
    }

    #[test]
    fn test_truncated_ifd() {
        // Valid header pointing at an IFD past the end of the buffer
        let data = Bytes::from_static(&[0x49, 0x49, 0x2a, 0x00, 0xff, 0x00, 0x00, 0x00]);
        assert!(matches!(decode(data), Err(GeoTiffError::Truncated(_))));
    }

    #[test]
    fn test_geo_key_lookup() {
        let keys = [1, 1, 0, 2, 1024, 0, 1, 2, 2048, 0, 1, 4326];
        assert_eq!(crs_from_geo_keys(&keys).unwrap(), 4326);

        let projected = [1, 1, 0, 1, 3072, 0, 1, 3857];
        assert_eq!(crs_from_geo_keys(&projected).unwrap(), 3857);

        let none = [1, 1, 0, 1, 1025, 0, 1, 1];
        assert!(crs_from_geo_keys(&none).is_err());
    }

    #[test]
    fn test_parse_nodata() {
        assert!(parse_nodata("nan").unwrap().is_nan());
        assert!(parse_nodata("NaN").unwrap().is_nan());
        assert_eq!(parse_nodata("-32768").unwrap(), -32768.0);
        assert!(parse_nodata("not-a-number").is_err());
    }
}
