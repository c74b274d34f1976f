//! Typed sample buffers and their on-disk TIFF representation.

use crate::error::{GeoTiffError, GeoTiffResult};
use crate::tags;

/// Byte order of a TIFF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// A single band of raster samples in row-major order.
///
/// One variant per supported on-disk encoding; the variant fixes both the
/// `SampleFormat` and `BitsPerSample` tags.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl SampleData {
    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        match self {
            SampleData::UInt8(v) => v.len(),
            SampleData::Int16(v) => v.len(),
            SampleData::UInt16(v) => v.len(),
            SampleData::Int32(v) => v.len(),
            SampleData::UInt32(v) => v.len(),
            SampleData::Float32(v) => v.len(),
            SampleData::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for the `BitsPerSample` tag.
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            SampleData::UInt8(_) => 8,
            SampleData::Int16(_) | SampleData::UInt16(_) => 16,
            SampleData::Int32(_) | SampleData::UInt32(_) | SampleData::Float32(_) => 32,
            SampleData::Float64(_) => 64,
        }
    }

    /// Value for the `SampleFormat` tag.
    pub fn sample_format(&self) -> u16 {
        match self {
            SampleData::UInt8(_) | SampleData::UInt16(_) | SampleData::UInt32(_) => {
                tags::SAMPLE_FORMAT_UINT
            }
            SampleData::Int16(_) | SampleData::Int32(_) => tags::SAMPLE_FORMAT_INT,
            SampleData::Float32(_) | SampleData::Float64(_) => tags::SAMPLE_FORMAT_IEEE_FP,
        }
    }

    /// Sample at `index` widened to f64, or None past the end.
    ///
    /// Lossless for every variant except `UInt32`/`Int32` values beyond
    /// 2^53, which cannot occur for the ranges this codec is used with.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match self {
            SampleData::UInt8(v) => v.get(index).map(|&s| s as f64),
            SampleData::Int16(v) => v.get(index).map(|&s| s as f64),
            SampleData::UInt16(v) => v.get(index).map(|&s| s as f64),
            SampleData::Int32(v) => v.get(index).map(|&s| s as f64),
            SampleData::UInt32(v) => v.get(index).map(|&s| s as f64),
            SampleData::Float32(v) => v.get(index).map(|&s| s as f64),
            SampleData::Float64(v) => v.get(index).copied(),
        }
    }

    /// Serialize the buffer as little-endian sample bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            SampleData::UInt8(v) => v.clone(),
            SampleData::Int16(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            SampleData::UInt16(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            SampleData::Int32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            SampleData::UInt32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            SampleData::Float32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            SampleData::Float64(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
        }
    }

    /// Rebuild a buffer from raw strip bytes given the declared format,
    /// bit width, and file byte order.
    pub fn from_bytes(
        sample_format: u16,
        bits_per_sample: u16,
        raw: &[u8],
        order: ByteOrder,
    ) -> GeoTiffResult<Self> {
        match (sample_format, bits_per_sample) {
            (tags::SAMPLE_FORMAT_UINT, 8) => Ok(SampleData::UInt8(raw.to_vec())),
            (tags::SAMPLE_FORMAT_INT, 16) => Ok(SampleData::Int16(decode_fixed(
                raw,
                order,
                i16::from_le_bytes,
                i16::from_be_bytes,
            )?)),
            (tags::SAMPLE_FORMAT_UINT, 16) => Ok(SampleData::UInt16(decode_fixed(
                raw,
                order,
                u16::from_le_bytes,
                u16::from_be_bytes,
            )?)),
            (tags::SAMPLE_FORMAT_INT, 32) => Ok(SampleData::Int32(decode_fixed(
                raw,
                order,
                i32::from_le_bytes,
                i32::from_be_bytes,
            )?)),
            (tags::SAMPLE_FORMAT_UINT, 32) => Ok(SampleData::UInt32(decode_fixed(
                raw,
                order,
                u32::from_le_bytes,
                u32::from_be_bytes,
            )?)),
            (tags::SAMPLE_FORMAT_IEEE_FP, 32) => Ok(SampleData::Float32(decode_fixed(
                raw,
                order,
                f32::from_le_bytes,
                f32::from_be_bytes,
            )?)),
            (tags::SAMPLE_FORMAT_IEEE_FP, 64) => Ok(SampleData::Float64(decode_fixed(
                raw,
                order,
                f64::from_le_bytes,
                f64::from_be_bytes,
            )?)),
            (format, bits) => Err(GeoTiffError::Unsupported(format!(
                "sample format {} with {} bits per sample",
                format, bits
            ))),
        }
    }
}

/// Decode raw bytes into fixed-width samples, honoring byte order.
fn decode_fixed<T, const N: usize>(
    raw: &[u8],
    order: ByteOrder,
    from_le: fn([u8; N]) -> T,
    from_be: fn([u8; N]) -> T,
) -> GeoTiffResult<Vec<T>> {
    if raw.len() % N != 0 {
        return Err(GeoTiffError::Truncated(format!(
            "strip length {} is not a multiple of the {}-byte sample size",
            raw.len(),
            N
        )));
    }
    let convert = match order {
        ByteOrder::Little => from_le,
        ByteOrder::Big => from_be,
    };
    Ok(raw
        .chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(chunk);
            convert(bytes)
        })
        .collect())
}
