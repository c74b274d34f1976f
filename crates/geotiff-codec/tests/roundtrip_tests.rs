//! Encode-then-decode coverage for the GeoTIFF codec.
//!
//! These tests exercise the full byte path: IFD layout, out-of-line tag
//! values, strip compression, georeferencing tags, and nodata recovery.

use bytes::Bytes;
use geotiff_codec::{decode, encode, Compression, GeoTiffImage, GeoTransform, SampleData};

fn quarter_degree_grid(samples: SampleData, width: u32, height: u32) -> GeoTiffImage {
    GeoTiffImage {
        width,
        height,
        samples,
        transform: GeoTransform::new(0.25, 0.0, -130.0, 0.0, -0.25, 55.0),
        epsg: 4326,
        nodata: None,
        compression: Compression::None,
    }
}

#[test]
fn test_float32_grid_roundtrip() {
    let values: Vec<f32> = (0..12).map(|i| i as f32 * 1.5 - 4.0).collect();
    let image = quarter_degree_grid(SampleData::Float32(values.clone()), 4, 3);

    let decoded = decode(Bytes::from(encode(&image).unwrap())).unwrap();
    assert_eq!(decoded.width, 4);
    assert_eq!(decoded.height, 3);
    assert_eq!(decoded.epsg, 4326);
    assert_eq!(decoded.transform, image.transform);
    assert_eq!(decoded.samples, SampleData::Float32(values));
    assert_eq!(decoded.nodata, None);
}

#[test]
fn test_deflate_strip_roundtrip() {
    let values: Vec<i32> = (0..64).map(|i| (i % 7) - 3).collect();
    let mut image = quarter_degree_grid(SampleData::Int32(values.clone()), 8, 8);
    image.compression = Compression::Deflate;

    let bytes = encode(&image).unwrap();
    let decoded = decode(Bytes::from(bytes)).unwrap();
    assert_eq!(decoded.compression, Compression::Deflate);
    assert_eq!(decoded.samples, SampleData::Int32(values));
}

#[test]
fn test_deflate_actually_compresses() {
    // 1024 identical samples should shrink dramatically under zlib
    let values = vec![7.0f64; 1024];
    let plain = encode(&quarter_degree_grid(
        SampleData::Float64(values.clone()),
        32,
        32,
    ))
    .unwrap();

    let mut image = quarter_degree_grid(SampleData::Float64(values), 32, 32);
    image.compression = Compression::Deflate;
    let packed = encode(&image).unwrap();

    assert!(packed.len() < plain.len() / 4);
}

#[test]
fn test_nodata_survives_roundtrip() {
    let mut image = quarter_degree_grid(SampleData::Int16(vec![-7]), 1, 1);
    image.nodata = Some(i16::MIN as f64);

    let decoded = decode(Bytes::from(encode(&image).unwrap())).unwrap();
    assert_eq!(decoded.nodata, Some(-32768.0));
}

#[test]
fn test_nan_nodata_survives_roundtrip() {
    let mut image = quarter_degree_grid(SampleData::Float32(vec![1.0]), 1, 1);
    image.nodata = Some(f64::NAN);

    let decoded = decode(Bytes::from(encode(&image).unwrap())).unwrap();
    assert!(decoded.nodata.unwrap().is_nan());
}

#[test]
fn test_every_sample_encoding_roundtrips() {
    let buffers = vec![
        SampleData::UInt8(vec![0, 1, 254, 255]),
        SampleData::Int16(vec![i16::MIN, -1, 0, i16::MAX]),
        SampleData::UInt16(vec![0, 1, 2, u16::MAX]),
        SampleData::Int32(vec![i32::MIN, -1, 0, i32::MAX]),
        SampleData::UInt32(vec![0, 1, 2, u32::MAX]),
        SampleData::Float32(vec![-0.5, 0.0, 0.5, f32::MAX]),
        SampleData::Float64(vec![-0.5, 0.0, 0.5, f64::MAX]),
    ];
    for samples in buffers {
        let image = quarter_degree_grid(samples.clone(), 2, 2);
        let decoded = decode(Bytes::from(encode(&image).unwrap())).unwrap();
        assert_eq!(decoded.samples, samples);
    }
}

#[test]
fn test_decoding_garbage_fails_cleanly() {
    let garbage = Bytes::from(vec![0x42; 512]);
    assert!(decode(garbage).is_err());
}

#[test]
fn test_truncated_file_fails_cleanly() {
    let image = quarter_degree_grid(SampleData::Float32(vec![1.0, 2.0]), 2, 1);
    let mut bytes = encode(&image).unwrap();
    bytes.truncate(bytes.len() / 2);
    assert!(decode(Bytes::from(bytes)).is_err());
}
