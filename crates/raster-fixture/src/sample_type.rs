//! Sample type selection and value conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FixtureError, FixtureResult};
use geotiff_codec::SampleData;

/// On-disk sample encodings supported for fixture rasters.
///
/// This is the closed set behind the CLI's `--dtype` flag; unknown names
/// are a parse error rather than a passthrough string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleType {
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    #[default]
    Float32,
    Float64,
}

impl SampleType {
    /// Every supported type, in declaration order.
    pub const ALL: [SampleType; 7] = [
        SampleType::UInt8,
        SampleType::Int16,
        SampleType::UInt16,
        SampleType::Int32,
        SampleType::UInt32,
        SampleType::Float32,
        SampleType::Float64,
    ];

    /// Parse a dtype name as used by the CLI (`"float32"`, `"int16"`, ...).
    pub fn from_dtype_string(s: &str) -> Result<Self, ParseSampleTypeError> {
        match s.to_lowercase().as_str() {
            "uint8" => Ok(SampleType::UInt8),
            "int16" => Ok(SampleType::Int16),
            "uint16" => Ok(SampleType::UInt16),
            "int32" => Ok(SampleType::Int32),
            "uint32" => Ok(SampleType::UInt32),
            "float32" => Ok(SampleType::Float32),
            "float64" => Ok(SampleType::Float64),
            _ => Err(ParseSampleTypeError::UnsupportedDtype(s.to_string())),
        }
    }

    /// Check if this is a floating-point encoding.
    pub fn is_floating(&self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    /// The nodata sentinel recorded for rasters of this type.
    ///
    /// Floating types use NaN. Integer types have no NaN, so the sentinel
    /// reserves a range extreme instead: the minimum for signed types and
    /// the maximum for unsigned types.
    pub fn nodata(&self) -> f64 {
        match self {
            SampleType::UInt8 => u8::MAX as f64,
            SampleType::Int16 => i16::MIN as f64,
            SampleType::UInt16 => u16::MAX as f64,
            SampleType::Int32 => i32::MIN as f64,
            SampleType::UInt32 => u32::MAX as f64,
            SampleType::Float32 | SampleType::Float64 => f64::NAN,
        }
    }

    /// Convert a scalar into a one-sample buffer of this type.
    ///
    /// Floating targets accept any value (including NaN); `Float32`
    /// narrows. Integer targets require a finite, integral, in-range
    /// value and fail with `TypeMismatch` otherwise.
    pub fn encode_scalar(&self, value: f64) -> FixtureResult<SampleData> {
        match self {
            SampleType::Float32 => Ok(SampleData::Float32(vec![value as f32])),
            SampleType::Float64 => Ok(SampleData::Float64(vec![value])),
            SampleType::UInt8 => {
                self.check_integral(value, u8::MIN as f64, u8::MAX as f64)?;
                Ok(SampleData::UInt8(vec![value as u8]))
            }
            SampleType::Int16 => {
                self.check_integral(value, i16::MIN as f64, i16::MAX as f64)?;
                Ok(SampleData::Int16(vec![value as i16]))
            }
            SampleType::UInt16 => {
                self.check_integral(value, u16::MIN as f64, u16::MAX as f64)?;
                Ok(SampleData::UInt16(vec![value as u16]))
            }
            SampleType::Int32 => {
                self.check_integral(value, i32::MIN as f64, i32::MAX as f64)?;
                Ok(SampleData::Int32(vec![value as i32]))
            }
            SampleType::UInt32 => {
                self.check_integral(value, u32::MIN as f64, u32::MAX as f64)?;
                Ok(SampleData::UInt32(vec![value as u32]))
            }
        }
    }

    fn check_integral(&self, value: f64, min: f64, max: f64) -> FixtureResult<()> {
        let reason = if !value.is_finite() {
            "not a finite number"
        } else if value.fract() != 0.0 {
            "not an integral value"
        } else if value < min || value > max {
            return Err(FixtureError::TypeMismatch {
                value,
                sample_type: *self,
                reason: format!("outside the {}..={} range", min, max),
            });
        } else {
            return Ok(());
        };
        Err(FixtureError::TypeMismatch {
            value,
            sample_type: *self,
            reason: reason.to_string(),
        })
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::UInt8 => "uint8",
            SampleType::Int16 => "int16",
            SampleType::UInt16 => "uint16",
            SampleType::Int32 => "int32",
            SampleType::UInt32 => "uint32",
            SampleType::Float32 => "float32",
            SampleType::Float64 => "float64",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SampleType {
    type Err = ParseSampleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dtype_string(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseSampleTypeError {
    #[error("unsupported dtype: {0} (expected one of uint8, int16, uint16, int32, uint32, float32, float64)")]
    UnsupportedDtype(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dtype() {
        assert_eq!(
            SampleType::from_dtype_string("float32").unwrap(),
            SampleType::Float32
        );
        assert_eq!(
            SampleType::from_dtype_string("Int16").unwrap(),
            SampleType::Int16
        );
        assert_eq!("uint8".parse::<SampleType>().unwrap(), SampleType::UInt8);
        assert!(SampleType::from_dtype_string("complex64").is_err());
    }

    #[test]
    fn test_display_roundtrips_with_parse() {
        for ty in SampleType::ALL {
            assert_eq!(ty.to_string().parse::<SampleType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_default_is_float32() {
        assert_eq!(SampleType::default(), SampleType::Float32);
    }

    #[test]
    fn test_nodata_policy() {
        assert!(SampleType::Float32.nodata().is_nan());
        assert!(SampleType::Float64.nodata().is_nan());
        assert_eq!(SampleType::Int16.nodata(), -32768.0);
        assert_eq!(SampleType::Int32.nodata(), i32::MIN as f64);
        assert_eq!(SampleType::UInt8.nodata(), 255.0);
        assert_eq!(SampleType::UInt16.nodata(), 65535.0);
        assert_eq!(SampleType::UInt32.nodata(), u32::MAX as f64);
    }

    #[test]
    fn test_encode_scalar_floats() {
        assert_eq!(
            SampleType::Float32.encode_scalar(42.5).unwrap(),
            SampleData::Float32(vec![42.5])
        );
        assert_eq!(
            SampleType::Float64.encode_scalar(-1e-12).unwrap(),
            SampleData::Float64(vec![-1e-12])
        );
        // NaN is a legal floating sample
        match SampleType::Float32.encode_scalar(f64::NAN).unwrap() {
            SampleData::Float32(v) => assert!(v[0].is_nan()),
            other => panic!("unexpected buffer: {:?}", other),
        }
    }

    #[test]
    fn test_encode_scalar_integers() {
        assert_eq!(
            SampleType::Int16.encode_scalar(-7.0).unwrap(),
            SampleData::Int16(vec![-7])
        );
        assert_eq!(
            SampleType::UInt32.encode_scalar(4294967295.0).unwrap(),
            SampleData::UInt32(vec![u32::MAX])
        );
    }

    #[test]
    fn test_integer_rejections() {
        // Fractional
        assert!(matches!(
            SampleType::Int16.encode_scalar(1.5),
            Err(FixtureError::TypeMismatch { .. })
        ));
        // Out of range
        assert!(matches!(
            SampleType::Int16.encode_scalar(70000.0),
            Err(FixtureError::TypeMismatch { .. })
        ));
        assert!(matches!(
            SampleType::UInt8.encode_scalar(-1.0),
            Err(FixtureError::TypeMismatch { .. })
        ));
        // Non-finite
        assert!(matches!(
            SampleType::Int32.encode_scalar(f64::NAN),
            Err(FixtureError::TypeMismatch { .. })
        ));
        assert!(matches!(
            SampleType::UInt16.encode_scalar(f64::INFINITY),
            Err(FixtureError::TypeMismatch { .. })
        ));
    }
}
