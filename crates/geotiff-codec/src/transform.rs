//! Affine geotransforms and their GeoTIFF encoding.

use serde::{Deserialize, Serialize};

use crate::error::{GeoTiffError, GeoTiffResult};

/// Six-coefficient affine mapping from pixel/line indices to CRS
/// coordinates.
///
/// Coefficient order follows the usual (GDAL/rasterio) convention:
/// `x = origin_x + col * pixel_width + row * row_rotation` and
/// `y = origin_y + col * column_rotation + row * pixel_height`. North-up
/// rasters have zero rotation terms and a negative `pixel_height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// Pixel width in CRS units
    pub pixel_width: f64,
    /// Row rotation (usually 0)
    pub row_rotation: f64,
    /// X coordinate of the top-left corner of pixel (0, 0)
    pub origin_x: f64,
    /// Column rotation (usually 0)
    pub column_rotation: f64,
    /// Pixel height in CRS units (negative for north-up)
    pub pixel_height: f64,
    /// Y coordinate of the top-left corner of pixel (0, 0)
    pub origin_y: f64,
}

impl GeoTransform {
    /// Create a transform from the six coefficients in
    /// `(pixel_width, row_rotation, origin_x, column_rotation,
    /// pixel_height, origin_y)` order.
    pub const fn new(
        pixel_width: f64,
        row_rotation: f64,
        origin_x: f64,
        column_rotation: f64,
        pixel_height: f64,
        origin_y: f64,
    ) -> Self {
        Self {
            pixel_width,
            row_rotation,
            origin_x,
            column_rotation,
            pixel_height,
            origin_y,
        }
    }

    /// Check that this is a north-up, unrotated transform.
    ///
    /// Only such transforms can be stored as a GeoTIFF pixel scale and
    /// tiepoint pair; anything else would need `ModelTransformationTag`.
    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.column_rotation == 0.0 && self.pixel_height < 0.0
    }

    /// The `ModelPixelScaleTag` triple `(sx, sy, sz)` for this transform.
    pub fn to_pixel_scale(&self) -> GeoTiffResult<[f64; 3]> {
        if !self.is_north_up() {
            return Err(GeoTiffError::UnencodableTransform);
        }
        Ok([self.pixel_width, -self.pixel_height, 0.0])
    }

    /// The `ModelTiepointTag` sextuple anchoring raster (0, 0) at the
    /// transform origin.
    pub fn to_tiepoint(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.origin_x, self.origin_y, 0.0]
    }

    /// Rebuild a transform from decoded pixel scale and tiepoint values.
    ///
    /// The tiepoint may anchor any raster position, not just (0, 0).
    pub fn from_scale_and_tiepoint(scale: &[f64], tiepoint: &[f64]) -> GeoTiffResult<Self> {
        if scale.len() < 2 {
            return Err(GeoTiffError::Truncated("ModelPixelScaleTag".to_string()));
        }
        if tiepoint.len() < 5 {
            return Err(GeoTiffError::Truncated("ModelTiepointTag".to_string()));
        }
        let (sx, sy) = (scale[0], scale[1]);
        let (raster_i, raster_j) = (tiepoint[0], tiepoint[1]);
        let (model_x, model_y) = (tiepoint[3], tiepoint[4]);
        Ok(Self {
            pixel_width: sx,
            row_rotation: 0.0,
            origin_x: model_x - raster_i * sx,
            column_rotation: 0.0,
            pixel_height: -sy,
            origin_y: model_y + raster_j * sy,
        })
    }

    /// The six coefficients as a tuple, in construction order.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.pixel_width,
            self.row_rotation,
            self.origin_x,
            self.column_rotation,
            self.pixel_height,
            self.origin_y,
        )
    }

    /// Extent `(min_x, min_y, max_x, max_y)` of a north-up raster with the
    /// given shape.
    pub fn extent(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let max_x = self.origin_x + width as f64 * self.pixel_width;
        let min_y = self.origin_y + height as f64 * self.pixel_height;
        (self.origin_x, min_y, max_x, self.origin_y)
    }
}
