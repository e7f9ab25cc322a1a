//! Crop support for product photos.
//!
//! The admin editor picks a rectangle in the source image's natural pixel
//! space; [`crop`] renders exactly that rectangle, 1:1, into a new JPEG.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageError, Rgb, RgbImage, codecs::jpeg::JpegEncoder, imageops};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::AppError;

/// Product photos are framed 4:3 unless the caller asks otherwise.
pub const DEFAULT_ASPECT_RATIO: f64 = 4.0 / 3.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Upper bound on either side of a crop, keeps the canvas allocation sane.
pub const MAX_CROP_DIMENSION: u32 = 8192;
/// Largest distance of the crop origin from the source origin, either sign.
pub const MAX_CROP_OFFSET: i64 = 4 * MAX_CROP_DIMENSION as i64;
pub const CROPPED_MIME: &str = "image/jpeg";
pub const CROPPED_FILENAME: &str = "cropped-image.jpg";
const JPEG_QUALITY: u8 = 100;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("Crop area must be at least 1x1 pixels")]
    EmptyRegion,

    #[error("Crop area exceeds {MAX_CROP_DIMENSION} pixels per side")]
    RegionTooLarge,

    #[error("Crop origin must lie within {MAX_CROP_OFFSET} pixels of the image")]
    OffsetOutOfRange,

    #[error("Invalid image: {0}")]
    Decode(#[source] ImageError),

    #[error("Failed to encode cropped image")]
    Encode(#[source] ImageError),
}

impl From<ImagingError> for AppError {
    fn from(err: ImagingError) -> Self {
        match err {
            ImagingError::Encode(source) => AppError::Internal(anyhow::Error::new(source)),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// A rectangle in the source image's natural pixel space. The origin may be
/// negative and the rectangle may run past the source edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CropRegion {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Starting rectangle of the interactive cropper: the largest centered
    /// rectangle of `aspect` that fits the source, shrunk by `zoom`.
    pub fn centered(natural_width: u32, natural_height: u32, aspect: f64, zoom: f64) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            DEFAULT_ASPECT_RATIO
        };
        let zoom = clamp_zoom(zoom);
        let (w, h) = (f64::from(natural_width), f64::from(natural_height));

        let (fit_w, fit_h) = if w / h > aspect {
            (h * aspect, h)
        } else {
            (w, w / aspect)
        };
        let width = (fit_w / zoom).round().max(1.0);
        let height = (fit_h / zoom).round().max(1.0);

        Self {
            x: ((w - width) / 2.0).round() as i64,
            y: ((h - height) / 2.0).round() as i64,
            width: width as u32,
            height: height as u32,
        }
    }

    pub fn validate(&self) -> Result<(), ImagingError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImagingError::EmptyRegion);
        }
        if self.width > MAX_CROP_DIMENSION || self.height > MAX_CROP_DIMENSION {
            return Err(ImagingError::RegionTooLarge);
        }
        if self.x.unsigned_abs() > MAX_CROP_OFFSET as u64
            || self.y.unsigned_abs() > MAX_CROP_OFFSET as u64
        {
            return Err(ImagingError::OffsetOutOfRange);
        }
        Ok(())
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[derive(Debug, Clone)]
pub struct CroppedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Renders `region` of the encoded `source` into a JPEG of exactly
/// `region.width x region.height`. Pixels outside the source are black.
pub fn crop(source: &[u8], region: CropRegion) -> Result<CroppedImage, ImagingError> {
    region.validate()?;

    let source = image::load_from_memory(source)
        .map_err(ImagingError::Decode)?
        .to_rgb8();

    let mut canvas = RgbImage::from_pixel(region.width, region.height, Rgb([0, 0, 0]));
    imageops::overlay(&mut canvas, &source, -region.x, -region.y);

    let mut bytes = Vec::new();
    {
        let mut cursor = Cursor::new(&mut bytes);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        canvas
            .write_with_encoder(encoder)
            .map_err(ImagingError::Encode)?;
    }

    Ok(CroppedImage {
        bytes,
        width: region.width,
        height: region.height,
    })
}

/// In-memory preview of a picked file, as a `data:` URL.
pub fn to_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads the natural dimensions of an encoded image without cropping it.
pub fn dimensions(source: &[u8]) -> Result<(u32, u32), ImagingError> {
    image::ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|err| ImagingError::Decode(ImageError::IoError(err)))?
        .into_dimensions()
        .map_err(ImagingError::Decode)
}
