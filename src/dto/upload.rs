use serde::Serialize;
use utoipa::ToSchema;

use crate::imaging::CropRegion;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CropUploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub data_url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub suggested_crop: Option<CropRegion>,
}

/// Multipart body of `POST /api/upload`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Multipart body of `POST /api/upload/crop`. Without an explicit rectangle
/// the centered rectangle for `aspect` and `zoom` is used.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CropForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect: Option<f64>,
    pub zoom: Option<f64>,
}
