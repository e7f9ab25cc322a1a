use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{Field, MultipartRejection},
    },
    routing::post,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    dto::upload::{CropForm, CropUploadResponse, PreviewResponse, UploadForm, UploadResponse},
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    services::upload_service::{self, CropParams},
    state::AppState,
    storage::IncomingFile,
};

/// Hard ceiling on a multipart body. Larger than the accepted file size so
/// oversized files reach validation and get a readable error.
pub const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_image))
        .route("/crop", post(crop_image))
        .route("/preview", post(preview_image))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT))
}

#[derive(Debug, Default)]
struct UploadParts {
    file: Option<IncomingFile>,
    crop: CropParams,
}

async fn read_file(field: Field<'_>) -> AppResult<IncomingFile> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?
        .to_vec();

    Ok(IncomingFile {
        file_name,
        content_type,
        bytes,
    })
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> AppResult<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid crop parameter: {}", name)))
}

/// Collects the `file` part and any crop fields. A request that is not
/// multipart at all is treated as carrying no file.
async fn read_parts(multipart: Result<Multipart, MultipartRejection>) -> AppResult<UploadParts> {
    let mut parts = UploadParts::default();
    let Ok(mut multipart) = multipart else {
        return Ok(parts);
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file = read_file(field).await?;
                // Browsers send an empty part when no file was picked.
                if file.file_name.as_deref().is_some_and(|n| !n.is_empty()) || !file.bytes.is_empty()
                {
                    parts.file = Some(file);
                }
            }
            "x" | "y" | "width" | "height" | "aspect" | "zoom" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;
                match name.as_str() {
                    "x" => parts.crop.x = parse_number(&name, &raw)?,
                    "y" => parts.crop.y = parse_number(&name, &raw)?,
                    "width" => parts.crop.width = parse_number(&name, &raw)?,
                    "height" => parts.crop.height = parse_number(&name, &raw)?,
                    "aspect" => parts.crop.aspect = parse_number(&name, &raw)?,
                    _ => parts.crop.zoom = parse_number(&name, &raw)?,
                }
            }
            other => tracing::debug!(field = other, "ignoring multipart field"),
        }
    }

    Ok(parts)
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image", body = UploadResponse),
        (status = 400, description = "No file, wrong type or too large"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Upload"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    session: AdminSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let parts = read_parts(multipart).await?;
    let resp = upload_service::upload(&state, &session, parts.file).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/upload/crop",
    request_body(content = CropForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cropped JPEG stored", body = CropUploadResponse),
        (status = 400, description = "Invalid file or crop region"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Upload"
)]
pub async fn crop_image(
    State(state): State<AppState>,
    session: AdminSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<CropUploadResponse>> {
    let parts = read_parts(multipart).await?;
    let resp = upload_service::crop_and_upload(&state, &session, parts.file, parts.crop).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/upload/preview",
    request_body(content = CropForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Data URL of the picked file", body = PreviewResponse),
        (status = 400, description = "No file"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Upload"
)]
pub async fn preview_image(
    _session: AdminSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<PreviewResponse>> {
    let parts = read_parts(multipart).await?;
    let file = parts
        .file
        .ok_or_else(|| AppError::bad_request(crate::storage::NO_FILE_MESSAGE))?;
    Ok(Json(upload_service::preview(file, parts.crop.aspect)))
}
