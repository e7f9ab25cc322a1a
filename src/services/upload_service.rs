use crate::{
    audit,
    dto::upload::{CropUploadResponse, PreviewResponse, UploadResponse},
    error::AppResult,
    imaging::{self, CROPPED_FILENAME, CROPPED_MIME, CropRegion, DEFAULT_ASPECT_RATIO},
    middleware::auth::AdminSession,
    state::AppState,
    storage::{IncomingFile, StoredFile, validate_image_part, validate_upload},
};

const FALLBACK_FILENAME: &str = "image";

/// Optional crop parameters sent alongside the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropParams {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect: Option<f64>,
    pub zoom: Option<f64>,
}

impl CropParams {
    /// The explicit rectangle when all four edges were sent, otherwise the
    /// centered rectangle for the requested aspect and zoom.
    pub fn region(&self, natural: (u32, u32)) -> CropRegion {
        match (self.x, self.y, self.width, self.height) {
            (Some(x), Some(y), Some(width), Some(height)) => CropRegion::new(x, y, width, height),
            _ => CropRegion::centered(
                natural.0,
                natural.1,
                self.aspect.unwrap_or(DEFAULT_ASPECT_RATIO),
                self.zoom.unwrap_or(1.0),
            ),
        }
    }
}

pub async fn upload(
    state: &AppState,
    session: &AdminSession,
    file: Option<IncomingFile>,
) -> AppResult<UploadResponse> {
    let file = validate_upload(file.as_ref())?;
    let name = file.file_name.as_deref().unwrap_or(FALLBACK_FILENAME);
    let stored = state.uploads.store(name, &file.bytes).await?;

    record_upload(state, session, &stored, file.bytes.len()).await;

    Ok(UploadResponse {
        success: true,
        url: stored.url,
        filename: stored.filename,
    })
}

/// Crops the received image and stores the JPEG result.
pub async fn crop_and_upload(
    state: &AppState,
    session: &AdminSession,
    file: Option<IncomingFile>,
    params: CropParams,
) -> AppResult<CropUploadResponse> {
    let file = validate_image_part(file.as_ref())?;
    let natural = imaging::dimensions(&file.bytes)?;
    let region = params.region(natural);

    let source = file.bytes.clone();
    let cropped = tokio::task::spawn_blocking(move || imaging::crop(&source, region))
        .await
        .map_err(|e| anyhow::anyhow!(e))??;

    tracing::debug!(
        natural_width = natural.0,
        natural_height = natural.1,
        ?region,
        mime = CROPPED_MIME,
        "image cropped"
    );

    // The size limit applies to what gets stored, not to the source.
    let jpeg = IncomingFile {
        file_name: Some(CROPPED_FILENAME.to_string()),
        content_type: Some(CROPPED_MIME.to_string()),
        bytes: cropped.bytes,
    };
    let output = validate_upload(Some(&jpeg))?;

    let stored = state.uploads.store(CROPPED_FILENAME, &output.bytes).await?;
    record_upload(state, session, &stored, output.bytes.len()).await;

    Ok(CropUploadResponse {
        success: true,
        url: stored.url,
        filename: stored.filename,
        width: cropped.width,
        height: cropped.height,
    })
}

/// Reads a picked file back as a data URL for the cropper. Nothing is
/// validated or stored; undecodable files simply come back without sizes.
pub fn preview(file: IncomingFile, aspect: Option<f64>) -> PreviewResponse {
    let mime = file
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let natural = imaging::dimensions(&file.bytes).ok();
    let suggested_crop = natural.map(|(width, height)| {
        CropRegion::centered(width, height, aspect.unwrap_or(DEFAULT_ASPECT_RATIO), 1.0)
    });

    PreviewResponse {
        data_url: imaging::to_data_url(&file.bytes, &mime),
        width: natural.map(|(w, _)| w),
        height: natural.map(|(_, h)| h),
        suggested_crop,
    }
}

async fn record_upload(state: &AppState, session: &AdminSession, stored: &StoredFile, size: usize) {
    audit::record(
        &state.orm,
        Some(session.admin_id),
        "image_upload",
        "uploads",
        serde_json::json!({ "filename": stored.filename, "size": size }),
    )
    .await;
}
