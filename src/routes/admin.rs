use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::dashboard::DashboardSummary,
    error::AppResult,
    middleware::auth::AdminSession,
    services::admin_service,
    state::AppState,
    storage::SweepReport,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/uploads/sweep", post(sweep_uploads))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Quote and stock overview", body = DashboardSummary),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _session: AdminSession,
) -> AppResult<Json<DashboardSummary>> {
    let summary = admin_service::dashboard(&state).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/admin/uploads/sweep",
    responses(
        (status = 200, description = "Unreferenced uploads removed", body = SweepReport),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn sweep_uploads(
    State(state): State<AppState>,
    session: AdminSession,
) -> AppResult<Json<SweepReport>> {
    let report = admin_service::sweep_uploads_as(&state, &session).await?;
    Ok(Json(report))
}
