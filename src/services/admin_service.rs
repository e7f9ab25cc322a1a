use std::time::Duration;

use crate::{
    audit,
    dto::dashboard::DashboardSummary,
    error::AppResult,
    middleware::auth::AdminSession,
    models::QuoteStatus,
    services::{product_service, quote_service},
    state::AppState,
    storage::SweepReport,
};

const RECENT_QUOTES: u64 = 5;

pub async fn dashboard(state: &AppState) -> AppResult<DashboardSummary> {
    let (total_quotes, pending_quotes, total_products, low_stock_products, recent_quotes) = tokio::try_join!(
        quote_service::count_quotes(&state.orm, None),
        quote_service::count_quotes(&state.orm, Some(QuoteStatus::Pending)),
        product_service::count_products(&state.orm),
        product_service::low_stock_products(&state.orm, product_service::LOW_STOCK_THRESHOLD),
        quote_service::recent_quotes(&state.orm, RECENT_QUOTES),
    )?;

    Ok(DashboardSummary {
        total_quotes,
        pending_quotes,
        total_products,
        low_stock_products,
        recent_quotes,
    })
}

/// Removes uploads that no product references and that are older than the
/// configured grace period.
pub async fn sweep_uploads(state: &AppState) -> AppResult<SweepReport> {
    let referenced = product_service::referenced_uploads(&state.orm).await?;
    let grace = Duration::from_secs(state.config.upload_orphan_grace_secs);
    let report = state.uploads.sweep_orphans(&referenced, grace).await?;

    tracing::info!(
        scanned = report.scanned,
        removed = report.removed.len(),
        "upload sweep finished"
    );
    Ok(report)
}

pub async fn sweep_uploads_as(state: &AppState, session: &AdminSession) -> AppResult<SweepReport> {
    let report = sweep_uploads(state).await?;
    audit::record(
        &state.orm,
        Some(session.admin_id),
        "upload_sweep",
        "uploads",
        serde_json::json!({ "removed": report.removed }),
    )
    .await;
    Ok(report)
}
