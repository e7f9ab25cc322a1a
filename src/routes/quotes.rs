use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::quotes::{CreateQuoteRequest, QuoteList, UpdateQuoteStatusRequest},
    error::AppResult,
    middleware::auth::AdminSession,
    models::Quote,
    response::{Deleted, created},
    routes::params::QuoteListQuery,
    services::quote_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes).post(create_quote))
        .route(
            "/{id}",
            get(get_quote).patch(update_quote_status).delete(delete_quote),
        )
}

#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote request stored as pending", body = Quote),
        (status = 400, description = "Invalid quote request"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Quotes"
)]
pub async fn create_quote(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuoteRequest>,
) -> AppResult<(StatusCode, Json<Quote>)> {
    let quote = quote_service::create_quote(&state, payload).await?;
    Ok(created(quote))
}

#[utoipa::path(
    get,
    path = "/api/quotes",
    params(
        ("status" = Option<String>, Query, description = "pending, processing, completed, rejected"),
        ("sort_order" = Option<String>, Query, description = "asc, desc (default)"),
    ),
    responses(
        (status = 200, description = "Quotes, newest first", body = QuoteList),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<QuoteListQuery>,
) -> AppResult<Json<QuoteList>> {
    let list = quote_service::list_quotes(&state, query).await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote ID")
    ),
    responses(
        (status = 200, description = "Get quote", body = Quote),
        (status = 404, description = "Quote not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn get_quote(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Quote>> {
    let quote = quote_service::get_quote(&state, id).await?;
    Ok(Json(quote))
}

#[utoipa::path(
    patch,
    path = "/api/quotes/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote ID")
    ),
    request_body = UpdateQuoteStatusRequest,
    responses(
        (status = 200, description = "Updated quote", body = Quote),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Quote not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn update_quote_status(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> AppResult<Json<Quote>> {
    let quote = quote_service::set_status(&state, &session, id, payload).await?;
    Ok(Json(quote))
}

#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote ID")
    ),
    responses(
        (status = 200, description = "Deleted quote", body = Deleted),
        (status = 404, description = "Quote not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn delete_quote(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Deleted>> {
    let deleted = quote_service::delete_quote(&state, &session, id).await?;
    Ok(Json(deleted))
}
