use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::quotes::{CreateQuoteRequest, QuoteList, UpdateQuoteStatusRequest},
    entity::quotes::{ActiveModel, Column, Entity as Quotes},
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    models::{Quote, QuoteStatus},
    response::Deleted,
    routes::params::{QuoteListQuery, SortOrder},
    state::AppState,
};

/// Public intake. The stored status is always `pending`.
pub async fn create_quote(state: &AppState, payload: CreateQuoteRequest) -> AppResult<Quote> {
    let payload = payload.normalized();
    payload.validate()?;

    let quote = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        company: Set(payload.company),
        message: Set(payload.message),
        product_name: Set(payload.product_name),
        quantity: Set(payload.quantity),
        status: Set(QuoteStatus::Pending),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(quote_id = %quote.id, "quote request received");
    Ok(quote.into())
}

pub async fn list_quotes(state: &AppState, query: QuoteListQuery) -> AppResult<QuoteList> {
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status = parse_status(status)?;
        condition = condition.add(Column::Status.eq(status));
    }

    let mut finder = Quotes::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Quote::from)
        .collect();

    Ok(QuoteList { items })
}

pub async fn get_quote(state: &AppState, id: Uuid) -> AppResult<Quote> {
    Quotes::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Quote::from)
        .ok_or(AppError::NotFound)
}

/// Any status may follow any other. Setting the current status again is a
/// successful no-op.
pub async fn set_status(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
    payload: UpdateQuoteStatusRequest,
) -> AppResult<Quote> {
    let status = parse_status(&payload.status)?;

    let existing = Quotes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if existing.status == status {
        return Ok(existing.into());
    }

    let previous = existing.status;
    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    let quote = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(session.admin_id),
        "quote_status_update",
        "quotes",
        serde_json::json!({ "quote_id": id, "from": previous, "to": status }),
    )
    .await;

    Ok(quote.into())
}

pub async fn delete_quote(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
) -> AppResult<Deleted> {
    let result = Quotes::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        Some(session.admin_id),
        "quote_delete",
        "quotes",
        serde_json::json!({ "quote_id": id }),
    )
    .await;

    Ok(Deleted::new(id))
}

pub async fn count_quotes(conn: &DatabaseConnection, status: Option<QuoteStatus>) -> AppResult<u64> {
    let mut finder = Quotes::find();
    if let Some(status) = status {
        finder = finder.filter(Column::Status.eq(status));
    }
    Ok(finder.count(conn).await?)
}

pub async fn recent_quotes(conn: &DatabaseConnection, limit: u64) -> AppResult<Vec<Quote>> {
    let items = Quotes::find()
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(conn)
        .await?
        .into_iter()
        .map(Quote::from)
        .collect();
    Ok(items)
}

pub fn parse_status(value: &str) -> AppResult<QuoteStatus> {
    value
        .parse::<QuoteStatus>()
        .map_err(|_| AppError::bad_request("Invalid status"))
}
