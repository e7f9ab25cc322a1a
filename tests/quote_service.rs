mod common;

use axum::http::StatusCode;
use sea_orm::MockExecResult;
use seafood_catalog_api::{
    dto::quotes::{CreateQuoteRequest, UpdateQuoteStatusRequest},
    entity::quotes,
    error::AppError,
    middleware::auth::AdminSession,
    models::QuoteStatus,
    routes::create_app,
    services::quote_service,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{admin_token, body_json, empty_db, executed_sql, json_request, mock_state};

fn stored_quote(status: QuoteStatus, quantity: Option<f64>) -> quotes::Model {
    quotes::Model {
        id: Uuid::new_v4(),
        name: "John Smith".into(),
        email: "john@example.com".into(),
        phone: "+1 555 0100".into(),
        company: None,
        message: "Looking for frozen tuna loins, monthly.".into(),
        product_name: None,
        quantity,
        status,
        created_at: chrono::Utc::now().fixed_offset(),
    }
}

fn session() -> AdminSession {
    AdminSession {
        admin_id: Uuid::new_v4(),
        email: "admin@fifafish.com".into(),
        role: "admin".into(),
        expires_at: chrono::Utc::now() + chrono::Duration::minutes(5),
    }
}

#[tokio::test]
async fn client_status_is_ignored_on_intake() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = empty_db().append_query_results([[stored_quote(QuoteStatus::Pending, None)]]);
    let state = mock_state(dir.path(), db);

    let payload: CreateQuoteRequest = serde_json::from_value(json!({
        "name": "John Smith",
        "email": "john@example.com",
        "phone": "+1 555 0100",
        "message": "Looking for frozen tuna loins, monthly.",
        "status": "rejected"
    }))?;
    let quote = quote_service::create_quote(&state, payload).await?;
    assert_eq!(quote.status, QuoteStatus::Pending);
    assert!(quote.quantity.is_none());

    let sql = executed_sql(state.orm.clone());
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with("INSERT INTO \"quotes\""), "{}", sql[0]);
    assert!(sql[0].contains("'pending'"), "{}", sql[0]);
    assert!(!sql[0].contains("rejected"), "{}", sql[0]);
    Ok(())
}

#[tokio::test]
async fn public_intake_answers_created_with_pending_status() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = empty_db().append_query_results([[stored_quote(QuoteStatus::Pending, None)]]);
    let app = create_app(mock_state(dir.path(), db));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/quotes",
            None,
            json!({
                "name": "John Smith",
                "email": "john@example.com",
                "phone": "+1 555 0100",
                "message": "Looking for frozen tuna loins, monthly."
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert!(json["quantity"].is_null());
    Ok(())
}

#[tokio::test]
async fn same_status_is_a_no_op() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let existing = stored_quote(QuoteStatus::Processing, Some(250.0));
    let id = existing.id;
    let state = mock_state(dir.path(), empty_db().append_query_results([[existing]]));

    let quote = quote_service::set_status(
        &state,
        &session(),
        id,
        UpdateQuoteStatusRequest {
            status: "processing".into(),
        },
    )
    .await?;
    assert_eq!(quote.status, QuoteStatus::Processing);

    let sql = executed_sql(state.orm.clone());
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with("SELECT"), "{}", sql[0]);
    Ok(())
}

#[tokio::test]
async fn status_change_is_written() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let existing = stored_quote(QuoteStatus::Pending, Some(250.0));
    let mut updated = existing.clone();
    updated.status = QuoteStatus::Completed;
    let id = existing.id;
    let db = empty_db().append_query_results([[existing], [updated]]);
    let state = mock_state(dir.path(), db);

    let quote = quote_service::set_status(
        &state,
        &session(),
        id,
        UpdateQuoteStatusRequest {
            status: "completed".into(),
        },
    )
    .await?;
    assert_eq!(quote.status, QuoteStatus::Completed);

    let sql = executed_sql(state.orm.clone());
    let update = sql
        .iter()
        .find(|stmt| stmt.starts_with("UPDATE \"quotes\""))
        .expect("update statement");
    assert!(update.contains("'completed'"), "{update}");
    Ok(())
}

#[tokio::test]
async fn unknown_status_is_rejected_before_any_query() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = mock_state(dir.path(), empty_db());

    let result = quote_service::set_status(
        &state,
        &session(),
        Uuid::new_v4(),
        UpdateQuoteStatusRequest {
            status: "archived".into(),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(ref msg)) if msg == "Invalid status"));
    assert!(executed_sql(state.orm.clone()).is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_missing_quote_is_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let nothing_deleted = || MockExecResult {
        last_insert_id: 0,
        rows_affected: 0,
    };

    let state = mock_state(
        dir.path(),
        empty_db().append_exec_results([nothing_deleted()]),
    );
    let result = quote_service::delete_quote(&state, &session(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let app = create_app(mock_state(
        dir.path(),
        empty_db().append_exec_results([nothing_deleted()]),
    ));
    let token = admin_token();
    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/quotes/{}", Uuid::new_v4()),
            Some(&token),
            json!({}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
