mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;
use uuid::Uuid;

use common::{JWT_SECRET, admin_token, body_json, offline_app, token_with_lifetime};
use seafood_catalog_api::{
    dto::auth::ADMIN_ROLE,
    error::AppError,
    middleware::auth::{AdminSession, decode_session, ensure_admin},
    services::auth_service::issue_token,
};

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

#[test]
fn issued_token_decodes_to_admin_session() {
    let admin_id = Uuid::new_v4();
    let resp = issue_token(admin_id, "admin@fifafish.com", JWT_SECRET, 300).expect("token");
    assert_eq!(resp.token_type, "Bearer");

    let session = decode_session(&resp.token, JWT_SECRET).expect("session");
    assert_eq!(session.admin_id, admin_id);
    assert_eq!(session.email, "admin@fifafish.com");
    assert_eq!(session.role, ADMIN_ROLE);
    assert_eq!(session.expires_at.timestamp(), resp.expires_at.timestamp());
}

#[test]
fn expired_or_foreign_tokens_are_rejected() {
    let expired = token_with_lifetime(-60);
    assert!(matches!(
        decode_session(&expired, JWT_SECRET),
        Err(AppError::Unauthorized(_))
    ));

    let foreign = admin_token();
    assert!(matches!(
        decode_session(&foreign, "another-secret"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn non_admin_role_is_forbidden() {
    let session = AdminSession {
        admin_id: Uuid::new_v4(),
        email: "viewer@fifafish.com".into(),
        role: "viewer".into(),
        expires_at: chrono::Utc::now(),
    };
    assert!(matches!(ensure_admin(&session), Err(AppError::Forbidden)));
}

#[tokio::test]
async fn session_endpoint_reports_current_admin() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let app = offline_app(dir.path());
    let token = admin_token();

    let response = app
        .oneshot(get("/api/auth/session", Some(&token)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "admin@fifafish.com");
    assert!(json["expiresAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn admin_routes_reject_missing_and_expired_tokens() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let app = offline_app(dir.path());
    let expired = token_with_lifetime(-60);

    for uri in ["/api/quotes", "/api/admin/dashboard", "/api/auth/session"] {
        let response = app.clone().oneshot(get(uri, None)).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let json = body_json(response).await;
        assert!(json["error"].is_string());

        let response = app.clone().oneshot(get(uri, Some(&expired))).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_route_returns_json_not_found() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let app = offline_app(dir.path());

    let response = app.oneshot(get("/api/nowhere", None)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Not Found");
    Ok(())
}
