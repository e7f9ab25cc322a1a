#![allow(dead_code)]

use std::{io::Cursor, path::Path};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use seafood_catalog_api::{
    config::AppConfig, routes::create_app, services::auth_service::issue_token, state::AppState,
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "----seafood-test-boundary";

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        admin_session_secs: 300,
        upload_dir: upload_dir.to_path_buf(),
        upload_sweep_interval_secs: 0,
        upload_orphan_grace_secs: 86_400,
    }
}

/// State on a mock Postgres connection. Statements beyond the prepared
/// results fail with a mock error instead of reaching a server.
pub fn mock_state(upload_dir: &Path, db: MockDatabase) -> AppState {
    AppState::new(db.into_connection(), test_config(upload_dir))
}

/// App whose database answers nothing. Every statement fails with a mock
/// error, so audit writes only log a warning and store-backed routes fail.
pub fn offline_app(upload_dir: &Path) -> Router {
    create_app(mock_state(upload_dir, empty_db()))
}

pub fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// SQL of every statement the connection has run, values inlined.
pub fn executed_sql(conn: DatabaseConnection) -> Vec<String> {
    conn.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(ToString::to_string))
        .collect()
}

pub fn admin_token() -> String {
    token_with_lifetime(300)
}

pub fn token_with_lifetime(lifetime_secs: i64) -> String {
    issue_token(Uuid::new_v4(), "admin@fifafish.com", JWT_SECRET, lifetime_secs)
        .expect("token")
        .token
}

pub struct FilePart<'a> {
    pub name: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Hand-built `multipart/form-data` body.
pub fn multipart_body(file: Option<FilePart<'_>>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(file) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.name, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).expect("request")
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// PNG of the given size. `noisy` fills it with pseudo-random pixels so the
/// encoder cannot compress it much.
pub fn png_bytes(width: u32, height: u32, noisy: bool) -> Vec<u8> {
    let mut seed: u32 = 0x2545_f491;
    let image = RgbImage::from_fn(width, height, |x, y| {
        if noisy {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            Rgb([r, g, b])
        } else {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }
    });
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("encode png");
    out
}

pub fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
