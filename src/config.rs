use std::{env, path::PathBuf};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Lifetime of an admin token; every refresh starts a new window.
    pub admin_session_secs: i64,
    pub upload_dir: PathBuf,
    /// 0 disables the background orphan sweep.
    pub upload_sweep_interval_secs: u64,
    pub upload_orphan_grace_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT").unwrap_or(3000);
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/uploads/products"));
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            admin_session_secs: parse_var("ADMIN_SESSION_SECS").unwrap_or(300),
            upload_dir,
            upload_sweep_interval_secs: parse_var("UPLOAD_SWEEP_INTERVAL_SECS").unwrap_or(0),
            upload_orphan_grace_secs: parse_var("UPLOAD_ORPHAN_GRACE_SECS").unwrap_or(86_400),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
