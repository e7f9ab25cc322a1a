use axum::{extract::FromRequestParts, http::header};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{
    dto::auth::{ADMIN_ROLE, Claims},
    error::AppError,
    state::AppState,
};

/// Seconds of clock skew tolerated when checking `exp`.
const EXPIRY_LEEWAY_SECS: u64 = 5;

/// A validated admin bearer token.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: Uuid,
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

pub fn ensure_role(session: &AdminSession, role: &str) -> Result<(), AppError> {
    if session.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(session: &AdminSession) -> Result<(), AppError> {
    ensure_role(session, ADMIN_ROLE)
}

pub fn decode_session(token: &str, secret: &str) -> Result<AdminSession, AppError> {
    let mut validation = Validation::default();
    validation.leeway = EXPIRY_LEEWAY_SECS;

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let admin_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid admin id in token".into()))?;
    let expires_at = DateTime::<Utc>::from_timestamp(decoded.claims.exp, 0)
        .ok_or_else(|| AppError::Unauthorized("Invalid token expiry".into()))?;

    Ok(AdminSession {
        admin_id,
        email: decoded.claims.email,
        role: decoded.claims.role,
        expires_at,
    })
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let session = decode_session(token, &state.config.jwt_secret)?;
        ensure_admin(&session)?;
        Ok(session)
    }
}
