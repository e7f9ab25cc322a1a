use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{ADMIN_ROLE, Claims, LoginRequest, LoginResponse, SessionInfo},
    entity::admins::{ActiveModel, Column, Entity as Admins},
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Signs a session token for `admin_id` valid for `lifetime_secs`.
pub fn issue_token(
    admin_id: Uuid,
    email: &str,
    secret: &str,
    lifetime_secs: i64,
) -> AppResult<LoginResponse> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(Duration::seconds(lifetime_secs))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        role: ADMIN_ROLE.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at,
    })
}

pub async fn login_admin(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { email, password } = payload;
    let email = normalize_email(&email);

    let admin = Admins::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify_password(&password, &admin.password_hash)? {
        tracing::info!(email = %email, "admin login rejected");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let resp = issue_token(
        admin.id,
        &admin.email,
        &state.config.jwt_secret,
        state.config.admin_session_secs,
    )?;

    audit::record(
        &state.orm,
        Some(admin.id),
        "admin_login",
        "admins",
        serde_json::json!({ "admin_id": admin.id }),
    )
    .await;

    Ok(resp)
}

/// Issues a fresh token for a still-valid session, pushing the expiry forward.
pub async fn refresh_session(state: &AppState, session: &AdminSession) -> AppResult<LoginResponse> {
    let admin = Admins::find_by_id(session.admin_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Admin account no longer exists".into()))?;

    issue_token(
        admin.id,
        &admin.email,
        &state.config.jwt_secret,
        state.config.admin_session_secs,
    )
}

pub fn session_info(session: &AdminSession) -> SessionInfo {
    SessionInfo {
        admin_id: session.admin_id,
        email: session.email.clone(),
        expires_at: session.expires_at,
    }
}

/// Creates the admin account, or resets its password when it already exists.
pub async fn ensure_admin_account(
    conn: &DatabaseConnection,
    email: &str,
    password: &str,
) -> AppResult<Uuid> {
    let email = normalize_email(email);
    let password_hash = hash_password(password)?;

    let existing = Admins::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(conn)
        .await?;

    let admin = match existing {
        Some(admin) => {
            let mut active: ActiveModel = admin.into();
            active.password_hash = Set(password_hash);
            active.update(conn).await?
        }
        None => {
            ActiveModel {
                id: Set(Uuid::new_v4()),
                email: Set(email),
                password_hash: Set(password_hash),
                created_at: NotSet,
            }
            .insert(conn)
            .await?
        }
    };

    Ok(admin.id)
}
