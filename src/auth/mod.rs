pub mod password;
pub mod session;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::{service, DatabaseError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Bearer token claims. Privileges are read from the user row on every
/// request, so the token only identifies the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = expiry_after(now, expiry_hours).timestamp();

        Self {
            sub: user.id,
            username: user.username.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// `now` plus `hours`, saturating at the latest representable instant
pub fn expiry_after(now: DateTime<Utc>, hours: u64) -> DateTime<Utc> {
    i64::try_from(hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn generate_jwt(user: &User, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let claims = Claims::new(user, security.jwt_expiry_hours);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Checks a username/password pair. Every failure collapses into
/// `InvalidCredentials`; the cause is only logged.
pub async fn authenticate(pool: &SqlitePool, username: &str, password: &str) -> Result<User, AuthError> {
    let user = match service::find_user_by_username(pool, username).await? {
        Some(user) => user,
        None => {
            tracing::debug!("Login failed: unknown user '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !user.is_active {
        tracing::debug!("Login failed: user '{}' is inactive", username);
        return Err(AuthError::InvalidCredentials);
    }

    if !password::verify_password(password, &user.password_hash).await? {
        tracing::debug!("Login failed: wrong password for '{}'", username);
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

/// Mints a bearer token for `user` and stores it as their current API token
pub async fn issue_token(pool: &SqlitePool, user: &User, security: &SecurityConfig) -> Result<String, AuthError> {
    let token = generate_jwt(user, security)?;
    service::set_user_token(pool, user.id, &token).await?;
    Ok(token)
}
