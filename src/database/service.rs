// User and session queries shared by the login paths, middleware and CLI

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::expiry_after;
use crate::auth::session::{generate_session_key, hash_session_key};
use crate::database::manager::DatabaseError;
use crate::database::models::{Session, User};

const USER_COLUMNS: &str = "id, username, password_hash, first_name, last_name, email, is_superuser, is_active, token, date_joined";

/// Fields for a new login identity; `password_hash` is already hashed
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_superuser: bool,
}

pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, DatabaseError> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, first_name, last_name, email, is_superuser, is_active, token, date_joined)
         VALUES (?, ?, ?, ?, ?, ?, ?, 1, '', ?)",
    )
    .bind(id)
    .bind(&new_user.username)
    .bind(&new_user.password_hash)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.email)
    .bind(new_user.is_superuser)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique_violation(e, format!("User '{}' already exists", new_user.username)))?;

    tracing::info!("Created user '{}' (superuser: {})", new_user.username, new_user.is_superuser);

    find_user_by_id(pool, id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
}

pub async fn set_user_password(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<(), DatabaseError> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE username = ?")
        .bind(password_hash)
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("User '{}' not found", username)));
    }
    Ok(())
}

pub async fn set_user_token(pool: &SqlitePool, user_id: Uuid, token: &str) -> Result<(), DatabaseError> {
    sqlx::query("UPDATE users SET token = ? WHERE id = ?")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Starts a browser session and returns the raw cookie key
pub async fn create_session(pool: &SqlitePool, user_id: Uuid, lifetime_hours: u64) -> Result<String, DatabaseError> {
    let key = generate_session_key();
    let now = Utc::now();

    sqlx::query("INSERT INTO sessions (key_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(hash_session_key(&key))
        .bind(user_id)
        .bind(now)
        .bind(expiry_after(now, lifetime_hours))
        .execute(pool)
        .await?;

    Ok(key)
}

/// Resolves a cookie key to an active user. Expired sessions are removed on sight.
pub async fn find_session_user(pool: &SqlitePool, key: &str) -> Result<Option<User>, DatabaseError> {
    let key_hash = hash_session_key(key);

    let session = sqlx::query_as::<_, Session>(
        "SELECT key_hash, user_id, created_at, expires_at FROM sessions WHERE key_hash = ?",
    )
    .bind(&key_hash)
    .fetch_optional(pool)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        delete_session_by_hash(pool, &key_hash).await?;
        return Ok(None);
    }

    Ok(find_user_by_id(pool, session.user_id).await?.filter(|user| user.is_active))
}

pub async fn delete_session(pool: &SqlitePool, key: &str) -> Result<(), DatabaseError> {
    delete_session_by_hash(pool, &hash_session_key(key)).await
}

async fn delete_session_by_hash(pool: &SqlitePool, key_hash: &str) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM sessions WHERE key_hash = ?")
        .bind(key_hash)
        .execute(pool)
        .await?;
    Ok(())
}
