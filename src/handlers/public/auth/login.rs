// handlers/public/auth/login.rs - POST /api/auth/login

use axum::{extract::State, extract::rejection::JsonRejection, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;
use crate::forms::LoginForm;
use crate::middleware::{ApiResponse, ApiResult};

/// Exchanges a username and password for a bearer token.
///
/// The token is also stored as the user's current API token, the same one
/// the home page shows after a browser login.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(form) = payload?;

    if !form.is_complete() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = auth::authenticate(&state.pool, form.username.trim(), &form.password).await?;
    let token = auth::issue_token(&state.pool, &user, &state.config.security).await?;

    tracing::info!("API login for '{}'", user.username);

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": user,
    })))
}
