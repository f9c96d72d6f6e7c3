// handlers/pages/login.rs - GET/POST /, GET /logout/

use axum::{
    extract::{rejection::FormRejection, State},
    response::IntoResponse,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::app::AppState;
use crate::auth::{self, session, AuthError};
use crate::database::service;
use crate::forms::{login::INVALID_FORM, LoginForm};
use crate::middleware::{found, PageResponse, PageResult};

const TEMPLATE: &str = "login.html";

fn login_page(username: &str, error_message: Option<&str>) -> PageResponse {
    PageResponse::new(
        TEMPLATE,
        json!({
            "form": { "username": username },
            "error_message": error_message,
        }),
    )
}

/// GET /
pub async fn show() -> PageResponse {
    login_page("", None)
}

/// POST / - starts a browser session and issues a fresh API token
pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> PageResult {
    let form = match form {
        Ok(Form(form)) if form.is_complete() => form,
        Ok(Form(form)) => return Ok(login_page(&form.username, Some(INVALID_FORM)).into_response()),
        Err(_) => return Ok(login_page("", Some(INVALID_FORM)).into_response()),
    };

    let user = match auth::authenticate(&state.pool, form.username.trim(), &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Ok(login_page(&form.username, Some(INVALID_FORM)).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let security = &state.config.security;
    let key = service::create_session(&state.pool, user.id, security.session_hours).await?;
    auth::issue_token(&state.pool, &user, security).await?;

    tracing::info!("Browser login for '{}'", user.username);

    let jar = jar.add(session::session_cookie(key, security.session_hours, security.secure_cookies));
    Ok((jar, found("/home/")).into_response())
}

/// GET /logout/ - ends the session, if there is one
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> PageResult {
    if let Some(key) = session::session_key(&jar) {
        service::delete_session(&state.pool, &key).await?;
    }

    Ok((session::clear_session_cookie(jar), found("/")).into_response())
}
