use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::AppState;
use crate::auth::session::session_key;
use crate::database::{models::User, service};

use super::response::found;

/// Browser user resolved from the session cookie
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub user: User,
    pub key: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionUser>().cloned().ok_or_else(|| found("/"))
    }
}

/// Gate for the browser pages: without a live session the visitor is sent
/// back to the login page.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(key) = session_key(&jar) else {
        return found("/");
    };

    match service::find_session_user(&state.pool, &key).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(SessionUser { user, key });
            next.run(request).await
        }
        Ok(None) => found("/"),
        Err(e) => crate::error::ApiError::from(e).into_response(),
    }
}
