use axum::{extract::Request, http::Method, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Methods any authenticated user may call
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Read/write split for the REST API: reads need an authenticated user,
/// writes need a superuser. Runs before any handler touches the body.
pub async fn validate_user_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided."))?;

    if !is_safe_method(request.method()) && !user.is_superuser() {
        tracing::info!(
            user = %user.0.username,
            method = %request.method(),
            path = %request.uri().path(),
            "write rejected for non-superuser"
        );
        return Err(ApiError::forbidden("You do not have permission to perform this action."));
    }

    Ok(next.run(request).await)
}
