// handlers/protected/auth/whoami.rs - GET /api/auth/whoami

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn whoami(AuthUser(user): AuthUser) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}
