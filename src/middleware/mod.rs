pub mod auth;
pub mod response;
pub mod session;
pub mod validate_user;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{found, ApiResponse, ApiResult, PageResponse, PageResult};
pub use session::{session_middleware, SessionUser};
pub use validate_user::validate_user_middleware;
