// handlers/protected/mod.rs - Bearer-token handlers under /api/
//
// Every route here sits behind jwt_auth_middleware and
// validate_user_middleware, so handlers can assume an AuthUser and that
// writes come from a superuser.

pub mod auth;
pub mod data;
