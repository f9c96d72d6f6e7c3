pub mod auth;
pub mod root;

pub use auth::login as auth_login;
pub use root::api_root;
