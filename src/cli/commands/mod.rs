pub mod fixture;
pub mod server;
pub mod user;
