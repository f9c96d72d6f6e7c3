pub mod dynamic;
pub mod manager;
pub mod models;
pub mod repository;
pub mod service;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;
