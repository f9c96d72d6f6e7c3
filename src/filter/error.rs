use thiserror::Error;

use crate::database::DatabaseError;
use crate::error::ApiError;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for FilterError {
    fn from(err: sqlx::Error) -> Self {
        FilterError::Database(err.into())
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidPage(msg) => ApiError::not_found(format!("Invalid page: {}", msg)),
            FilterError::Database(e) => e.into(),
        }
    }
}
