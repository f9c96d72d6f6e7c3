// handlers/protected/data/schema.rs - /api/:resource/ collection handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::{models::Record, Repository};
use crate::forms::{today, RecordForm};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{describe, payload_form};

const ALLOW: [&str; 4] = ["GET", "POST", "HEAD", "OPTIONS"];

/// GET /api/:resource/ - every record, ordered by id
pub async fn get<T: Record>(State(state): State<AppState>) -> ApiResult<Vec<T>> {
    let records = Repository::<T>::new(state.pool.clone()).select_all().await?;
    Ok(ApiResponse::success(records))
}

/// POST /api/:resource/ - create a record owned by the caller
pub async fn post<T: Record>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    let data = payload_form(payload)?;

    let id = RecordForm::new(T::KIND, data)
        .save(&state.pool, user.id, None, today())
        .await?;

    let record = Repository::<T>::new(state.pool.clone()).select_404(id).await?;
    Ok(ApiResponse::created(record))
}

/// OPTIONS /api/:resource/
pub async fn options<T: Record>() -> Response {
    let mut response = ApiResponse::success(describe(T::KIND, &ALLOW)).into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, POST, HEAD, OPTIONS"));
    response
}
