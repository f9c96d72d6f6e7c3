// handlers/protected/data/record.rs - /api/:resource/:id/ handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::{models::Record, Repository};
use crate::error::ApiError;
use crate::forms::{today, FormData, RecordForm};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{describe, parse_record_id, payload_form};

const ALLOW: [&str; 6] = ["GET", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// GET /api/:resource/:id/
pub async fn get<T: Record>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<T> {
    let id = parse_record_id(&id)?;
    let record = Repository::<T>::new(state.pool.clone()).select_404(id).await?;
    Ok(ApiResponse::success(record))
}

/// PUT /api/:resource/:id/ - full update; the creator is kept
pub async fn put<T: Record>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    let id = parse_record_id(&id)?;
    let repo = Repository::<T>::new(state.pool.clone());
    repo.select_404(id).await?;

    let data = payload_form(payload)?;
    RecordForm::new(T::KIND, data)
        .save(&state.pool, user.id, Some(id), today())
        .await?;

    Ok(ApiResponse::success(repo.select_404(id).await?))
}

/// PATCH /api/:resource/:id/ - submitted fields over the stored ones
pub async fn patch<T: Record>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<T> {
    let id = parse_record_id(&id)?;
    let repo = Repository::<T>::new(state.pool.clone());
    let stored = stored_form_data(&repo.select_404(id).await?)?;

    let data = payload_form(payload)?.with_defaults(stored);
    RecordForm::new(T::KIND, data)
        .save(&state.pool, user.id, Some(id), today())
        .await?;

    Ok(ApiResponse::success(repo.select_404(id).await?))
}

/// DELETE /api/:resource/:id/ - dependents go with the record
pub async fn delete<T: Record>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_record_id(&id)?;
    Repository::<T>::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// OPTIONS /api/:resource/:id/
pub async fn options<T: Record>() -> Response {
    let mut response = ApiResponse::success(describe(T::KIND, &ALLOW)).into_response();
    response.headers_mut().insert(
        header::ALLOW,
        HeaderValue::from_static("GET, PUT, PATCH, DELETE, HEAD, OPTIONS"),
    );
    response
}

fn stored_form_data<T: Record>(record: &T) -> Result<FormData, ApiError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(FormData::from_json_object(&map)),
        Ok(_) => Err(ApiError::internal_server_error("Record did not serialize to an object")),
        Err(e) => {
            tracing::error!("Failed to serialize {}: {}", T::KIND, e);
            Err(ApiError::internal_server_error("Failed to read stored record"))
        }
    }
}
