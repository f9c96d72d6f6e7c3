use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::RecordKind;
use crate::error::ApiError;
use crate::forms::FormData;

/// Record ids in paths are UUIDs; anything else cannot name a record
pub fn parse_record_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found("Record not found"))
}

/// Request body as form data. The body must be a JSON object.
pub fn payload_form(payload: Result<Json<Value>, JsonRejection>) -> Result<FormData, ApiError> {
    let Json(body) = payload?;

    match body {
        Value::Object(map) => Ok(FormData::from_json_object(&map)),
        _ => Err(ApiError::invalid_json("Expected a JSON object")),
    }
}

/// Body of an OPTIONS response
pub fn describe(kind: RecordKind, allow: &[&str]) -> Value {
    json!({
        "name": kind.model_name(),
        "resource": kind.resource(),
        "fields": kind.fields(),
        "methods": allow,
    })
}
