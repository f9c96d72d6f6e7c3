// handlers/public/root.rs - GET /api/

use axum::Json;
use serde_json::{Map, Value};

use crate::database::models::RecordKind;

/// Collection index: resource name to its URL
pub async fn api_root() -> Json<Value> {
    let collections: Map<String, Value> = RecordKind::ALL
        .into_iter()
        .map(|kind| {
            (
                kind.resource().to_string(),
                Value::String(format!("/api/{}/", kind.resource())),
            )
        })
        .collect();

    Json(Value::Object(collections))
}
