// handlers/pages/chooser.rs - model chooser, object chooser and editor
//
// /choose_model/ -> /choose_object/{model}/ -> /edit_model/{model}/{id}/
// An unknown model name at any step goes back to /choose_model/.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Form,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::{dynamic, models::RecordKind};
use crate::error::ApiError;
use crate::forms::{today, FieldErrors, FormData, FormError, RecordForm};
use crate::middleware::{found, PageResponse, PageResult, SessionUser};

use super::form_context;

const CHOOSE_MODEL: &str = "/choose_model/";

fn choose_model_page() -> PageResponse {
    let models: Vec<&str> = RecordKind::ALL.iter().map(|kind| kind.model_name()).collect();
    PageResponse::new("choose_model.html", json!({ "models": models }))
}

fn edit_url(kind: RecordKind, id: Uuid) -> String {
    format!("/edit_model/{}/{}/", kind.model_name(), id)
}

fn parse_object_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found("Object not found"))
}

/// GET /choose_model/
pub async fn choose_model() -> PageResponse {
    choose_model_page()
}

/// POST /choose_model/
pub async fn choose_model_submit(Form(fields): Form<HashMap<String, String>>) -> PageResult {
    let model = fields.get("model").map(|m| m.trim()).unwrap_or_default();

    if model.is_empty() {
        return Ok(choose_model_page().into_response());
    }

    match RecordKind::from_model_name(model) {
        Some(kind) => Ok(found(format!("/choose_object/{}/", kind.model_name()))),
        None => Ok(found(CHOOSE_MODEL)),
    }
}

async fn choose_object_page(state: &AppState, kind: RecordKind) -> Result<PageResponse, ApiError> {
    let objects: Vec<Value> = dynamic::choices(&state.pool, kind)
        .await?
        .into_iter()
        .map(|(id, display)| json!({ "id": id, "display": display }))
        .collect();

    Ok(PageResponse::new(
        "choose_object.html",
        json!({
            "model_name": kind.model_name(),
            "display_field": kind.display_field(),
            "objects": objects,
        }),
    ))
}

/// GET /choose_object/{model}/
pub async fn choose_object(State(state): State<AppState>, Path(model): Path<String>) -> PageResult {
    let Some(kind) = RecordKind::from_model_name(&model) else {
        return Ok(found(CHOOSE_MODEL));
    };

    Ok(choose_object_page(&state, kind).await?.into_response())
}

/// POST /choose_object/{model}/
pub async fn choose_object_submit(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> PageResult {
    let Some(kind) = RecordKind::from_model_name(&model) else {
        return Ok(found(CHOOSE_MODEL));
    };

    let raw = fields.get("object_id").map(|id| id.trim()).unwrap_or_default();
    if raw.is_empty() {
        return Ok(choose_object_page(&state, kind).await?.into_response());
    }

    let id = parse_object_id(raw)?;
    if !dynamic::exists(&state.pool, kind, id).await? {
        return Err(ApiError::not_found("Object not found"));
    }

    Ok(found(edit_url(kind, id)))
}

fn edit_page(kind: RecordKind, id: Uuid, data: &FormData, errors: Option<&FieldErrors>) -> PageResponse {
    PageResponse::new(
        "edit_model.html",
        json!({
            "form": form_context(kind, data, errors),
            "model_name": kind.model_name(),
            "object_id": id,
        }),
    )
}

/// GET /edit_model/{model}/{id}/
pub async fn edit_model(State(state): State<AppState>, Path((model, id)): Path<(String, String)>) -> PageResult {
    let Some(kind) = RecordKind::from_model_name(&model) else {
        return Ok(found(CHOOSE_MODEL));
    };
    let id = parse_object_id(&id)?;

    let stored = match dynamic::fetch_json(&state.pool, kind, id).await? {
        Some(Value::Object(map)) => FormData::from_json_object(&map),
        _ => return Err(ApiError::not_found("Object not found")),
    };

    Ok(edit_page(kind, id, &stored, None).into_response())
}

/// POST /edit_model/{model}/{id}/ - same validation as creation; the
/// creator is kept
pub async fn edit_model_submit(
    State(state): State<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path((model, id)): Path<(String, String)>,
    Form(fields): Form<HashMap<String, String>>,
) -> PageResult {
    let Some(kind) = RecordKind::from_model_name(&model) else {
        return Ok(found(CHOOSE_MODEL));
    };
    let id = parse_object_id(&id)?;

    if !dynamic::exists(&state.pool, kind, id).await? {
        return Err(ApiError::not_found("Object not found"));
    }

    let data = FormData::from(fields);
    match RecordForm::new(kind, data.clone()).save(&state.pool, user.id, Some(id), today()).await {
        Ok(_) => Ok(found(edit_url(kind, id))),
        Err(FormError::Invalid(errors)) => Ok(edit_page(kind, id, &data, Some(&errors)).into_response()),
        Err(e) => Err(e.into()),
    }
}
