// handlers/pages/create_all.rs - GET/POST /create_all/

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::RecordKind;
use crate::error::ApiError;
use crate::forms::{today, FieldErrors, FormData, FormError, RecordForm};
use crate::middleware::{found, PageResponse, PageResult, SessionUser};

use super::form_context;

pub const INVALID_MODEL: &str = "Неверно выбрана модель";

const TEMPLATE: &str = "create_all.html";

#[derive(Debug, Default, Deserialize)]
pub struct CreateAllQuery {
    pub model: Option<String>,
}

fn create_all_page(selected: Option<&str>, form: Value) -> PageResponse {
    let keys: Vec<&str> = RecordKind::ALL.iter().map(|kind| kind.form_key()).collect();
    PageResponse::new(
        TEMPLATE,
        json!({
            "model_forms": keys,
            "selected_model": selected,
            "form": form,
        }),
    )
}

/// GET /create_all/?model={key}
pub async fn show(Query(query): Query<CreateAllQuery>) -> PageResponse {
    let selected = query.model.as_deref().map(str::trim);
    let form = selected
        .and_then(RecordKind::from_form_key)
        .map(|kind| form_context(kind, &FormData::new(), None))
        .unwrap_or(Value::Null);

    create_all_page(selected, form)
}

/// POST /create_all/ - creates a record of the selected type owned by the
/// signed-in user
pub async fn submit(
    State(state): State<AppState>,
    SessionUser { user, .. }: SessionUser,
    Form(fields): Form<HashMap<String, String>>,
) -> PageResult {
    let mut data = FormData::from(fields);
    let key = data.remove("model").unwrap_or_default();

    let Some(kind) = RecordKind::from_form_key(key.trim()) else {
        return Err(ApiError::bad_request(INVALID_MODEL));
    };

    match RecordForm::new(kind, data.clone()).save(&state.pool, user.id, None, today()).await {
        Ok(_) => Ok(found("/home/")),
        Err(FormError::Invalid(errors)) => Ok(invalid(kind, &data, &errors)),
        Err(e) => Err(e.into()),
    }
}

fn invalid(kind: RecordKind, data: &FormData, errors: &FieldErrors) -> axum::response::Response {
    create_all_page(Some(kind.form_key()), form_context(kind, data, Some(errors))).into_response()
}
