// handlers/pages/mod.rs - Browser pages
//
// Each page answers with its template name and context as JSON. All of
// them except the login page run behind session_middleware.

pub mod chooser;
pub mod create_all;
pub mod home;
pub mod lists;
pub mod login;

use serde_json::{json, Value};

use crate::database::models::RecordKind;
use crate::forms::{FieldErrors, FormData};

/// Context for a record form: its field table, the values to show and any
/// per-field errors
pub fn form_context(kind: RecordKind, data: &FormData, errors: Option<&FieldErrors>) -> Value {
    json!({
        "model": kind.model_name(),
        "fields": kind.fields(),
        "data": data,
        "errors": errors,
    })
}
