//! Input validation for record writes.
//!
//! Browser forms and API payloads both arrive as flat string data and go
//! through the same `RecordForm`, so the two write paths cannot disagree.

pub mod login;
pub mod validators;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::dynamic;
use crate::database::models::{FieldKind, RecordKind};
use crate::database::DatabaseError;

pub use login::LoginForm;

/// Per-field error messages, one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    /// Records `message` unless the field already has an error
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid form data")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<FieldErrors> for FormError {
    fn from(errors: FieldErrors) -> Self {
        FormError::Invalid(errors)
    }
}

impl From<FormError> for crate::error::ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Invalid(errors) => errors.into(),
            FormError::Database(e) => e.into(),
        }
    }
}

/// Raw submitted values keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Trimmed value, `None` when absent or blank
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Flattens a JSON object. `null` becomes a blank value, so it reads as
    /// absent but still shadows a default; other scalars are stringified.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let data = object
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        Self(data)
    }

    /// Fills every field missing here from `defaults`; used for partial updates
    pub fn with_defaults(mut self, defaults: FormData) -> Self {
        for (key, value) in defaults.0 {
            self.0.entry(key).or_insert(value);
        }
        self
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(data: HashMap<String, String>) -> Self {
        Self(data)
    }
}

/// A validated field value, ready to bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Reference(Uuid),
    Null,
}

#[derive(Debug, Clone)]
pub struct CleanedData {
    pub kind: RecordKind,
    pub values: Vec<(&'static str, FieldValue)>,
}

impl CleanedData {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(name, _)| *name == field).map(|(_, value)| value)
    }

    fn date(&self, field: &str) -> Option<NaiveDate> {
        match self.get(field) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    /// References that must point at existing rows
    fn references(&self) -> impl Iterator<Item = (&'static str, RecordKind, Uuid)> + '_ {
        self.values.iter().filter_map(move |(name, value)| match (self.kind.field(name), value) {
            (Some(spec), FieldValue::Reference(id)) => match spec.kind {
                FieldKind::Reference { to } => Some((*name, to, *id)),
                _ => None,
            },
            _ => None,
        })
    }
}

/// Validation and persistence for one record type
#[derive(Debug, Clone)]
pub struct RecordForm {
    kind: RecordKind,
    data: FormData,
}

impl RecordForm {
    pub fn new(kind: RecordKind, data: FormData) -> Self {
        Self { kind, data }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Every check that needs no database: presence, parsing, length,
    /// future dates and date ordering.
    pub fn clean(&self, today: NaiveDate) -> Result<CleanedData, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut values = Vec::with_capacity(self.kind.fields().len());

        for spec in self.kind.fields() {
            let raw = match self.data.get(spec.name) {
                Some(raw) => raw,
                None => {
                    if spec.required {
                        errors.add(spec.name, validators::REQUIRED);
                    } else {
                        values.push((spec.name, FieldValue::Null));
                    }
                    continue;
                }
            };

            let parsed = match spec.kind {
                FieldKind::Text { max_length } => match max_length {
                    Some(max) => validators::validate_max_length(raw, max).map(|_| FieldValue::Text(raw.to_string())),
                    None => Ok(FieldValue::Text(raw.to_string())),
                },
                FieldKind::Date { not_future } => validators::parse_date(raw).and_then(|date| {
                    if not_future {
                        validators::validate_date_not_future(date, today)?;
                    }
                    Ok(FieldValue::Date(date))
                }),
                FieldKind::Reference { .. } => validators::parse_uuid(raw).map(FieldValue::Reference),
            };

            match parsed {
                Ok(value) => values.push((spec.name, value)),
                Err(message) => errors.add(spec.name, message),
            }
        }

        let cleaned = CleanedData { kind: self.kind, values };

        for order in self.kind.date_orders() {
            if errors.contains(order.start) || errors.contains(order.end) {
                continue;
            }
            if let (Some(start), Some(end)) = (cleaned.date(order.start), cleaned.date(order.end)) {
                if let Err(message) = validators::validate_end_date_not_before_start_date(end, start) {
                    errors.add(order.end, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    /// `clean` plus existence checks on referenced strains and projects
    pub async fn validate(&self, pool: &SqlitePool, today: NaiveDate) -> Result<CleanedData, FormError> {
        let cleaned = self.clean(today)?;

        let mut errors = FieldErrors::default();
        for (field, target, id) in cleaned.references() {
            if !dynamic::exists(pool, target, id).await? {
                errors.add(field, validators::INVALID_CHOICE);
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(FormError::Invalid(errors))
        }
    }

    /// Validates and writes. A new record gets `actor` as its creator; an
    /// existing one keeps the creator it has.
    pub async fn save(
        &self,
        pool: &SqlitePool,
        actor: Uuid,
        instance: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Uuid, FormError> {
        let cleaned = self.validate(pool, today).await?;

        let id = match instance {
            Some(id) => {
                dynamic::update(pool, id, &cleaned).await?;
                tracing::info!(kind = %self.kind, %id, "record updated");
                id
            }
            None => {
                let id = dynamic::insert(pool, &cleaned, actor).await?;
                tracing::info!(kind = %self.kind, %id, created_by = %actor, "record created");
                id
            }
        };

        Ok(id)
    }
}

/// Today's date for "not in the future" checks
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
