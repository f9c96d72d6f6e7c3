//! YAML fixture loader.
//!
//! ```yaml
//! users:
//!   - username: admin
//!     password: admin
//!     superuser: true
//! records:
//!   - model: Strains
//!     key: yeast
//!     created_by: admin
//!     fields: { uin: S-1, name: Yeast, ... }
//!   - model: Experiments
//!     created_by: admin
//!     fields: { strain_id: "@yeast", ... }
//! ```
//!
//! A field value of `@key` is replaced by the id of the earlier record with
//! that key. Records go through the same validation as the web forms.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::cli::{utils::Report, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::RecordKind;
use crate::database::service::{self, NewUser};
use crate::database::DatabaseManager;
use crate::forms::{today, FormData, FormError, RecordForm};

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    #[serde(default)]
    pub records: Vec<FixtureRecord>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct FixtureRecord {
    pub model: String,
    #[serde(default)]
    pub key: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users_created: usize,
    pub users_existing: usize,
    pub records_created: usize,
}

pub async fn handle(file: &Path, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let fixture: Fixture =
        serde_yaml::from_str(&text).with_context(|| format!("failed to parse {}", file.display()))?;

    let pool = DatabaseManager::connect_and_migrate(&config.database).await?;
    let summary = load(&pool, fixture, None).await?;

    Report::new(format!("Loaded {}", file.display()))
        .detail("users_created", summary.users_created)
        .detail("users_existing", summary.users_existing)
        .detail("records_created", summary.records_created)
        .print(&output_format)
}

/// Creates the fixture's users (existing usernames are reused as-is) and
/// then its records, in file order.
pub async fn load(pool: &SqlitePool, fixture: Fixture, bcrypt_cost: Option<u32>) -> anyhow::Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for user in fixture.users {
        if service::find_user_by_username(pool, &user.username).await?.is_some() {
            tracing::info!("Fixture user '{}' already exists", user.username);
            summary.users_existing += 1;
            continue;
        }

        service::create_user(
            pool,
            NewUser {
                password_hash: hash_password(&user.password, bcrypt_cost).await?,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                is_superuser: user.superuser,
            },
        )
        .await?;
        summary.users_created += 1;
    }

    let mut keys: HashMap<String, Uuid> = HashMap::new();

    for (index, record) in fixture.records.into_iter().enumerate() {
        let kind = RecordKind::from_model_name(&record.model)
            .ok_or_else(|| anyhow::anyhow!("record {}: unknown model '{}'", index + 1, record.model))?;

        let creator = service::find_user_by_username(pool, &record.created_by)
            .await?
            .ok_or_else(|| anyhow::anyhow!("record {}: unknown user '{}'", index + 1, record.created_by))?;

        let mut data = FormData::new();
        for (field, value) in &record.fields {
            if let Some(text) = scalar_text(value) {
                let text = resolve_key(&text, &keys).with_context(|| format!("record {}", index + 1))?;
                data.insert(field.as_str(), text);
            }
        }

        let id = match RecordForm::new(kind, data).save(pool, creator.id, None, today()).await {
            Ok(id) => id,
            Err(FormError::Invalid(errors)) => {
                anyhow::bail!("record {} ({}): invalid fields {:?}", index + 1, kind, errors.into_inner())
            }
            Err(FormError::Database(e)) => return Err(e.into()),
        };

        if let Some(key) = record.key {
            keys.insert(key, id);
        }
        summary.records_created += 1;
    }

    Ok(summary)
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        other => serde_yaml::to_string(other).ok().map(|s| s.trim().to_string()),
    }
}

fn resolve_key(text: &str, keys: &HashMap<String, Uuid>) -> anyhow::Result<String> {
    match text.strip_prefix('@') {
        Some(key) => keys
            .get(key)
            .map(Uuid::to_string)
            .ok_or_else(|| anyhow::anyhow!("unknown record key '@{}'", key)),
        None => Ok(text.to_string()),
    }
}
