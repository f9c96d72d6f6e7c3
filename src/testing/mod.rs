//! Fixtures for unit tests: a migrated in-memory database and helpers that
//! insert records through the same form path the handlers use.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::config::AppConfig;
use crate::database::models::{RecordKind, User};
use crate::database::service::{self, NewUser};
use crate::database::DatabaseManager;
use crate::forms::{FormData, RecordForm};

/// bcrypt's minimum cost keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

pub const TEST_PASSWORD: &str = "password123";

pub async fn pool() -> SqlitePool {
    DatabaseManager::connect_and_migrate(&AppConfig::testing().database)
        .await
        .expect("failed to open test database")
}

pub async fn user(pool: &SqlitePool, username: &str, is_superuser: bool) -> User {
    let password_hash = hash_password(TEST_PASSWORD, Some(TEST_BCRYPT_COST))
        .await
        .expect("failed to hash test password");

    service::create_user(
        pool,
        NewUser {
            username: username.to_string(),
            password_hash,
            first_name: "Test".to_string(),
            last_name: username.to_string(),
            email: format!("{}@example.com", username),
            is_superuser,
        },
    )
    .await
    .expect("failed to create test user")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

pub async fn create(pool: &SqlitePool, kind: RecordKind, creator: Uuid, pairs: &[(&str, &str)]) -> Uuid {
    let mut data = FormData::new();
    for (field, value) in pairs {
        data.insert(*field, *value);
    }

    RecordForm::new(kind, data)
        .save(pool, creator, None, crate::forms::today())
        .await
        .unwrap_or_else(|e| panic!("failed to create {}: {:?}", kind, e))
}

pub async fn strain(pool: &SqlitePool, creator: Uuid, uin: &str, name: &str, creation_date: &str) -> Uuid {
    create(
        pool,
        RecordKind::Strain,
        creator,
        &[
            ("uin", uin),
            ("name", name),
            ("pedigree", "wild type"),
            ("mutations", "none"),
            ("transformations", "none"),
            ("creation_date", creation_date),
        ],
    )
    .await
}

pub async fn processing(pool: &SqlitePool, creator: Uuid, strain: Uuid) -> Uuid {
    let strain = strain.to_string();
    create(
        pool,
        RecordKind::StrainProcessing,
        creator,
        &[("strain_id", &strain), ("processing_date", "2024-01-05"), ("description", "washed")],
    )
    .await
}

pub async fn identification(pool: &SqlitePool, creator: Uuid, strain: Uuid) -> Uuid {
    let strain = strain.to_string();
    create(
        pool,
        RecordKind::SubstanceIdentification,
        creator,
        &[("strain_id", &strain), ("identification_date", "2024-01-06"), ("results", "ethanol")],
    )
    .await
}

pub async fn experiment(pool: &SqlitePool, creator: Uuid, strain: Uuid, start_date: &str) -> Uuid {
    let strain = strain.to_string();
    create(
        pool,
        RecordKind::Experiment,
        creator,
        &[
            ("strain_id", &strain),
            ("start_date", start_date),
            ("end_date", "2024-12-31"),
            ("growth_medium", "YPD"),
            ("results", "grew well"),
        ],
    )
    .await
}

pub async fn planning(pool: &SqlitePool, creator: Uuid, strain: Uuid, planning_date: &str) -> Uuid {
    let strain = strain.to_string();
    create(
        pool,
        RecordKind::CultivationPlanning,
        creator,
        &[
            ("strain_id", &strain),
            ("planning_date", planning_date),
            ("completion_date", "2024-12-31"),
            ("growth_medium", "LB"),
            ("status", "planned"),
        ],
    )
    .await
}

pub async fn project(pool: &SqlitePool, creator: Uuid, name: &str) -> Uuid {
    create(
        pool,
        RecordKind::Project,
        creator,
        &[("name", name), ("start_date", "2024-01-01"), ("results", "pending")],
    )
    .await
}

pub async fn culture(pool: &SqlitePool, creator: Uuid, project: Uuid) -> Uuid {
    let project = project.to_string();
    create(
        pool,
        RecordKind::Culture,
        creator,
        &[("project_id", &project), ("planning_date", "2024-02-01"), ("results", "inoculated")],
    )
    .await
}
