//! Record access keyed by `RecordKind` at runtime, for the generic write
//! path and the model chooser. Table and column names only ever come from
//! the static field tables.

use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::{query::Query, Sqlite};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    CultivationPlanning, Culture, Experiment, Project, Record, RecordKind, Strain, StrainProcessing,
    SubstanceIdentification, CREATED_BY,
};
use crate::database::repository::Repository;
use crate::forms::{CleanedData, FieldValue};

pub async fn exists(pool: &SqlitePool, kind: RecordKind, id: Uuid) -> Result<bool, DatabaseError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", kind.table());
    let (found,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(pool).await?;
    Ok(found)
}

/// Inserts a validated record owned by `created_by` and returns its new id
pub async fn insert(pool: &SqlitePool, data: &CleanedData, created_by: Uuid) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    let columns: Vec<&str> = data.values.iter().map(|(name, _)| *name).collect();
    let placeholders = vec!["?"; columns.len() + 2].join(", ");

    let sql = format!(
        "INSERT INTO {} (id, {}, {}) VALUES ({})",
        data.kind.table(),
        columns.join(", "),
        CREATED_BY,
        placeholders
    );

    let mut query = sqlx::query(&sql).bind(id);
    for (_, value) in &data.values {
        query = bind_value(query, value);
    }
    query.bind(created_by).execute(pool).await?;

    Ok(id)
}

/// Overwrites the writable fields of an existing record. The creator column is untouched.
pub async fn update(pool: &SqlitePool, id: Uuid, data: &CleanedData) -> Result<(), DatabaseError> {
    let assignments: Vec<String> = data.values.iter().map(|(name, _)| format!("{} = ?", name)).collect();
    let sql = format!("UPDATE {} SET {} WHERE id = ?", data.kind.table(), assignments.join(", "));

    let mut query = sqlx::query(&sql);
    for (_, value) in &data.values {
        query = bind_value(query, value);
    }
    let result = query.bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Record not found".to_string()));
    }
    Ok(())
}

/// `(id, label)` pairs for the object chooser, ordered by id
pub async fn choices(pool: &SqlitePool, kind: RecordKind) -> Result<Vec<(Uuid, String)>, DatabaseError> {
    let display = kind.display_field();

    if display == "id" {
        let sql = format!("SELECT id FROM {} ORDER BY id", kind.table());
        let rows: Vec<(Uuid,)> = sqlx::query_as(&sql).fetch_all(pool).await?;
        return Ok(rows.into_iter().map(|(id,)| (id, id.to_string())).collect());
    }

    let sql = format!("SELECT id, {} FROM {} ORDER BY id", display, kind.table());
    let rows: Vec<(Uuid, String)> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Loads one record of any kind as its JSON representation
pub async fn fetch_json(pool: &SqlitePool, kind: RecordKind, id: Uuid) -> Result<Option<Value>, DatabaseError> {
    match kind {
        RecordKind::Strain => fetch_as::<Strain>(pool, id).await,
        RecordKind::StrainProcessing => fetch_as::<StrainProcessing>(pool, id).await,
        RecordKind::SubstanceIdentification => fetch_as::<SubstanceIdentification>(pool, id).await,
        RecordKind::Experiment => fetch_as::<Experiment>(pool, id).await,
        RecordKind::CultivationPlanning => fetch_as::<CultivationPlanning>(pool, id).await,
        RecordKind::Project => fetch_as::<Project>(pool, id).await,
        RecordKind::Culture => fetch_as::<Culture>(pool, id).await,
    }
}

async fn fetch_as<T: Record>(pool: &SqlitePool, id: Uuid) -> Result<Option<Value>, DatabaseError> {
    let record = Repository::<T>::new(pool.clone()).select_one(id).await?;
    Ok(record.and_then(|r| serde_json::to_value(r).ok()))
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q FieldValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        FieldValue::Text(text) => query.bind(text.as_str()),
        FieldValue::Date(date) => query.bind(*date),
        FieldValue::Reference(id) => query.bind(*id),
        FieldValue::Null => query.bind(Option::<String>::None),
    }
}
