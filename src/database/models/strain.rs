use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{impl_record, RecordKind};

/// A cataloged strain with its pedigree, mutation and transformation notes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Strain {
    pub id: Uuid,
    pub uin: String,
    pub name: String,
    pub pedigree: String,
    pub mutations: String,
    pub transformations: String,
    pub creation_date: NaiveDate,
    pub created_by: Uuid,
}

impl_record!(Strain, RecordKind::Strain);
