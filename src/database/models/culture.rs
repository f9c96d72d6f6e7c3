use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{impl_record, RecordKind};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Culture {
    pub id: Uuid,
    pub project_id: Uuid,
    pub planning_date: NaiveDate,
    pub results: String,
    pub created_by: Uuid,
}

impl_record!(Culture, RecordKind::Culture);
