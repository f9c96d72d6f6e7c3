use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{impl_record, RecordKind};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubstanceIdentification {
    pub id: Uuid,
    pub strain_id: Uuid,
    pub identification_date: NaiveDate,
    pub results: String,
    pub created_by: Uuid,
}

impl_record!(SubstanceIdentification, RecordKind::SubstanceIdentification);
