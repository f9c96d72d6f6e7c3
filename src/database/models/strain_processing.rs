use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{impl_record, RecordKind};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StrainProcessing {
    pub id: Uuid,
    pub strain_id: Uuid,
    pub processing_date: NaiveDate,
    pub description: String,
    pub created_by: Uuid,
}

impl_record!(StrainProcessing, RecordKind::StrainProcessing);
