use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{impl_record, RecordKind};

/// An experiment run on a strain; `end_date` never precedes `start_date`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Experiment {
    pub id: Uuid,
    pub strain_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub growth_medium: String,
    pub results: String,
    pub created_by: Uuid,
}

impl_record!(Experiment, RecordKind::Experiment);
