use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{impl_record, RecordKind};

/// A growth plan for a strain; `completion_date` never precedes `planning_date`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CultivationPlanning {
    pub id: Uuid,
    pub strain_id: Uuid,
    pub planning_date: NaiveDate,
    pub completion_date: NaiveDate,
    pub growth_medium: String,
    pub status: String,
    pub created_by: Uuid,
}

impl_record!(CultivationPlanning, RecordKind::CultivationPlanning);
