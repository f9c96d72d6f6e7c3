//! Record types and the static tables describing them.
//!
//! `RecordKind` is the single name-to-type registry: URL segments, chooser
//! names, table names, display fields and the field tables that drive
//! validation and the generic write path all hang off it.

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow};
use uuid::Uuid;

pub mod cultivation_planning;
pub mod culture;
pub mod experiment;
pub mod project;
pub mod session;
pub mod strain;
pub mod strain_processing;
pub mod substance_identification;
pub mod user;

pub use cultivation_planning::CultivationPlanning;
pub use culture::Culture;
pub use experiment::Experiment;
pub use project::Project;
pub use session::Session;
pub use strain::Strain;
pub use strain_processing::StrainProcessing;
pub use substance_identification::SubstanceIdentification;
pub use user::User;

/// Column holding the creator reference on every record table
pub const CREATED_BY: &str = "created_by";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Strain,
    StrainProcessing,
    SubstanceIdentification,
    Experiment,
    CultivationPlanning,
    Project,
    Culture,
}

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        RecordKind::Strain,
        RecordKind::StrainProcessing,
        RecordKind::SubstanceIdentification,
        RecordKind::Experiment,
        RecordKind::CultivationPlanning,
        RecordKind::Project,
        RecordKind::Culture,
    ];

    /// Name shown by the model chooser and used in its URLs
    pub fn model_name(self) -> &'static str {
        match self {
            RecordKind::Strain => "Strains",
            RecordKind::StrainProcessing => "StrainProcessing",
            RecordKind::SubstanceIdentification => "SubstanceIdentification",
            RecordKind::Experiment => "Experiments",
            RecordKind::CultivationPlanning => "CultivationPlanning",
            RecordKind::Project => "Projects",
            RecordKind::Culture => "Cultures",
        }
    }

    pub fn from_model_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.model_name() == name)
    }

    /// Key used by the create-any-record page
    pub fn form_key(self) -> &'static str {
        match self {
            RecordKind::Strain => "strains",
            RecordKind::StrainProcessing => "strainprocessing",
            RecordKind::SubstanceIdentification => "substanceidentification",
            RecordKind::Experiment => "experiments",
            RecordKind::CultivationPlanning => "cultivationplanning",
            RecordKind::Project => "projects",
            RecordKind::Culture => "cultures",
        }
    }

    pub fn from_form_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.form_key() == key)
    }

    /// Collection segment under `/api/`
    pub fn resource(self) -> &'static str {
        self.table()
    }

    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Strain => "strains",
            RecordKind::StrainProcessing => "strain_processing",
            RecordKind::SubstanceIdentification => "substance_identification",
            RecordKind::Experiment => "experiments",
            RecordKind::CultivationPlanning => "cultivation_planning",
            RecordKind::Project => "projects",
            RecordKind::Culture => "cultures",
        }
    }

    /// Column used to label records in the object chooser
    pub fn display_field(self) -> &'static str {
        match self {
            RecordKind::Strain => "uin",
            RecordKind::StrainProcessing => "description",
            RecordKind::SubstanceIdentification => "results",
            RecordKind::Experiment => "results",
            RecordKind::CultivationPlanning => "status",
            RecordKind::Project => "name",
            RecordKind::Culture => "id",
        }
    }

    /// Writable fields, in column order. The creator is never among them.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            RecordKind::Strain => STRAIN_FIELDS,
            RecordKind::StrainProcessing => STRAIN_PROCESSING_FIELDS,
            RecordKind::SubstanceIdentification => SUBSTANCE_IDENTIFICATION_FIELDS,
            RecordKind::Experiment => EXPERIMENT_FIELDS,
            RecordKind::CultivationPlanning => CULTIVATION_PLANNING_FIELDS,
            RecordKind::Project => PROJECT_FIELDS,
            RecordKind::Culture => CULTURE_FIELDS,
        }
    }

    /// Date pairs whose end must not precede their start
    pub fn date_orders(self) -> &'static [DateOrder] {
        match self {
            RecordKind::Experiment | RecordKind::Project => &[DateOrder { start: "start_date", end: "end_date" }],
            RecordKind::CultivationPlanning => &[DateOrder { start: "planning_date", end: "completion_date" }],
            _ => &[],
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text { max_length: Option<usize> },
    Date { not_future: bool },
    Reference { to: RecordKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn text(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Text { max_length: None }, required: true }
    }

    const fn char(name: &'static str, max_length: usize) -> Self {
        Self { name, kind: FieldKind::Text { max_length: Some(max_length) }, required: true }
    }

    const fn past_date(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Date { not_future: true }, required: true }
    }

    const fn date(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Date { not_future: false }, required: true }
    }

    const fn reference(name: &'static str, to: RecordKind) -> Self {
        Self { name, kind: FieldKind::Reference { to }, required: true }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateOrder {
    pub start: &'static str,
    pub end: &'static str,
}

const MAX_255: usize = 255;
const MAX_50: usize = 50;

const STRAIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::char("uin", MAX_255),
    FieldSpec::char("name", MAX_255),
    FieldSpec::text("pedigree"),
    FieldSpec::text("mutations"),
    FieldSpec::text("transformations"),
    FieldSpec::past_date("creation_date"),
];

const STRAIN_PROCESSING_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("strain_id", RecordKind::Strain),
    FieldSpec::past_date("processing_date"),
    FieldSpec::text("description"),
];

const SUBSTANCE_IDENTIFICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("strain_id", RecordKind::Strain),
    FieldSpec::past_date("identification_date"),
    FieldSpec::text("results"),
];

const EXPERIMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("strain_id", RecordKind::Strain),
    FieldSpec::past_date("start_date"),
    FieldSpec::date("end_date"),
    FieldSpec::text("growth_medium"),
    FieldSpec::text("results"),
];

const CULTIVATION_PLANNING_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("strain_id", RecordKind::Strain),
    FieldSpec::past_date("planning_date"),
    FieldSpec::date("completion_date"),
    FieldSpec::text("growth_medium"),
    FieldSpec::text("status"),
];

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::char("name", MAX_50),
    FieldSpec::past_date("start_date"),
    FieldSpec::date("end_date").optional(),
    FieldSpec::text("results"),
];

const CULTURE_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("project_id", RecordKind::Project),
    FieldSpec::past_date("planning_date"),
    FieldSpec::text("results"),
];

/// A row of one of the seven record tables
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + 'static {
    const KIND: RecordKind;

    fn id(&self) -> Uuid;

    fn created_by(&self) -> Uuid;
}

macro_rules! impl_record {
    ($ty:ty, $kind:expr) => {
        impl $crate::database::models::Record for $ty {
            const KIND: $crate::database::models::RecordKind = $kind;

            fn id(&self) -> uuid::Uuid {
                self.id
            }

            fn created_by(&self) -> uuid::Uuid {
                self.created_by
            }
        }
    };
}

pub(crate) use impl_record;
