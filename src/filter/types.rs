use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::RecordKind;
use crate::forms::validators;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Name,
    Date,
    CreatedBy,
}

impl SearchType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SearchType::Name),
            "date" => Some(SearchType::Date),
            "created_by" => Some(SearchType::CreatedBy),
            _ => None,
        }
    }
}

/// Query string accepted by the list pages. Everything stays a raw string
/// so the page can echo back exactly what was submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search_type: String,
    pub q: String,
    pub date_from: String,
    pub date_to: String,
    pub created_by: String,
    #[serde(skip_serializing)]
    pub page: Option<String>,
}

impl ListQuery {
    /// The one filter the parameters select. Missing or unusable
    /// parameters fall back to the unfiltered list.
    pub fn filter(&self) -> ListFilter {
        let non_blank = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());

        match SearchType::parse(self.search_type.trim()) {
            Some(SearchType::Name) => non_blank(&self.q).map(ListFilter::NameContains),
            Some(SearchType::Date) => {
                let from = validators::parse_date(self.date_from.trim()).ok();
                let to = validators::parse_date(self.date_to.trim()).ok();
                from.zip(to).map(|(from, to)| ListFilter::DateRange { from, to })
            }
            Some(SearchType::CreatedBy) => non_blank(&self.created_by).map(ListFilter::CreatorContains),
            None => None,
        }
        .unwrap_or(ListFilter::Unfiltered)
    }

    /// 1-based page number; absent or blank means the first page
    pub fn page_number(&self) -> Result<i64, FilterError> {
        let raw = match self.page.as_deref().map(str::trim) {
            None | Some("") => return Ok(1),
            Some(raw) => raw,
        };

        match raw.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(FilterError::InvalidPage(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    Unfiltered,
    NameContains(String),
    DateRange { from: NaiveDate, to: NaiveDate },
    CreatorContains(String),
}

/// Which table a list page reads and which columns its filters target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSpec {
    pub kind: RecordKind,
    pub date_column: &'static str,
    /// Name filtering goes through the referenced strain
    pub via_strain: bool,
}

impl ListSpec {
    pub fn name_column(&self) -> &'static str {
        if self.via_strain {
            "s.name"
        } else {
            "t.name"
        }
    }
}

pub const STRAIN_LIST: ListSpec = ListSpec {
    kind: RecordKind::Strain,
    date_column: "creation_date",
    via_strain: false,
};

pub const PLANNING_LIST: ListSpec = ListSpec {
    kind: RecordKind::CultivationPlanning,
    date_column: "planning_date",
    via_strain: true,
};

pub const EXPERIMENT_LIST: ListSpec = ListSpec {
    kind: RecordKind::Experiment,
    date_column: "start_date",
    via_strain: true,
};

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub page_size: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Page count for `total` rows; an empty set still has one page
    pub fn count_pages(total: i64, page_size: i64) -> i64 {
        let page_size = page_size.max(1);
        ((total + page_size - 1) / page_size).max(1)
    }
}
