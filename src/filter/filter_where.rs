use sqlx::{QueryBuilder, Sqlite};

use super::types::{ListFilter, ListSpec};

pub struct FilterWhere;

impl FilterWhere {
    /// Appends the WHERE clause for `filter`, if any. Matching on names is
    /// a case-insensitive substring test.
    pub fn push<'a>(builder: &mut QueryBuilder<'a, Sqlite>, spec: &ListSpec, filter: &ListFilter) {
        match filter {
            ListFilter::Unfiltered => {}
            ListFilter::NameContains(needle) => {
                builder.push(format!(" WHERE instr(lower({}), lower(", spec.name_column()));
                builder.push_bind(needle.clone());
                builder.push(")) > 0");
            }
            ListFilter::DateRange { from, to } => {
                builder.push(format!(" WHERE t.{} BETWEEN ", spec.date_column));
                builder.push_bind(*from);
                builder.push(" AND ");
                builder.push_bind(*to);
            }
            ListFilter::CreatorContains(needle) => {
                builder.push(" WHERE instr(lower(u.username), lower(");
                builder.push_bind(needle.clone());
                builder.push(")) > 0");
            }
        }
    }
}
