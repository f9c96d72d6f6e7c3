use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::database::models::{Record, CREATED_BY};

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{ListFilter, ListSpec, Page};

/// One list page query: a record table, its joins and at most one filter
pub struct Filter<'a> {
    spec: &'a ListSpec,
    filter: ListFilter,
}

impl<'a> Filter<'a> {
    pub fn new(spec: &'a ListSpec, filter: ListFilter) -> Self {
        Self { spec, filter }
    }

    fn push_from<'q>(&self, builder: &mut QueryBuilder<'q, Sqlite>) {
        builder.push(format!(
            " FROM {} t JOIN users u ON u.id = t.{}",
            self.spec.kind.table(),
            CREATED_BY
        ));
        if self.spec.via_strain {
            builder.push(" JOIN strains s ON s.id = t.strain_id");
        }
        FilterWhere::push(builder, self.spec, &self.filter);
    }

    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, FilterError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
        self.push_from(&mut builder);

        let (count,) = builder.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(count)
    }

    pub async fn fetch<T: Record>(&self, pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<T>, FilterError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT t.*");
        self.push_from(&mut builder);
        builder.push(" ORDER BY t.id LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder.build_query_as::<T>().fetch_all(pool).await?;
        Ok(rows)
    }

    /// Loads page `number`. Pages past the end are an error, except the
    /// first page of an empty list.
    pub async fn paginate<T: Record>(
        &self,
        pool: &SqlitePool,
        number: i64,
        page_size: i64,
    ) -> Result<Page<T>, FilterError> {
        let page_size = page_size.max(1);
        let total = self.count(pool).await?;
        let num_pages = Page::<T>::count_pages(total, page_size);

        if number < 1 || number > num_pages {
            return Err(FilterError::InvalidPage(number.to_string()));
        }

        let items = self.fetch(pool, page_size, (number - 1) * page_size).await?;
        tracing::debug!(kind = %self.spec.kind, filter = ?self.filter, number, total, "list page loaded");

        Ok(Page {
            items,
            number,
            num_pages,
            total,
            page_size,
            has_next: number < num_pages,
            has_previous: number > 1,
        })
    }
}
