use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Record, CREATED_BY};

/// Typed reads and deletes for one record table
pub struct Repository<T> {
    pool: SqlitePool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Record> Repository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn table() -> &'static str {
        T::KIND.table()
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", Self::table());
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn select_by_creator(&self, user_id: Uuid) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE {} = ? ORDER BY id", Self::table(), CREATED_BY);
        let rows = sqlx::query_as::<_, T>(&sql).bind(user_id).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn select_one(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", Self::table());
        let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()))
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", Self::table());
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Deletes one row; dependents go with it through the foreign keys
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", Self::table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Record not found".to_string()));
        }
        tracing::info!(kind = %T::KIND, %id, "record deleted");
        Ok(())
    }
}
