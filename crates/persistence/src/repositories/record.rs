//! Club record repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RecordEntity;
use crate::metrics::QueryTimer;

/// Repository for club record book operations.
#[derive(Clone)]
pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a record entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_record_by_id");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            SELECT id, category, title, holder, value, achieved_on, notes,
                   created_at, updated_at
            FROM records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List record entries, optionally by category, most recent first.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<RecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_records");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            SELECT id, category, title, holder, value, achieved_on, notes,
                   created_at, updated_at
            FROM records
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY achieved_on DESC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a record entry.
    pub async fn create(
        &self,
        category: &str,
        title: &str,
        holder: &str,
        value: &str,
        achieved_on: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<RecordEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_record");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            INSERT INTO records (category, title, holder, value, achieved_on, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, category, title, holder, value, achieved_on, notes,
                      created_at, updated_at
            "#,
        )
        .bind(category)
        .bind(title)
        .bind(holder)
        .bind(value)
        .bind(achieved_on)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a record entry.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        category: &str,
        title: &str,
        holder: &str,
        value: &str,
        achieved_on: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Option<RecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_record");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            UPDATE records
            SET category = $2, title = $3, holder = $4, value = $5,
                achieved_on = $6, notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, category, title, holder, value, achieved_on, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(category)
        .bind(title)
        .bind(holder)
        .bind(value)
        .bind(achieved_on)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a record entry. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_record");
        let result = sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: RecordRepository tests require database connection and are covered by integration tests
}
