//! Event repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::event::LayoutOverride;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

/// Repository for scheduled event operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, description, starts_at, ends_at, enabled,
                   layout_overrides, created_by, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All events, soonest start first.
    pub async fn list(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, description, starts_at, ends_at, enabled,
                   layout_overrides, created_by, created_at, updated_at
            FROM events
            ORDER BY starts_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Enabled events whose window contains `now`.
    pub async fn list_current(&self, now: DateTime<Utc>) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_current_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, description, starts_at, ends_at, enabled,
                   layout_overrides, created_by, created_at, updated_at
            FROM events
            WHERE enabled = TRUE AND starts_at <= $1 AND ends_at > $1
            ORDER BY starts_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create an event.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        enabled: bool,
        layout_overrides: &[LayoutOverride],
        created_by: Option<Uuid>,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events
                (name, description, starts_at, ends_at, enabled, layout_overrides, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, starts_at, ends_at, enabled,
                      layout_overrides, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(starts_at)
        .bind(ends_at)
        .bind(enabled)
        .bind(Json(layout_overrides))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an event.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        enabled: bool,
        layout_overrides: &[LayoutOverride],
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET name = $2, description = $3, starts_at = $4, ends_at = $5,
                enabled = $6, layout_overrides = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, starts_at, ends_at, enabled,
                      layout_overrides, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(starts_at)
        .bind(ends_at)
        .bind(enabled)
        .bind(Json(layout_overrides))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: EventRepository tests require database connection and are covered by integration tests
}
