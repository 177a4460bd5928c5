//! Announcement repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AnnouncementEntity;
use crate::metrics::QueryTimer;

/// Repository for the site-wide announcement singleton.
#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read the announcement, if one has ever been set.
    pub async fn get(&self) -> Result<Option<AnnouncementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_announcement");
        let result = sqlx::query_as::<_, AnnouncementEntity>(
            r#"
            SELECT message, severity, enabled, link_href, updated_by, updated_at
            FROM announcement
            WHERE singleton = TRUE
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set or replace the announcement.
    pub async fn upsert(
        &self,
        message: &str,
        severity: &str,
        enabled: bool,
        link_href: Option<&str>,
        updated_by: Uuid,
    ) -> Result<AnnouncementEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_announcement");
        let result = sqlx::query_as::<_, AnnouncementEntity>(
            r#"
            INSERT INTO announcement (singleton, message, severity, enabled, link_href, updated_by)
            VALUES (TRUE, $1, $2, $3, $4, $5)
            ON CONFLICT (singleton) DO UPDATE
            SET message = EXCLUDED.message,
                severity = EXCLUDED.severity,
                enabled = EXCLUDED.enabled,
                link_href = EXCLUDED.link_href,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING message, severity, enabled, link_href, updated_by, updated_at
            "#,
        )
        .bind(message)
        .bind(severity)
        .bind(enabled)
        .bind(link_href)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: AnnouncementRepository tests require database connection and are covered by integration tests
}
