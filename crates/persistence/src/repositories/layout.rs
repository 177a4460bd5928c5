//! Layout repository for database operations.

use domain::models::{Section, ThemeConfig};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::LayoutEntity;
use crate::metrics::QueryTimer;

/// Repository for page layout operations.
#[derive(Clone)]
pub struct LayoutRepository {
    pool: PgPool,
}

impl LayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a layout by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_layout_by_id");
        let result = sqlx::query_as::<_, LayoutEntity>(
            r#"
            SELECT id, page, name, active, sections, theme, version,
                   created_by, created_at, updated_at
            FROM layouts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All layouts stored for a page, most recently created first.
    pub async fn list_by_page(&self, page: &str) -> Result<Vec<LayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_layouts_by_page");
        let result = sqlx::query_as::<_, LayoutEntity>(
            r#"
            SELECT id, page, name, active, sections, theme, version,
                   created_by, created_at, updated_at
            FROM layouts
            WHERE page = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(page)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The active layout for a page. When historical data holds several
    /// active rows, the most recently created one wins; an edit to an
    /// older row does not reorder them.
    pub async fn find_active_by_page(
        &self,
        page: &str,
    ) -> Result<Option<LayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_layout");
        let result = sqlx::query_as::<_, LayoutEntity>(
            r#"
            SELECT id, page, name, active, sections, theme, version,
                   created_by, created_at, updated_at
            FROM layouts
            WHERE page = $1 AND active = TRUE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(page)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a layout draft (inactive, version 1).
    pub async fn create(
        &self,
        page: &str,
        name: &str,
        sections: &[Section],
        theme: &ThemeConfig,
        created_by: Option<Uuid>,
    ) -> Result<LayoutEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_layout");
        let result = sqlx::query_as::<_, LayoutEntity>(
            r#"
            INSERT INTO layouts (page, name, active, sections, theme, version, created_by)
            VALUES ($1, $2, FALSE, $3, $4, 1, $5)
            RETURNING id, page, name, active, sections, theme, version,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(page)
        .bind(name)
        .bind(Json(sections))
        .bind(Json(theme))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a layout's name, sections and theme, bumping its version.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        sections: &[Section],
        theme: &ThemeConfig,
    ) -> Result<Option<LayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_layout");
        let result = sqlx::query_as::<_, LayoutEntity>(
            r#"
            UPDATE layouts
            SET name = $2, sections = $3, theme = $4,
                version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, page, name, active, sections, theme, version,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(Json(sections))
        .bind(Json(theme))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Activate a layout for its page.
    ///
    /// Runs in one transaction: every other layout on the same page is
    /// deactivated, then the target is activated with a version bump. No
    /// interleaving can observe a page with two active layouts.
    pub async fn activate(&self, id: Uuid) -> Result<Option<LayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("activate_layout");

        let mut tx = self.pool.begin().await?;

        let page = sqlx::query_scalar::<_, String>(
            "SELECT page FROM layouts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(page) = page else {
            timer.record();
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE layouts
            SET active = FALSE, updated_at = NOW()
            WHERE page = $1 AND active = TRUE AND id <> $2
            "#,
        )
        .bind(&page)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let activated = sqlx::query_as::<_, LayoutEntity>(
            r#"
            UPDATE layouts
            SET active = TRUE, version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, page, name, active, sections, theme, version,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(activated))
    }

    /// Delete a layout. Returns false when no row matched. Active layouts
    /// are refused at the service layer before reaching here.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_layout");
        let result = sqlx::query("DELETE FROM layouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: LayoutRepository tests require database connection and are covered by integration tests
}
