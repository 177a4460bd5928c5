//! Navigation repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NavLinkEntity;
use crate::metrics::QueryTimer;

/// Input row for replacing the navigation bar.
#[derive(Debug, Clone)]
pub struct NavLinkInput {
    pub label: String,
    pub href: String,
    pub position: i32,
    pub visible: bool,
    pub external: bool,
}

/// Repository for site navigation links.
#[derive(Clone)]
pub struct NavigationRepository {
    pool: PgPool,
}

impl NavigationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All navigation links in display order.
    pub async fn list(&self) -> Result<Vec<NavLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_nav_links");
        let result = sqlx::query_as::<_, NavLinkEntity>(
            r#"
            SELECT id, label, href, position, visible, external
            FROM nav_links
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the whole navigation bar in one transaction. The bar is a
    /// small ordered set; wholesale replacement is simpler and safer than
    /// per-row diffing.
    pub async fn replace_all(
        &self,
        links: &[NavLinkInput],
    ) -> Result<Vec<NavLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("replace_nav_links");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM nav_links").execute(&mut *tx).await?;

        let mut inserted = Vec::with_capacity(links.len());
        for link in links {
            let entity = sqlx::query_as::<_, NavLinkEntity>(
                r#"
                INSERT INTO nav_links (label, href, position, visible, external)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, label, href, position, visible, external
                "#,
            )
            .bind(&link.label)
            .bind(&link.href)
            .bind(link.position)
            .bind(link.visible)
            .bind(link.external)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(entity);
        }

        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    /// Toggle a single link's visibility.
    pub async fn set_visible(
        &self,
        id: Uuid,
        visible: bool,
    ) -> Result<Option<NavLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_nav_link_visible");
        let result = sqlx::query_as::<_, NavLinkEntity>(
            r#"
            UPDATE nav_links
            SET visible = $2
            WHERE id = $1
            RETURNING id, label, href, position, visible, external
            "#,
        )
        .bind(id)
        .bind(visible)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: NavigationRepository tests require database connection and are covered by integration tests
}
