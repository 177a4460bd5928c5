//! Gallery repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GalleryItemEntity;
use crate::metrics::QueryTimer;

/// Repository for media gallery operations.
#[derive(Clone)]
pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a gallery item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GalleryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gallery_item_by_id");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            SELECT id, title, media_url, thumbnail_url, album, taken_at,
                   created_at, updated_at
            FROM gallery_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List gallery items, optionally by album, newest first.
    pub async fn list(
        &self,
        album: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GalleryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_gallery_items");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            SELECT id, title, media_url, thumbnail_url, album, taken_at,
                   created_at, updated_at
            FROM gallery_items
            WHERE ($1::text IS NULL OR album = $1)
            ORDER BY COALESCE(taken_at, created_at) DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(album)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a gallery item.
    pub async fn create(
        &self,
        title: Option<&str>,
        media_url: &str,
        thumbnail_url: Option<&str>,
        album: Option<&str>,
        taken_at: Option<DateTime<Utc>>,
    ) -> Result<GalleryItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_gallery_item");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            INSERT INTO gallery_items (title, media_url, thumbnail_url, album, taken_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, media_url, thumbnail_url, album, taken_at,
                      created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(media_url)
        .bind(thumbnail_url)
        .bind(album)
        .bind(taken_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a gallery item.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        media_url: &str,
        thumbnail_url: Option<&str>,
        album: Option<&str>,
        taken_at: Option<DateTime<Utc>>,
    ) -> Result<Option<GalleryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_gallery_item");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            UPDATE gallery_items
            SET title = $2, media_url = $3, thumbnail_url = $4, album = $5,
                taken_at = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, media_url, thumbnail_url, album, taken_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(media_url)
        .bind(thumbnail_url)
        .bind(album)
        .bind(taken_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a gallery item. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_gallery_item");
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: GalleryRepository tests require database connection and are covered by integration tests
}
