//! Product repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProductEntity;
use crate::metrics::QueryTimer;

/// Repository for club store product operations.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a product by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_product_by_id");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT id, name, description, price_minor, currency, image_url,
                   category, featured, in_stock, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List products, optionally by category, featured first.
    pub async fn list(
        &self,
        category: Option<&str>,
        featured_only: bool,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_products");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT id, name, description, price_minor, currency, image_url,
                   category, featured, in_stock, created_at, updated_at
            FROM products
            WHERE ($1::text IS NULL OR category = $1)
              AND (NOT $2 OR featured = TRUE)
            ORDER BY featured DESC, created_at DESC
            "#,
        )
        .bind(category)
        .bind(featured_only)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a product.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price_minor: i64,
        currency: &str,
        image_url: Option<&str>,
        category: Option<&str>,
        featured: bool,
        in_stock: bool,
    ) -> Result<ProductEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_product");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            INSERT INTO products
                (name, description, price_minor, currency, image_url, category, featured, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, price_minor, currency, image_url,
                      category, featured, in_stock, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price_minor)
        .bind(currency)
        .bind(image_url)
        .bind(category)
        .bind(featured)
        .bind(in_stock)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a product.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price_minor: i64,
        currency: &str,
        image_url: Option<&str>,
        category: Option<&str>,
        featured: bool,
        in_stock: bool,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_product");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_minor = $4, currency = $5,
                image_url = $6, category = $7, featured = $8, in_stock = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price_minor, currency, image_url,
                      category, featured, in_stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price_minor)
        .bind(currency)
        .bind(image_url)
        .bind(category)
        .bind(featured)
        .bind(in_stock)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a product. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_product");
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: ProductRepository tests require database connection and are covered by integration tests
}
