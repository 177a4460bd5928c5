//! Club shop product routes. The shop is a showcase; purchasing happens
//! off-platform, so products carry a price and a stock flag but no
//! checkout flow.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{AuditAction, ResourceType};
use domain::services::audit_helpers;
use persistence::entities::ProductEntity;
use persistence::repositories::ProductRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

/// A shop product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor units (e.g. cents)
    pub price_minor: i64,
    pub currency: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub in_stock: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductEntity> for ProductResponse {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            name: entity.name,
            description: entity.description,
            price_minor: entity.price_minor,
            currency: entity.currency,
            image_url: entity.image_url,
            category: entity.category,
            featured: entity.featured,
            in_stock: entity.in_stock,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub featured_only: bool,
}

/// Request body for creating or updating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_minor: i64,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

/// Product list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
}

/// List products, featured first.
///
/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = ProductRepository::new(state.pool.clone())
        .list(query.category.as_deref(), query.featured_only)
        .await?;

    Ok(Json(ProductListResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single product.
///
/// GET /api/v1/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = ProductRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product.into()))
}

/// Create a product.
///
/// POST /api/v1/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let product = ProductRepository::new(state.pool.clone())
        .create(
            &request.name,
            request.description.as_deref(),
            request.price_minor,
            &request.currency,
            request.image_url.as_deref(),
            request.category.as_deref(),
            request.featured,
            request.in_stock,
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentCreate,
            ResourceType::Product,
            product.id,
            &product.name,
        ),
    );

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Update a product.
///
/// PUT /api/v1/admin/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let product = ProductRepository::new(state.pool.clone())
        .update(
            id,
            &request.name,
            request.description.as_deref(),
            request.price_minor,
            &request.currency,
            request.image_url.as_deref(),
            request.category.as_deref(),
            request.featured,
            request.in_stock,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentUpdate,
            ResourceType::Product,
            product.id,
            &product.name,
        ),
    );

    Ok(Json(product.into()))
}

/// Delete a product.
///
/// DELETE /api/v1/admin/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_content_permission(&admin)?;

    let repo = ProductRepository::new(state.pool.clone());
    let product = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentDelete,
            ResourceType::Product,
            product.id,
            &product.name,
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_request_validation() {
        let request: ProductRequest = serde_json::from_str(
            r#"{"name": "Home Shirt 2026", "priceMinor": 7999, "currency": "EUR"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.in_stock);
        assert!(!request.featured);
    }

    #[test]
    fn test_product_request_rejects_negative_price() {
        let request: ProductRequest = serde_json::from_str(
            r#"{"name": "Home Shirt 2026", "priceMinor": -1, "currency": "EUR"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_product_request_rejects_long_currency() {
        let request: ProductRequest = serde_json::from_str(
            r#"{"name": "Home Shirt 2026", "priceMinor": 100, "currency": "EURO"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
