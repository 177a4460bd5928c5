//! Photo and video gallery routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::{AuditAction, ResourceType};
use domain::services::audit_helpers;
use persistence::entities::GalleryItemEntity;
use persistence::repositories::GalleryRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// A gallery item (photo or video).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemResponse {
    pub id: String,
    pub title: Option<String>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub album: Option<String>,
    pub taken_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GalleryItemEntity> for GalleryItemResponse {
    fn from(entity: GalleryItemEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            title: entity.title,
            media_url: entity.media_url,
            thumbnail_url: entity.thumbnail_url,
            album: entity.album,
            taken_at: entity.taken_at.map(|t| t.to_rfc3339()),
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing gallery items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGalleryQuery {
    pub album: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for creating or updating a gallery item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(url(message = "Media URL must be a valid URL"))]
    pub media_url: String,

    #[validate(url(message = "Thumbnail URL must be a valid URL"))]
    pub thumbnail_url: Option<String>,

    #[validate(length(max = 100, message = "Album must be at most 100 characters"))]
    pub album: Option<String>,

    pub taken_at: Option<DateTime<Utc>>,
}

/// Gallery list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryListResponse {
    pub items: Vec<GalleryItemResponse>,
}

fn item_name(item: &GalleryItemEntity) -> &str {
    item.title.as_deref().unwrap_or(&item.media_url)
}

/// List gallery items, newest first, optionally filtered by album.
///
/// GET /api/v1/gallery
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<ListGalleryQuery>,
) -> Result<Json<GalleryListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let items = GalleryRepository::new(state.pool.clone())
        .list(query.album.as_deref(), limit, offset)
        .await?;

    Ok(Json(GalleryListResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single gallery item.
///
/// GET /api/v1/gallery/:id
pub async fn get_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    let item = GalleryRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery item not found".to_string()))?;

    Ok(Json(item.into()))
}

/// Add a gallery item.
///
/// POST /api/v1/admin/gallery
pub async fn create_gallery_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<GalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItemResponse>), ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let item = GalleryRepository::new(state.pool.clone())
        .create(
            request.title.as_deref(),
            &request.media_url,
            request.thumbnail_url.as_deref(),
            request.album.as_deref(),
            request.taken_at,
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentCreate,
            ResourceType::GalleryItem,
            item.id,
            item_name(&item),
        ),
    );

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Update a gallery item.
///
/// PUT /api/v1/admin/gallery/:id
pub async fn update_gallery_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<GalleryItemRequest>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let item = GalleryRepository::new(state.pool.clone())
        .update(
            id,
            request.title.as_deref(),
            &request.media_url,
            request.thumbnail_url.as_deref(),
            request.album.as_deref(),
            request.taken_at,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery item not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentUpdate,
            ResourceType::GalleryItem,
            item.id,
            item_name(&item),
        ),
    );

    Ok(Json(item.into()))
}

/// Delete a gallery item.
///
/// DELETE /api/v1/admin/gallery/:id
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_content_permission(&admin)?;

    let repo = GalleryRepository::new(state.pool.clone());
    let item = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery item not found".to_string()))?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentDelete,
            ResourceType::GalleryItem,
            item.id,
            item_name(&item),
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_request_validation() {
        let request: GalleryItemRequest = serde_json::from_str(
            r#"{"title": "Cup final", "mediaUrl": "https://cdn.example.com/final.jpg"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_gallery_request_rejects_invalid_url() {
        let request: GalleryItemRequest =
            serde_json::from_str(r#"{"mediaUrl": "not a url"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListGalleryQuery = serde_json::from_str("{}").unwrap();
        assert!(query.album.is_none());
        assert!(query.limit.is_none());
    }
}
