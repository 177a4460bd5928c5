//! Club record book routes.
//!
//! Same edit-lock policy as fixtures: a record achieved longer ago than
//! the lock window is frozen against edits and deletion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::content::is_edit_locked;
use domain::models::{AuditAction, ResourceType};
use domain::services::audit_helpers;
use persistence::entities::RecordEntity;
use persistence::repositories::RecordRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

/// A record book entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: String,
    pub category: String,
    pub title: String,
    pub holder: String,
    pub value: String,
    pub achieved_on: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RecordEntity> for RecordResponse {
    fn from(entity: RecordEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            category: entity.category,
            title: entity.title,
            holder: entity.holder,
            value: entity.value,
            achieved_on: entity.achieved_on.to_rfc3339(),
            notes: entity.notes,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsQuery {
    pub category: Option<String>,
}

/// Request body for creating or updating a record entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 100, message = "Holder must be 1-100 characters"))]
    pub holder: String,

    #[validate(length(min = 1, max = 100, message = "Value must be 1-100 characters"))]
    pub value: String,

    pub achieved_on: DateTime<Utc>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// Record list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListResponse {
    pub records: Vec<RecordResponse>,
}

fn check_edit_lock(record: &RecordEntity, lock_days: i64) -> Result<(), ApiError> {
    if is_edit_locked(record.achieved_on, Utc::now(), lock_days) {
        return Err(ApiError::Locked(
            "Record is past its edit window".to_string(),
        ));
    }
    Ok(())
}

/// List record entries, optionally by category.
///
/// GET /api/v1/records
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<RecordListResponse>, ApiError> {
    let records = RecordRepository::new(state.pool.clone())
        .list(query.category.as_deref())
        .await?;

    Ok(Json(RecordListResponse {
        records: records.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single record entry.
///
/// GET /api/v1/records/:id
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = RecordRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;

    Ok(Json(record.into()))
}

/// Create a record entry.
///
/// POST /api/v1/admin/records
pub async fn create_record(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<RecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let record = RecordRepository::new(state.pool.clone())
        .create(
            &request.category,
            &request.title,
            &request.holder,
            &request.value,
            request.achieved_on,
            request.notes.as_deref(),
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentCreate,
            ResourceType::Record,
            record.id,
            &record.title,
        ),
    );

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Update a record entry.
///
/// PUT /api/v1/admin/records/:id
pub async fn update_record(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let repo = RecordRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;
    check_edit_lock(&existing, state.config.content.edit_lock_days)?;

    let record = repo
        .update(
            id,
            &request.category,
            &request.title,
            &request.holder,
            &request.value,
            request.achieved_on,
            request.notes.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentUpdate,
            ResourceType::Record,
            record.id,
            &record.title,
        ),
    );

    Ok(Json(record.into()))
}

/// Delete a record entry. Locked entries are refused like edits are.
///
/// DELETE /api/v1/admin/records/:id
pub async fn delete_record(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_content_permission(&admin)?;

    let repo = RecordRepository::new(state.pool.clone());
    let record = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;
    check_edit_lock(&record, state.config.content.edit_lock_days)?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentDelete,
            ResourceType::Record,
            record.id,
            &record.title,
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(achieved_on: DateTime<Utc>) -> RecordEntity {
        RecordEntity {
            id: Uuid::new_v4(),
            category: "appearances".to_string(),
            title: "Most appearances".to_string(),
            holder: "Club Legend".to_string(),
            value: "612".to_string(),
            achieved_on,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_edit_lock_rejects_old_record() {
        let old = record(Utc::now() - Duration::days(30));
        assert!(matches!(
            check_edit_lock(&old, 15),
            Err(ApiError::Locked(_))
        ));
    }

    #[test]
    fn test_edit_lock_allows_recent_record() {
        let recent = record(Utc::now() - Duration::days(1));
        assert!(check_edit_lock(&recent, 15).is_ok());
    }
}
