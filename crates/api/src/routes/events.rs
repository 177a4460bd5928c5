//! Scheduled event routes (layout overrides for matchdays, cup runs,
//! anniversaries).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::event::{EventConfig, LayoutOverride};
use domain::models::{AuditAction, Permission};
use domain::services::audit_helpers;
use persistence::entities::EventEntity;
use persistence::repositories::EventRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::{AdminUser, CurrentUser};
use crate::routes::audit_async;

/// An event as returned to the back office.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub starts_at: String,
    pub ends_at: String,
    pub enabled: bool,
    pub layout_overrides: Vec<LayoutOverride>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EventEntity> for EventResponse {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            name: entity.name,
            description: entity.description,
            starts_at: entity.starts_at.to_rfc3339(),
            ends_at: entity.ends_at.to_rfc3339(),
            enabled: entity.enabled,
            layout_overrides: entity.layout_overrides.0,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for creating or updating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub layout_overrides: Vec<LayoutOverride>,
}

fn default_enabled() -> bool {
    true
}

/// Event list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
}

fn require_event_permission(admin: &CurrentUser) -> Result<(), ApiError> {
    if admin.has_permission(Permission::ManageLayouts) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Event management requires elevated permissions".to_string(),
        ))
    }
}

fn validate_window(request: &EventRequest) -> Result<(), ApiError> {
    EventConfig::validate_window(&request.name, request.starts_at, request.ends_at)
        .map_err(|e| ApiError::Validation(e.to_string()))
}

/// List all events, upcoming first.
///
/// GET /api/v1/admin/events
pub async fn list_events(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<EventListResponse>, ApiError> {
    let events = EventRepository::new(state.pool.clone()).list().await?;

    Ok(Json(EventListResponse {
        events: events.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single event.
///
/// GET /api/v1/admin/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = EventRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(event.into()))
}

/// Create an event.
///
/// POST /api/v1/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    require_event_permission(&admin)?;
    request.validate()?;
    validate_window(&request)?;

    let event = EventRepository::new(state.pool.clone())
        .create(
            &request.name,
            request.description.as_deref(),
            request.starts_at,
            request.ends_at,
            request.enabled,
            &request.layout_overrides,
            Some(admin.user_id),
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::event_changed(admin.user_id, AuditAction::EventCreate, event.id, &event.name),
    );

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Update an event.
///
/// PUT /api/v1/admin/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    require_event_permission(&admin)?;
    request.validate()?;
    validate_window(&request)?;

    let event = EventRepository::new(state.pool.clone())
        .update(
            id,
            &request.name,
            request.description.as_deref(),
            request.starts_at,
            request.ends_at,
            request.enabled,
            &request.layout_overrides,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::event_changed(admin.user_id, AuditAction::EventUpdate, event.id, &event.name),
    );

    Ok(Json(event.into()))
}

/// Delete an event.
///
/// DELETE /api/v1/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_event_permission(&admin)?;

    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::event_changed(admin.user_id, AuditAction::EventDelete, event.id, &event.name),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_request_rejects_inverted_window() {
        let request: EventRequest = serde_json::from_str(
            r#"{
                "name": "Cup Final Week",
                "startsAt": "2026-05-20T00:00:00Z",
                "endsAt": "2026-05-10T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());
        assert!(validate_window(&request).is_err());
    }

    #[test]
    fn test_event_request_defaults() {
        let request: EventRequest = serde_json::from_str(
            r#"{
                "name": "Cup Final Week",
                "startsAt": "2026-05-10T00:00:00Z",
                "endsAt": "2026-05-20T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert!(request.enabled);
        assert!(request.layout_overrides.is_empty());
    }
}
