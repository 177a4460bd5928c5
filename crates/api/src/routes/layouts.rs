//! Layout management and public layout resolution.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{AuditAction, Permission, Section, ThemeConfig};
use domain::services::{audit_helpers, ResolutionSource};
use persistence::entities::LayoutEntity;
use persistence::repositories::LayoutRepository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_layout_activated;
use crate::middleware::rbac::AdminUser;
use crate::routes::audit_async;
use crate::services::LayoutService;

/// A stored layout as returned to the back office.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub id: String,
    pub page: String,
    pub name: String,
    pub active: bool,
    pub sections: Vec<Section>,
    pub theme: ThemeConfig,
    pub version: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<LayoutEntity> for LayoutResponse {
    fn from(entity: LayoutEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            page: entity.page,
            name: entity.name,
            active: entity.active,
            sections: entity.sections.0,
            theme: entity.theme.0,
            version: entity.version,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing layouts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLayoutsQuery {
    pub page: String,
}

/// Request body for creating a layout draft.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLayoutRequest {
    #[validate(length(min = 1, max = 50, message = "Page must be 1-50 characters"))]
    pub page: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub sections: Vec<Section>,
    pub theme: ThemeConfig,
}

/// Request body for updating a layout.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLayoutRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub sections: Vec<Section>,
    pub theme: ThemeConfig,
}

/// Layout list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutListResponse {
    pub layouts: Vec<LayoutResponse>,
}

/// The resolved layout for a public page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayoutResponse {
    pub layout: LayoutResponse,
    /// "event_override" or "active"
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub css_variables: BTreeMap<String, String>,
}

fn require_layout_permission(admin: &crate::middleware::rbac::CurrentUser) -> Result<(), ApiError> {
    if admin.has_permission(Permission::ManageLayouts) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Layout management requires elevated permissions".to_string(),
        ))
    }
}

/// List the layouts stored for a page, newest first.
///
/// GET /api/v1/admin/layouts
pub async fn list_layouts(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListLayoutsQuery>,
) -> Result<Json<LayoutListResponse>, ApiError> {
    let layouts = LayoutRepository::new(state.pool.clone())
        .list_by_page(&query.page)
        .await?;

    Ok(Json(LayoutListResponse {
        layouts: layouts.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single layout.
///
/// GET /api/v1/admin/layouts/:id
pub async fn get_layout(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LayoutResponse>, ApiError> {
    let layout = LayoutRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Layout not found".to_string()))?;

    Ok(Json(layout.into()))
}

/// Create an inactive layout draft.
///
/// POST /api/v1/admin/layouts
pub async fn create_layout(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateLayoutRequest>,
) -> Result<(StatusCode, Json<LayoutResponse>), ApiError> {
    require_layout_permission(&admin)?;
    request.validate()?;

    let layout = LayoutRepository::new(state.pool.clone())
        .create(
            &request.page,
            &request.name,
            &request.sections,
            &request.theme,
            Some(admin.user_id),
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::layout_changed(
            admin.user_id,
            AuditAction::LayoutCreate,
            layout.id,
            &layout.name,
        ),
    );

    Ok((StatusCode::CREATED, Json(layout.into())))
}

/// Update a layout's name, sections and theme.
///
/// PUT /api/v1/admin/layouts/:id
pub async fn update_layout(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLayoutRequest>,
) -> Result<Json<LayoutResponse>, ApiError> {
    require_layout_permission(&admin)?;
    request.validate()?;

    let layout = LayoutRepository::new(state.pool.clone())
        .update(id, &request.name, &request.sections, &request.theme)
        .await?
        .ok_or_else(|| ApiError::NotFound("Layout not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::layout_changed(
            admin.user_id,
            AuditAction::LayoutUpdate,
            layout.id,
            &layout.name,
        ),
    );

    Ok(Json(layout.into()))
}

/// Activate a layout for its page, deactivating any sibling.
///
/// POST /api/v1/admin/layouts/:id/activate
pub async fn activate_layout(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LayoutResponse>, ApiError> {
    require_layout_permission(&admin)?;

    let layout = LayoutRepository::new(state.pool.clone())
        .activate(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Layout not found".to_string()))?;

    record_layout_activated(&layout.page);
    audit_async(
        &state.pool,
        audit_helpers::layout_activated(admin.user_id, layout.id, &layout.page, layout.version),
    );

    Ok(Json(layout.into()))
}

/// Delete an inactive layout. The active layout of a page cannot be
/// deleted; activate a replacement first.
///
/// DELETE /api/v1/admin/layouts/:id
pub async fn delete_layout(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_layout_permission(&admin)?;

    let repo = LayoutRepository::new(state.pool.clone());
    let layout = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Layout not found".to_string()))?;

    if layout.active {
        return Err(ApiError::Conflict(
            "Cannot delete the active layout".to_string(),
        ));
    }

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::layout_changed(
            admin.user_id,
            AuditAction::LayoutDelete,
            layout.id,
            &layout.name,
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the layout a public page should render right now.
///
/// A current event override wins over the page's active layout. 404
/// when neither exists; the frontend falls back to its static default.
///
/// GET /api/v1/pages/:page/layout
pub async fn resolve_page_layout(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Json<ResolvedLayoutResponse>, ApiError> {
    let resolved = LayoutService::new(state.pool.clone())
        .active_layout_for_page(&page)
        .await?
        .ok_or_else(|| ApiError::NotFound("No layout configured for page".to_string()))?;

    let source = match resolved.source {
        ResolutionSource::EventOverride => "event_override",
        ResolutionSource::Active => "active",
    };

    let layout = resolved.layout;
    Ok(Json(ResolvedLayoutResponse {
        layout: LayoutResponse {
            id: layout.id.to_string(),
            page: layout.page,
            name: layout.name,
            active: layout.active,
            sections: layout.sections,
            theme: layout.theme,
            version: layout.version,
            created_at: layout.created_at.to_rfc3339(),
            updated_at: layout.updated_at.to_rfc3339(),
        },
        source: source.to_string(),
        event_id: resolved.event_id.map(|id| id.to_string()),
        css_variables: resolved.css_variables,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout_request_deserializes_sections() {
        let body = r##"{
            "page": "home",
            "name": "Matchday",
            "sections": [
                {
                    "id": "hero-1",
                    "order": 1,
                    "visible": true,
                    "type": "hero",
                    "title": "Derby Day"
                }
            ],
            "theme": {
                "name": "club",
                "colors": {
                    "primary": "#003366", "secondary": "#ffffff", "accent": "#ffcc00",
                    "dark": "#001a33", "light": "#f5f5f5", "success": "#2e7d32",
                    "warning": "#f9a825", "error": "#c62828",
                    "text": {"primary": "#111111", "secondary": "#444444", "muted": "#888888"}
                },
                "typography": {
                    "font_heading": "Oswald", "font_body": "Inter", "font_mono": "JetBrains Mono",
                    "size_sm": "0.875rem", "size_base": "1rem", "size_lg": "1.25rem",
                    "weight_normal": 400, "weight_medium": 500, "weight_bold": 700
                },
                "animation": {
                    "style": "subtle", "duration_fast_ms": 120, "duration_base_ms": 240,
                    "duration_slow_ms": 480, "easing": "ease-out"
                },
                "spacing_sm": "0.5rem", "spacing_base": "1rem", "spacing_lg": "2rem"
            }
        }"##;

        let request: CreateLayoutRequest = serde_json::from_str(body).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.sections.len(), 1);
        assert_eq!(request.theme.colors.primary, "#003366");
    }
}
