//! Navigation bar routes. The public site fetches the visible links; the
//! admin area replaces the whole bar at once.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{AuditAction, ResourceType};
use domain::services::AuditLogBuilder;
use persistence::entities::NavLinkEntity;
use persistence::repositories::{NavLinkInput, NavigationRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

const MAX_LINKS: usize = 30;

/// A navigation link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLinkResponse {
    pub id: String,
    pub label: String,
    pub href: String,
    pub position: i32,
    pub visible: bool,
    pub external: bool,
}

impl From<NavLinkEntity> for NavLinkResponse {
    fn from(entity: NavLinkEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            label: entity.label,
            href: entity.href,
            position: entity.position,
            visible: entity.visible,
            external: entity.external,
        }
    }
}

/// A single link in a navigation replacement request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NavLinkRequest {
    #[validate(length(min = 1, max = 50, message = "Label must be 1-50 characters"))]
    pub label: String,

    #[validate(length(min = 1, max = 500, message = "Href must be 1-500 characters"))]
    pub href: String,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default)]
    pub external: bool,
}

fn default_visible() -> bool {
    true
}

/// Request body for replacing the navigation bar. Link order in the array
/// becomes the display order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceNavigationRequest {
    pub links: Vec<NavLinkRequest>,
}

/// Request body for toggling a link's visibility.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVisibilityRequest {
    pub visible: bool,
}

/// Navigation list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub links: Vec<NavLinkResponse>,
}

/// List visible navigation links in display order.
///
/// GET /api/v1/navigation
pub async fn get_navigation(
    State(state): State<AppState>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let links = NavigationRepository::new(state.pool.clone()).list().await?;

    Ok(Json(NavigationResponse {
        links: links
            .into_iter()
            .filter(|link| link.visible)
            .map(Into::into)
            .collect(),
    }))
}

/// List all navigation links, hidden ones included.
///
/// GET /api/v1/admin/navigation
pub async fn list_navigation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<NavigationResponse>, ApiError> {
    require_content_permission(&admin)?;

    let links = NavigationRepository::new(state.pool.clone()).list().await?;

    Ok(Json(NavigationResponse {
        links: links.into_iter().map(Into::into).collect(),
    }))
}

/// Replace the whole navigation bar.
///
/// PUT /api/v1/admin/navigation
pub async fn replace_navigation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<ReplaceNavigationRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    require_content_permission(&admin)?;

    if request.links.len() > MAX_LINKS {
        return Err(ApiError::Validation(format!(
            "Navigation cannot hold more than {MAX_LINKS} links"
        )));
    }
    for link in &request.links {
        link.validate()?;
    }

    let inputs: Vec<NavLinkInput> = request
        .links
        .into_iter()
        .enumerate()
        .map(|(position, link)| NavLinkInput {
            label: link.label,
            href: link.href,
            position: position as i32,
            visible: link.visible,
            external: link.external,
        })
        .collect();

    let links = NavigationRepository::new(state.pool.clone())
        .replace_all(&inputs)
        .await?;

    audit_async(
        &state.pool,
        AuditLogBuilder::user_action(
            admin.user_id,
            AuditAction::NavigationUpdate,
            ResourceType::Navigation,
        )
        .with_change("link_count", None, Some(links.len().to_string()))
        .build(),
    );

    Ok(Json(NavigationResponse {
        links: links.into_iter().map(Into::into).collect(),
    }))
}

/// Show or hide a single link without replacing the bar.
///
/// POST /api/v1/admin/navigation/:id/visibility
pub async fn set_link_visibility(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetVisibilityRequest>,
) -> Result<Json<NavLinkResponse>, ApiError> {
    require_content_permission(&admin)?;

    let link = NavigationRepository::new(state.pool.clone())
        .set_visible(id, request.visible)
        .await?
        .ok_or_else(|| ApiError::NotFound("Navigation link not found".to_string()))?;

    audit_async(
        &state.pool,
        AuditLogBuilder::user_action(
            admin.user_id,
            AuditAction::NavigationUpdate,
            ResourceType::Navigation,
        )
        .on_resource(link.id.to_string())
        .with_change("visible", None, Some(request.visible.to_string()))
        .build(),
    );

    Ok(Json(link.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_link_request_defaults() {
        let link: NavLinkRequest =
            serde_json::from_str(r#"{"label": "Fixtures", "href": "/fixtures"}"#).unwrap();
        assert!(link.validate().is_ok());
        assert!(link.visible);
        assert!(!link.external);
    }

    #[test]
    fn test_nav_link_request_rejects_empty_label() {
        let link: NavLinkRequest =
            serde_json::from_str(r#"{"label": "", "href": "/fixtures"}"#).unwrap();
        assert!(link.validate().is_err());
    }
}
