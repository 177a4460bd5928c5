//! Site-wide announcement banner routes. A single announcement exists at
//! most, shown across the public site while enabled.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use domain::models::AnnouncementSeverity;
use domain::services::audit_helpers;
use persistence::entities::AnnouncementEntity;
use persistence::repositories::AnnouncementRepository;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

/// The announcement banner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub message: String,
    pub severity: String,
    pub enabled: bool,
    pub link_href: Option<String>,
    pub updated_at: String,
}

impl From<AnnouncementEntity> for AnnouncementResponse {
    fn from(entity: AnnouncementEntity) -> Self {
        Self {
            message: entity.message,
            severity: entity.severity,
            enabled: entity.enabled,
            link_href: entity.link_href,
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for setting the announcement.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 500, message = "Message must be 1-500 characters"))]
    pub message: String,

    pub severity: AnnouncementSeverity,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[validate(length(max = 500, message = "Link must be at most 500 characters"))]
    pub link_href: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn severity_str(severity: AnnouncementSeverity) -> &'static str {
    match severity {
        AnnouncementSeverity::Info => "info",
        AnnouncementSeverity::Warning => "warning",
        AnnouncementSeverity::Critical => "critical",
    }
}

/// Fetch the current announcement. 204 when no announcement is set or the
/// banner is disabled.
///
/// GET /api/v1/announcement
pub async fn get_announcement(
    State(state): State<AppState>,
) -> Result<axum::response::Response, ApiError> {
    use axum::response::IntoResponse;

    let announcement = AnnouncementRepository::new(state.pool.clone()).get().await?;

    match announcement {
        Some(entity) if entity.enabled => {
            Ok(Json(AnnouncementResponse::from(entity)).into_response())
        }
        _ => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Fetch the announcement including its disabled state.
///
/// GET /api/v1/admin/announcement
pub async fn get_announcement_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Option<AnnouncementResponse>>, ApiError> {
    require_content_permission(&admin)?;

    let announcement = AnnouncementRepository::new(state.pool.clone()).get().await?;

    Ok(Json(announcement.map(Into::into)))
}

/// Set or replace the announcement.
///
/// PUT /api/v1/admin/announcement
pub async fn update_announcement(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<AnnouncementResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let announcement = AnnouncementRepository::new(state.pool.clone())
        .upsert(
            &request.message,
            severity_str(request.severity),
            request.enabled,
            request.link_href.as_deref(),
            admin.user_id,
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::announcement_updated(admin.user_id, &announcement.message),
    );

    Ok(Json(announcement.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_parses_severity() {
        let request: UpdateAnnouncementRequest = serde_json::from_str(
            r#"{"message": "Ground closed this weekend", "severity": "warning"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.severity, AnnouncementSeverity::Warning);
        assert!(request.enabled);
    }

    #[test]
    fn test_update_request_rejects_unknown_severity() {
        let result: Result<UpdateAnnouncementRequest, _> = serde_json::from_str(
            r#"{"message": "Hello", "severity": "urgent"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_severity_str() {
        assert_eq!(severity_str(AnnouncementSeverity::Critical), "critical");
    }
}
