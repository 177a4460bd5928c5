//! Team roster routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{AuditAction, ResourceType};
use domain::services::audit_helpers;
use persistence::entities::TeamEntity;
use persistence::repositories::TeamRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

/// A club team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub division: Option<String>,
    pub coach: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TeamEntity> for TeamResponse {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            name: entity.name,
            division: entity.division,
            coach: entity.coach,
            photo_url: entity.photo_url,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for creating or updating a team.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Division must be at most 100 characters"))]
    pub division: Option<String>,

    #[validate(length(max = 100, message = "Coach must be at most 100 characters"))]
    pub coach: Option<String>,

    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Team list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamListResponse {
    pub teams: Vec<TeamResponse>,
}

/// List all teams.
///
/// GET /api/v1/teams
pub async fn list_teams(
    State(state): State<AppState>,
) -> Result<Json<TeamListResponse>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone()).list().await?;

    Ok(Json(TeamListResponse {
        teams: teams.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single team.
///
/// GET /api/v1/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = TeamRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Ok(Json(team.into()))
}

/// Create a team.
///
/// POST /api/v1/admin/teams
pub async fn create_team(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<TeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let team = TeamRepository::new(state.pool.clone())
        .create(
            &request.name,
            request.division.as_deref(),
            request.coach.as_deref(),
            request.photo_url.as_deref(),
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentCreate,
            ResourceType::Team,
            team.id,
            &team.name,
        ),
    );

    Ok((StatusCode::CREATED, Json(team.into())))
}

/// Update a team.
///
/// PUT /api/v1/admin/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<TeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let team = TeamRepository::new(state.pool.clone())
        .update(
            id,
            &request.name,
            request.division.as_deref(),
            request.coach.as_deref(),
            request.photo_url.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentUpdate,
            ResourceType::Team,
            team.id,
            &team.name,
        ),
    );

    Ok(Json(team.into()))
}

/// Delete a team.
///
/// DELETE /api/v1/admin/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_content_permission(&admin)?;

    let repo = TeamRepository::new(state.pool.clone());
    let team = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentDelete,
            ResourceType::Team,
            team.id,
            &team.name,
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_request_validation() {
        let request: TeamRequest =
            serde_json::from_str(r#"{"name": "First Team", "division": "Premier"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_team_request_rejects_empty_name() {
        let request: TeamRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
