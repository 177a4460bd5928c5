//! Player roster routes. Reads are public, mutations are admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{AuditAction, ResourceType};
use domain::services::audit_helpers;
use persistence::entities::PlayerEntity;
use persistence::repositories::PlayerRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

/// A roster player.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: String,
    pub name: String,
    pub jersey_number: i16,
    pub position: String,
    pub team_id: Option<String>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PlayerEntity> for PlayerResponse {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            name: entity.name,
            jersey_number: entity.jersey_number,
            position: entity.position,
            team_id: entity.team_id.map(|id| id.to_string()),
            photo_url: entity.photo_url,
            bio: entity.bio,
            active: entity.active,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing players.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlayersQuery {
    pub team_id: Option<Uuid>,
}

/// Request body for creating a player.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 99, message = "Jersey number must be 0-99"))]
    pub jersey_number: i16,

    #[validate(length(min = 1, max = 30, message = "Position must be 1-30 characters"))]
    pub position: String,

    pub team_id: Option<Uuid>,

    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

/// Request body for updating a player.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 99, message = "Jersey number must be 0-99"))]
    pub jersey_number: i16,

    #[validate(length(min = 1, max = 30, message = "Position must be 1-30 characters"))]
    pub position: String,

    pub team_id: Option<Uuid>,

    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,

    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Player list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub players: Vec<PlayerResponse>,
}

/// List players, optionally filtered by team.
///
/// GET /api/v1/players
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<ListPlayersQuery>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let players = PlayerRepository::new(state.pool.clone())
        .list(query.team_id)
        .await?;

    Ok(Json(PlayerListResponse {
        players: players.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single player.
///
/// GET /api/v1/players/:id
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = PlayerRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    Ok(Json(player.into()))
}

/// Create a player.
///
/// POST /api/v1/admin/players
pub async fn create_player(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let player = PlayerRepository::new(state.pool.clone())
        .create(
            &request.name,
            request.jersey_number,
            &request.position,
            request.team_id,
            request.photo_url.as_deref(),
            request.bio.as_deref(),
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentCreate,
            ResourceType::Player,
            player.id,
            &player.name,
        ),
    );

    Ok((StatusCode::CREATED, Json(player.into())))
}

/// Update a player.
///
/// PUT /api/v1/admin/players/:id
pub async fn update_player(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let player = PlayerRepository::new(state.pool.clone())
        .update(
            id,
            &request.name,
            request.jersey_number,
            &request.position,
            request.team_id,
            request.photo_url.as_deref(),
            request.bio.as_deref(),
            request.active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentUpdate,
            ResourceType::Player,
            player.id,
            &player.name,
        ),
    );

    Ok(Json(player.into()))
}

/// Delete a player.
///
/// DELETE /api/v1/admin/players/:id
pub async fn delete_player(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_content_permission(&admin)?;

    let repo = PlayerRepository::new(state.pool.clone());
    let player = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentDelete,
            ResourceType::Player,
            player.id,
            &player.name,
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_player_request_validation() {
        let request: CreatePlayerRequest = serde_json::from_str(
            r#"{"name": "Jan Kowalski", "jerseyNumber": 9, "position": "Forward"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_player_request_rejects_bad_jersey_number() {
        let request: CreatePlayerRequest = serde_json::from_str(
            r#"{"name": "Jan Kowalski", "jerseyNumber": 120, "position": "Forward"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
