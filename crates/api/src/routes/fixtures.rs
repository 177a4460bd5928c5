//! Fixture and result routes.
//!
//! Reads are public. A fixture whose kickoff is older than the edit-lock
//! window can no longer be modified or deleted; corrections past that
//! point go through a data migration, not the API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::content::is_edit_locked;
use domain::models::{AuditAction, ResourceType};
use domain::services::audit_helpers;
use persistence::entities::FixtureEntity;
use persistence::repositories::FixtureRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;
use crate::routes::{audit_async, require_content_permission};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// A fixture with its result, when played.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureResponse {
    pub id: String,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff_at: String,
    pub venue: Option<String>,
    pub status: String,
    pub home_score: Option<i16>,
    pub away_score: Option<i16>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<FixtureEntity> for FixtureResponse {
    fn from(entity: FixtureEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            competition: entity.competition,
            home_team: entity.home_team,
            away_team: entity.away_team,
            kickoff_at: entity.kickoff_at.to_rfc3339(),
            venue: entity.venue,
            status: entity.status,
            home_score: entity.home_score,
            away_score: entity.away_score,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for listing fixtures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFixturesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for creating a fixture.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFixtureRequest {
    #[validate(length(min = 1, max = 100, message = "Competition must be 1-100 characters"))]
    pub competition: String,

    #[validate(length(min = 1, max = 100, message = "Home team must be 1-100 characters"))]
    pub home_team: String,

    #[validate(length(min = 1, max = 100, message = "Away team must be 1-100 characters"))]
    pub away_team: String,

    pub kickoff_at: DateTime<Utc>,

    #[validate(length(max = 200, message = "Venue must be at most 200 characters"))]
    pub venue: Option<String>,

    #[serde(default = "default_status")]
    pub status: String,
}

/// Request body for updating a fixture, including its result.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFixtureRequest {
    #[validate(length(min = 1, max = 100, message = "Competition must be 1-100 characters"))]
    pub competition: String,

    #[validate(length(min = 1, max = 100, message = "Home team must be 1-100 characters"))]
    pub home_team: String,

    #[validate(length(min = 1, max = 100, message = "Away team must be 1-100 characters"))]
    pub away_team: String,

    pub kickoff_at: DateTime<Utc>,

    #[validate(length(max = 200, message = "Venue must be at most 200 characters"))]
    pub venue: Option<String>,

    pub status: String,

    #[validate(range(min = 0, max = 99, message = "Score must be 0-99"))]
    pub home_score: Option<i16>,

    #[validate(range(min = 0, max = 99, message = "Score must be 0-99"))]
    pub away_score: Option<i16>,
}

fn default_status() -> String {
    "scheduled".to_string()
}

/// Fixture list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureListResponse {
    pub fixtures: Vec<FixtureResponse>,
}

fn check_edit_lock(fixture: &FixtureEntity, lock_days: i64) -> Result<(), ApiError> {
    if is_edit_locked(fixture.kickoff_at, Utc::now(), lock_days) {
        return Err(ApiError::Locked(
            "Fixture is past its edit window".to_string(),
        ));
    }
    Ok(())
}

/// List fixtures, soonest kickoff first.
///
/// GET /api/v1/fixtures
pub async fn list_fixtures(
    State(state): State<AppState>,
    Query(query): Query<ListFixturesQuery>,
) -> Result<Json<FixtureListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let fixtures = FixtureRepository::new(state.pool.clone())
        .list(limit, offset)
        .await?;

    Ok(Json(FixtureListResponse {
        fixtures: fixtures.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single fixture.
///
/// GET /api/v1/fixtures/:id
pub async fn get_fixture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FixtureResponse>, ApiError> {
    let fixture = FixtureRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fixture not found".to_string()))?;

    Ok(Json(fixture.into()))
}

/// Create a fixture.
///
/// POST /api/v1/admin/fixtures
pub async fn create_fixture(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateFixtureRequest>,
) -> Result<(StatusCode, Json<FixtureResponse>), ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let fixture = FixtureRepository::new(state.pool.clone())
        .create(
            &request.competition,
            &request.home_team,
            &request.away_team,
            request.kickoff_at,
            request.venue.as_deref(),
            &request.status,
        )
        .await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentCreate,
            ResourceType::Fixture,
            fixture.id,
            &format!("{} vs {}", fixture.home_team, fixture.away_team),
        ),
    );

    Ok((StatusCode::CREATED, Json(fixture.into())))
}

/// Update a fixture, including recording its result.
///
/// PUT /api/v1/admin/fixtures/:id
pub async fn update_fixture(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFixtureRequest>,
) -> Result<Json<FixtureResponse>, ApiError> {
    require_content_permission(&admin)?;
    request.validate()?;

    let repo = FixtureRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fixture not found".to_string()))?;
    check_edit_lock(&existing, state.config.content.edit_lock_days)?;

    let fixture = repo
        .update(
            id,
            &request.competition,
            &request.home_team,
            &request.away_team,
            request.kickoff_at,
            request.venue.as_deref(),
            &request.status,
            request.home_score,
            request.away_score,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Fixture not found".to_string()))?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentUpdate,
            ResourceType::Fixture,
            fixture.id,
            &format!("{} vs {}", fixture.home_team, fixture.away_team),
        ),
    );

    Ok(Json(fixture.into()))
}

/// Delete a fixture. Locked fixtures are refused like edits are.
///
/// DELETE /api/v1/admin/fixtures/:id
pub async fn delete_fixture(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_content_permission(&admin)?;

    let repo = FixtureRepository::new(state.pool.clone());
    let fixture = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fixture not found".to_string()))?;
    check_edit_lock(&fixture, state.config.content.edit_lock_days)?;

    repo.delete(id).await?;

    audit_async(
        &state.pool,
        audit_helpers::content_changed(
            admin.user_id,
            AuditAction::ContentDelete,
            ResourceType::Fixture,
            fixture.id,
            &format!("{} vs {}", fixture.home_team, fixture.away_team),
        ),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixture(kickoff_at: DateTime<Utc>) -> FixtureEntity {
        FixtureEntity {
            id: Uuid::new_v4(),
            competition: "League".to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            kickoff_at,
            venue: None,
            status: "finished".to_string(),
            home_score: Some(2),
            away_score: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_edit_lock_rejects_old_fixture() {
        let old = fixture(Utc::now() - Duration::days(16));
        let result = check_edit_lock(&old, 15);
        assert!(matches!(result, Err(ApiError::Locked(_))));
    }

    #[test]
    fn test_edit_lock_allows_recent_fixture() {
        let recent = fixture(Utc::now() - Duration::days(3));
        assert!(check_edit_lock(&recent, 15).is_ok());
    }

    #[test]
    fn test_create_fixture_request_defaults_status() {
        let request: CreateFixtureRequest = serde_json::from_str(
            r#"{
                "competition": "League",
                "homeTeam": "Home",
                "awayTeam": "Away",
                "kickoffAt": "2026-09-12T15:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(request.status, "scheduled");
    }
}
