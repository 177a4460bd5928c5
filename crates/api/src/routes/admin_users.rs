//! Back-office user management routes.
//!
//! Listing and block/unblock need admin-area access; granting and
//! revoking the admin role is Super Admin only and re-verified against
//! the registry inside the service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::{AdminUser, SuperAdminUser};
use crate::routes::users::ProfileResponse;
use crate::services::AdminService;
use persistence::entities::ProfileEntity;
use persistence::repositories::{ProfileRepository, SuperAdminRegistryRepository};

const DEFAULT_PER_PAGE: i64 = 50;
const MAX_PER_PAGE: i64 = 200;

/// Query parameters for listing users.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Paginated user list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<ProfileResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Request body for granting the admin role.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
}

fn profile_response(entity: ProfileEntity, super_admin_id: Option<Uuid>) -> ProfileResponse {
    let is_super_admin = super_admin_id == Some(entity.user_id);
    ProfileResponse::from_entity(entity, is_super_admin)
}

/// List user profiles, paginated.
///
/// The listing is bounded by the same read timeout the sign-in path
/// uses, but here an expiry surfaces as a Timeout error instead of
/// degrading.
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let offset = (page - 1) * per_page;

    let profiles = ProfileRepository::new(state.pool.clone());
    let registry = SuperAdminRegistryRepository::new(state.pool.clone());

    let read_timeout =
        std::time::Duration::from_millis(state.config.auth.profile_read_timeout_ms);

    let listing = tokio::time::timeout(read_timeout, async {
        let users = profiles.list(per_page, offset).await?;
        let total = profiles.count().await?;
        let holder = registry.get().await?.map(|r| r.user_id);
        Ok::<_, sqlx::Error>((users, total, holder))
    })
    .await
    .map_err(|_| ApiError::Timeout("User listing timed out".to_string()))?;

    let (users, total, holder) = listing?;

    Ok(Json(UserListResponse {
        users: users
            .into_iter()
            .map(|u| profile_response(u, holder))
            .collect(),
        total,
        page,
        per_page,
    }))
}

/// Grant the admin role by email.
///
/// POST /api/v1/admin/users/admins
pub async fn create_admin(
    State(state): State<AppState>,
    SuperAdminUser(actor): SuperAdminUser,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    request.validate()?;

    let service = AdminService::new(state.pool.clone());
    let profile = service
        .create_admin(actor.user_id, &request.email, request.display_name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse::from_entity(profile, false)),
    ))
}

/// Revoke the admin role.
///
/// DELETE /api/v1/admin/users/admins/:user_id
pub async fn remove_admin(
    State(state): State<AppState>,
    SuperAdminUser(actor): SuperAdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let service = AdminService::new(state.pool.clone());
    let profile = service.remove_admin(actor.user_id, user_id).await?;

    Ok(Json(ProfileResponse::from_entity(
        profile, false,
    )))
}

/// Block a user. The Super Admin can never be blocked.
///
/// POST /api/v1/admin/users/:user_id/block
pub async fn block_user(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let service = AdminService::new(state.pool.clone());
    let profile = service.block_user(actor.user_id, user_id).await?;

    Ok(Json(ProfileResponse::from_entity(
        profile, false,
    )))
}

/// Lift a user's block.
///
/// POST /api/v1/admin/users/:user_id/unblock
pub async fn unblock_user(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let service = AdminService::new(state.pool.clone());
    let profile = service.unblock_user(actor.user_id, user_id).await?;

    Ok(Json(ProfileResponse::from_entity(
        profile, false,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_admin_request_requires_email() {
        let request = CreateAdminRequest {
            email: "coach@club.example".to_string(),
            display_name: Some("Head Coach".to_string()),
        };
        assert!(request.validate().is_ok());

        let request = CreateAdminRequest {
            email: "nope".to_string(),
            display_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_query_deserializes_camel_case() {
        let query: ListUsersQuery =
            serde_json::from_str(r#"{"page": 2, "perPage": 25}"#).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(25));
    }
}
