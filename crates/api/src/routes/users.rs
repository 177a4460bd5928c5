//! Profile routes for the signed-in user.

use axum::{extract::State, Json};
use persistence::entities::ProfileEntity;
use persistence::repositories::ProfileRepository;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::CurrentUser;

/// Profile information response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub status: String,
    pub is_super_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ProfileResponse {
    pub(crate) fn from_entity(entity: ProfileEntity, is_super_admin: bool) -> Self {
        Self {
            user_id: entity.user_id.to_string(),
            email: entity.email,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            phone: entity.phone,
            address: entity.address,
            role: entity.role,
            status: entity.status,
            is_super_admin,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for profile updates. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,

    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,
}

/// Get the caller's own profile.
///
/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    let profile = profiles
        .find_by_user_id(current.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::from_entity(
        profile,
        current.is_super_admin,
    )))
}

/// Update the caller's own profile fields.
///
/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());
    let updated = profiles
        .update_fields(
            current.user_id,
            request.display_name.as_deref(),
            request.avatar_url.as_deref(),
            request.phone.as_deref(),
            request.address.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse::from_entity(
        updated,
        current.is_super_admin,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_all_optional() {
        let request: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
        assert!(request.display_name.is_none());
    }

    #[test]
    fn test_update_profile_request_rejects_bad_avatar_url() {
        let request = UpdateProfileRequest {
            display_name: None,
            avatar_url: Some("not a url".to_string()),
            phone: None,
            address: None,
        };
        assert!(request.validate().is_err());
    }
}
