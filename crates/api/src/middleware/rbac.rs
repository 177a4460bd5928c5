//! Role-Based Access Control (RBAC) extractors for back-office routes.
//!
//! Admin routes load the caller's profile and check permissions per
//! request. Super Admin status always comes from the registry row, not
//! from the profile's role column.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use domain::models::{Permission, ProfileStatus, Role};
use persistence::repositories::{ProfileRepository, SuperAdminRegistryRepository};
use std::str::FromStr;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// Caller identity resolved against the database, passed to handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The caller's email, from the profile row.
    pub email: String,
    /// Role from the profile row. Presentation-level only for SuperAdmin.
    pub role: Role,
    /// Whether the registry row names this user. This is the only
    /// authoritative Super Admin signal.
    pub is_super_admin: bool,
}

impl CurrentUser {
    /// Effective role for permission checks. A registry holder acts as
    /// SuperAdmin even if the profile row has drifted.
    pub fn effective_role(&self) -> Role {
        if self.is_super_admin {
            Role::SuperAdmin
        } else {
            // A profile claiming super_admin without the registry row is
            // demoted to admin-level permissions at most.
            match self.role {
                Role::SuperAdmin => Role::Admin,
                role => role,
            }
        }
    }

    /// Check a single permission against the effective role.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.effective_role().has_permission(permission)
    }
}

/// Resolves the caller from JWT plus database state.
///
/// Rejects blocked profiles outright. Does not require any admin
/// permission by itself; see [`AdminUser`] and [`SuperAdminUser`].
#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_auth = UserAuth::from_request_parts(parts, state).await?;

        let profile_repo = ProfileRepository::new(state.pool.clone());
        let profile = profile_repo
            .find_by_user_id(user_auth.user_id)
            .await
            .map_err(|e| {
                tracing::error!("Database error fetching profile: {}", e);
                ApiError::Internal("Failed to load profile".to_string())
            })?
            .ok_or_else(|| ApiError::Unauthorized("Profile not found".to_string()))?;

        let status = ProfileStatus::from_str(&profile.status).unwrap_or(ProfileStatus::Active);
        if status.is_blocked() {
            return Err(ApiError::Forbidden("Account is blocked".to_string()));
        }

        let registry_repo = SuperAdminRegistryRepository::new(state.pool.clone());
        let registry = registry_repo.get().await.map_err(|e| {
            tracing::error!("Database error fetching registry: {}", e);
            ApiError::Internal("Failed to verify registry".to_string())
        })?;

        let is_super_admin = registry
            .map(|r| r.holds(user_auth.user_id))
            .unwrap_or(false);

        Ok(CurrentUser {
            user_id: user_auth.user_id,
            email: profile.email,
            role: Role::from_str(&profile.role).unwrap_or(Role::User),
            is_super_admin,
        })
    }
}

/// Caller guaranteed to hold back-office access.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;

        if !current.has_permission(Permission::ViewAdminArea) {
            return Err(ApiError::Forbidden(
                "Admin area access required".to_string(),
            ));
        }

        Ok(AdminUser(current))
    }
}

/// Caller guaranteed to be the registry holder.
#[derive(Debug, Clone)]
pub struct SuperAdminUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for SuperAdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;

        if !current.is_super_admin {
            return Err(ApiError::Forbidden(
                "Super Admin access required".to_string(),
            ));
        }

        Ok(SuperAdminUser(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(role: Role, is_super_admin: bool) -> CurrentUser {
        CurrentUser {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role,
            is_super_admin,
        }
    }

    #[test]
    fn test_registry_holder_is_super_admin_regardless_of_profile_role() {
        let user = current(Role::User, true);
        assert_eq!(user.effective_role(), Role::SuperAdmin);
        assert!(user.has_permission(Permission::ManageRoles));
    }

    #[test]
    fn test_profile_role_alone_never_grants_super_admin() {
        let user = current(Role::SuperAdmin, false);
        assert_eq!(user.effective_role(), Role::Admin);
        assert!(!user.has_permission(Permission::ManageRoles));
        assert!(user.has_permission(Permission::ViewAdminArea));
    }

    #[test]
    fn test_admin_permissions() {
        let user = current(Role::Admin, false);
        assert!(user.has_permission(Permission::ManageContent));
        assert!(user.has_permission(Permission::ViewAdminArea));
        assert!(!user.has_permission(Permission::ViewAuditLogs));
    }

    #[test]
    fn test_regular_user_has_no_admin_permissions() {
        let user = current(Role::User, false);
        assert!(!user.has_permission(Permission::ViewAdminArea));
        assert!(!user.has_permission(Permission::ManageContent));
    }
}
