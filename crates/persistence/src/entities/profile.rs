//! User profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ProfileStatus, Role};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the profiles table.
///
/// The role column here is presentation data. Super Admin checks always go
/// through the registry, never through this field.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for domain::models::UserProfile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            user_id: entity.user_id,
            email: entity.email,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            phone: entity.phone,
            address: entity.address,
            role: Role::from_str(&entity.role).unwrap_or(Role::User), // Default fallback
            status: ProfileStatus::from_str(&entity.status).unwrap_or(ProfileStatus::Active),
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
