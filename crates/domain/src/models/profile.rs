//! User profile domain models.
//!
//! A profile is the per-user record of role, status and display data. It is
//! separate from the identity record (`users` table): identity answers "who
//! signed in", the profile answers "what may they do". Role transitions go
//! through admin actions only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::role::Role;

/// Account standing of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Active,
    Blocked,
}

impl ProfileStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, ProfileStatus::Blocked)
    }
}

impl FromStr for ProfileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProfileStatus::Active),
            "blocked" => Ok(ProfileStatus::Blocked),
            _ => Err(format!("Unknown profile status: {}", s)),
        }
    }
}

impl std::fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileStatus::Active => write!(f, "active"),
            ProfileStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Per-user role/status/display record. Exactly one per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub status: ProfileStatus,
    /// Admin account that created this profile, when not self-registered.
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn is_blocked(&self) -> bool {
        self.status.is_blocked()
    }
}

/// Self-service profile field updates. Role and status are absent on
/// purpose; those move only through admin actions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileFieldUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileFieldUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ProfileStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&ProfileStatus::Blocked).unwrap(),
            "\"blocked\""
        );
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            ProfileStatus::from_str("active").unwrap(),
            ProfileStatus::Active
        );
        assert_eq!(
            ProfileStatus::from_str("BLOCKED").unwrap(),
            ProfileStatus::Blocked
        );
        assert!(ProfileStatus::from_str("suspended").is_err());
    }

    #[test]
    fn test_is_blocked() {
        assert!(ProfileStatus::Blocked.is_blocked());
        assert!(!ProfileStatus::Active.is_blocked());
    }

    #[test]
    fn test_field_update_is_empty() {
        assert!(ProfileFieldUpdate::default().is_empty());

        let update = ProfileFieldUpdate {
            display_name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
