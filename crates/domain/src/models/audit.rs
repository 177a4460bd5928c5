//! Audit log domain models.
//!
//! Audit entries are append-only. They are emitted fire-and-forget from
//! admin actions: a failed audit write is traced, never a barrier to the
//! primary operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Resource types that can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Profile,
    Registry,
    Transfer,
    Layout,
    Event,
    Player,
    Fixture,
    Record,
    Product,
    GalleryItem,
    Team,
    Navigation,
    Announcement,
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profile" => Ok(ResourceType::Profile),
            "registry" => Ok(ResourceType::Registry),
            "transfer" => Ok(ResourceType::Transfer),
            "layout" => Ok(ResourceType::Layout),
            "event" => Ok(ResourceType::Event),
            "player" => Ok(ResourceType::Player),
            "fixture" => Ok(ResourceType::Fixture),
            "record" => Ok(ResourceType::Record),
            "product" => Ok(ResourceType::Product),
            "gallery_item" => Ok(ResourceType::GalleryItem),
            "team" => Ok(ResourceType::Team),
            "navigation" => Ok(ResourceType::Navigation),
            "announcement" => Ok(ResourceType::Announcement),
            _ => Err(format!("Unknown resource type: {}", s)),
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceType::Profile => "profile",
            ResourceType::Registry => "registry",
            ResourceType::Transfer => "transfer",
            ResourceType::Layout => "layout",
            ResourceType::Event => "event",
            ResourceType::Player => "player",
            ResourceType::Fixture => "fixture",
            ResourceType::Record => "record",
            ResourceType::Product => "product",
            ResourceType::GalleryItem => "gallery_item",
            ResourceType::Team => "team",
            ResourceType::Navigation => "navigation",
            ResourceType::Announcement => "announcement",
        };
        write!(f, "{}", s)
    }
}

/// Audited actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // Profile / role actions
    UserCreate,
    UserBlock,
    UserUnblock,
    RoleGrant,
    RoleRevoke,

    // Super Admin transfer handshake
    TransferCreate,
    TransferAccept,
    TransferComplete,
    TransferCancel,
    RegistryBootstrap,

    // Layouts and events
    LayoutCreate,
    LayoutUpdate,
    LayoutDelete,
    LayoutActivate,
    EventCreate,
    EventUpdate,
    EventDelete,

    // Content rows
    ContentCreate,
    ContentUpdate,
    ContentDelete,
    NavigationUpdate,
    AnnouncementUpdate,
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user_create" => Ok(AuditAction::UserCreate),
            "user_block" => Ok(AuditAction::UserBlock),
            "user_unblock" => Ok(AuditAction::UserUnblock),
            "role_grant" => Ok(AuditAction::RoleGrant),
            "role_revoke" => Ok(AuditAction::RoleRevoke),
            "transfer_create" => Ok(AuditAction::TransferCreate),
            "transfer_accept" => Ok(AuditAction::TransferAccept),
            "transfer_complete" => Ok(AuditAction::TransferComplete),
            "transfer_cancel" => Ok(AuditAction::TransferCancel),
            "registry_bootstrap" => Ok(AuditAction::RegistryBootstrap),
            "layout_create" => Ok(AuditAction::LayoutCreate),
            "layout_update" => Ok(AuditAction::LayoutUpdate),
            "layout_delete" => Ok(AuditAction::LayoutDelete),
            "layout_activate" => Ok(AuditAction::LayoutActivate),
            "event_create" => Ok(AuditAction::EventCreate),
            "event_update" => Ok(AuditAction::EventUpdate),
            "event_delete" => Ok(AuditAction::EventDelete),
            "content_create" => Ok(AuditAction::ContentCreate),
            "content_update" => Ok(AuditAction::ContentUpdate),
            "content_delete" => Ok(AuditAction::ContentDelete),
            "navigation_update" => Ok(AuditAction::NavigationUpdate),
            "announcement_update" => Ok(AuditAction::AnnouncementUpdate),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditAction::UserCreate => "user_create",
            AuditAction::UserBlock => "user_block",
            AuditAction::UserUnblock => "user_unblock",
            AuditAction::RoleGrant => "role_grant",
            AuditAction::RoleRevoke => "role_revoke",
            AuditAction::TransferCreate => "transfer_create",
            AuditAction::TransferAccept => "transfer_accept",
            AuditAction::TransferComplete => "transfer_complete",
            AuditAction::TransferCancel => "transfer_cancel",
            AuditAction::RegistryBootstrap => "registry_bootstrap",
            AuditAction::LayoutCreate => "layout_create",
            AuditAction::LayoutUpdate => "layout_update",
            AuditAction::LayoutDelete => "layout_delete",
            AuditAction::LayoutActivate => "layout_activate",
            AuditAction::EventCreate => "event_create",
            AuditAction::EventUpdate => "event_update",
            AuditAction::EventDelete => "event_delete",
            AuditAction::ContentCreate => "content_create",
            AuditAction::ContentUpdate => "content_update",
            AuditAction::ContentDelete => "content_delete",
            AuditAction::NavigationUpdate => "navigation_update",
            AuditAction::AnnouncementUpdate => "announcement_update",
        };
        write!(f, "{}", s)
    }
}

/// Before/after values for a single changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Option<JsonValue>,
    pub new: Option<JsonValue>,
}

impl FieldChange {
    pub fn new(old: Option<JsonValue>, new: Option<JsonValue>) -> Self {
        Self { old, new }
    }
}

/// Input for creating an audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogInput {
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub changes: Option<HashMap<String, FieldChange>>,
}

impl CreateAuditLogInput {
    pub fn new(action: AuditAction, resource_type: ResourceType) -> Self {
        Self {
            actor_id: None,
            actor_email: None,
            action,
            resource_type,
            resource_id: None,
            resource_name: None,
            changes: None,
        }
    }
}

/// A persisted audit entry as read back for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub changes: Option<HashMap<String, FieldChange>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display_from_str_roundtrip() {
        for action in [
            AuditAction::UserCreate,
            AuditAction::RoleGrant,
            AuditAction::TransferComplete,
            AuditAction::LayoutActivate,
            AuditAction::AnnouncementUpdate,
        ] {
            let s = action.to_string();
            assert_eq!(AuditAction::from_str(&s).unwrap(), action);
        }
    }

    #[test]
    fn test_resource_type_roundtrip() {
        for rt in [
            ResourceType::Profile,
            ResourceType::Registry,
            ResourceType::Transfer,
            ResourceType::GalleryItem,
        ] {
            let s = rt.to_string();
            assert_eq!(ResourceType::from_str(&s).unwrap(), rt);
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(AuditAction::from_str("device_wipe").is_err());
    }

    #[test]
    fn test_field_change_serialization() {
        let change = FieldChange::new(
            Some(serde_json::json!("user")),
            Some(serde_json::json!("admin")),
        );
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["old"], "user");
        assert_eq!(json["new"], "admin");
    }
}
