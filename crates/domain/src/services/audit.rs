//! Audit entry construction for admin actions.
//!
//! Provides convenient helpers for creating audit log entries from route
//! handlers. Persistence is asynchronous so a slow or failed audit write
//! never blocks the originating request.

use crate::models::{AuditAction, CreateAuditLogInput, FieldChange, ResourceType, Role};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// Builder for creating audit log entries with a fluent API.
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
    actor_id: Option<Uuid>,
    actor_email: Option<String>,
    action: AuditAction,
    resource_type: ResourceType,
    resource_id: Option<String>,
    resource_name: Option<String>,
    changes: Option<HashMap<String, FieldChange>>,
}

impl AuditLogBuilder {
    /// Entry attributed to an acting admin.
    pub fn user_action(actor_id: Uuid, action: AuditAction, resource_type: ResourceType) -> Self {
        Self {
            actor_id: Some(actor_id),
            actor_email: None,
            action,
            resource_type,
            resource_id: None,
            resource_name: None,
            changes: None,
        }
    }

    /// Entry with no human actor (bootstrap, scheduled jobs).
    pub fn system_action(action: AuditAction, resource_type: ResourceType) -> Self {
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

    pub fn with_actor_email(mut self, email: impl Into<String>) -> Self {
        self.actor_email = Some(email.into());
        self
    }

    pub fn on_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    /// Add a single field change with string values.
    pub fn with_change(
        mut self,
        field: impl Into<String>,
        old: Option<String>,
        new: Option<String>,
    ) -> Self {
        let changes = self.changes.get_or_insert_with(HashMap::new);
        changes.insert(
            field.into(),
            FieldChange::new(old.map(|v| json!(v)), new.map(|v| json!(v))),
        );
        self
    }

    /// Add a single field change with JSON values.
    pub fn with_json_change(
        mut self,
        field: impl Into<String>,
        old: Option<serde_json::Value>,
        new: Option<serde_json::Value>,
    ) -> Self {
        let changes = self.changes.get_or_insert_with(HashMap::new);
        changes.insert(field.into(), FieldChange::new(old, new));
        self
    }

    pub fn with_changes(mut self, changes: HashMap<String, FieldChange>) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn build(self) -> CreateAuditLogInput {
        let mut input = CreateAuditLogInput::new(self.action, self.resource_type);
        input.actor_id = self.actor_id;
        input.actor_email = self.actor_email;
        input.resource_id = self.resource_id;
        input.resource_name = self.resource_name;
        input.changes = self.changes;
        input
    }
}

/// Convenience functions for common audit log patterns.
pub mod audit_helpers {
    use super::*;

    pub fn user_created(actor_id: Uuid, new_user_id: Uuid, email: &str) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, AuditAction::UserCreate, ResourceType::Profile)
            .on_resource(new_user_id.to_string())
            .with_resource_name(email)
            .build()
    }

    pub fn user_blocked(actor_id: Uuid, target_id: Uuid, email: &str) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, AuditAction::UserBlock, ResourceType::Profile)
            .on_resource(target_id.to_string())
            .with_resource_name(email)
            .with_change("status", Some("active".into()), Some("blocked".into()))
            .build()
    }

    pub fn user_unblocked(actor_id: Uuid, target_id: Uuid, email: &str) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, AuditAction::UserUnblock, ResourceType::Profile)
            .on_resource(target_id.to_string())
            .with_resource_name(email)
            .with_change("status", Some("blocked".into()), Some("active".into()))
            .build()
    }

    pub fn role_changed(
        actor_id: Uuid,
        target_id: Uuid,
        email: &str,
        old_role: Role,
        new_role: Role,
    ) -> CreateAuditLogInput {
        let action = if new_role.priority() > old_role.priority() {
            AuditAction::RoleGrant
        } else {
            AuditAction::RoleRevoke
        };
        AuditLogBuilder::user_action(actor_id, action, ResourceType::Profile)
            .on_resource(target_id.to_string())
            .with_resource_name(email)
            .with_change(
                "role",
                Some(old_role.to_string()),
                Some(new_role.to_string()),
            )
            .build()
    }

    pub fn transfer_created(
        initiator_id: Uuid,
        target_id: Uuid,
        target_email: &str,
    ) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(
            initiator_id,
            AuditAction::TransferCreate,
            ResourceType::Transfer,
        )
        .on_resource(target_id.to_string())
        .with_resource_name(target_email)
        .build()
    }

    pub fn transfer_accepted(target_id: Uuid, target_email: &str) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(
            target_id,
            AuditAction::TransferAccept,
            ResourceType::Transfer,
        )
        .on_resource(target_id.to_string())
        .with_resource_name(target_email)
        .build()
    }

    pub fn transfer_completed(
        initiator_id: Uuid,
        previous_holder: Uuid,
        new_holder: Uuid,
    ) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(
            initiator_id,
            AuditAction::TransferComplete,
            ResourceType::Registry,
        )
        .on_resource(new_holder.to_string())
        .with_change(
            "super_admin",
            Some(previous_holder.to_string()),
            Some(new_holder.to_string()),
        )
        .build()
    }

    pub fn transfer_cancelled(actor_id: Uuid, target_id: Uuid) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(
            actor_id,
            AuditAction::TransferCancel,
            ResourceType::Transfer,
        )
        .on_resource(target_id.to_string())
        .build()
    }

    pub fn layout_activated(
        actor_id: Uuid,
        layout_id: Uuid,
        page: &str,
        version: i32,
    ) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, AuditAction::LayoutActivate, ResourceType::Layout)
            .on_resource(layout_id.to_string())
            .with_resource_name(page)
            .with_change("version", None, Some(version.to_string()))
            .build()
    }

    pub fn layout_changed(
        actor_id: Uuid,
        action: AuditAction,
        layout_id: Uuid,
        name: &str,
    ) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, action, ResourceType::Layout)
            .on_resource(layout_id.to_string())
            .with_resource_name(name)
            .build()
    }

    pub fn event_changed(
        actor_id: Uuid,
        action: AuditAction,
        event_id: Uuid,
        name: &str,
    ) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, action, ResourceType::Event)
            .on_resource(event_id.to_string())
            .with_resource_name(name)
            .build()
    }

    pub fn content_changed(
        actor_id: Uuid,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: Uuid,
        name: &str,
    ) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(actor_id, action, resource_type)
            .on_resource(resource_id.to_string())
            .with_resource_name(name)
            .build()
    }

    pub fn announcement_updated(actor_id: Uuid, message: &str) -> CreateAuditLogInput {
        AuditLogBuilder::user_action(
            actor_id,
            AuditAction::AnnouncementUpdate,
            ResourceType::Announcement,
        )
        .with_change("message", None, Some(message.to_string()))
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_action_builder() {
        let actor = Uuid::new_v4();
        let target = Uuid::new_v4();

        let input = AuditLogBuilder::user_action(actor, AuditAction::UserBlock, ResourceType::Profile)
            .on_resource(target.to_string())
            .with_resource_name("fan@example.com")
            .with_actor_email("admin@example.com")
            .build();

        assert_eq!(input.actor_id, Some(actor));
        assert_eq!(input.actor_email, Some("admin@example.com".to_string()));
        assert_eq!(input.resource_type, ResourceType::Profile);
        assert_eq!(input.resource_id, Some(target.to_string()));
    }

    #[test]
    fn test_system_action_builder() {
        let input =
            AuditLogBuilder::system_action(AuditAction::UserCreate, ResourceType::Registry).build();
        assert_eq!(input.actor_id, None);
        assert_eq!(input.action, AuditAction::UserCreate);
    }

    #[test]
    fn test_with_changes_accumulates() {
        let actor = Uuid::new_v4();
        let input = AuditLogBuilder::user_action(actor, AuditAction::ContentUpdate, ResourceType::Player)
            .with_change("name", Some("Old".into()), Some("New".into()))
            .with_change("jersey_number", Some("7".into()), Some("10".into()))
            .build();

        let changes = input.changes.unwrap();
        assert_eq!(changes.len(), 2);
        assert!(changes.contains_key("jersey_number"));
    }

    #[test]
    fn test_role_changed_picks_grant_or_revoke() {
        let actor = Uuid::new_v4();
        let target = Uuid::new_v4();

        let promoted =
            audit_helpers::role_changed(actor, target, "a@example.com", Role::User, Role::Admin);
        assert_eq!(promoted.action, AuditAction::RoleGrant);

        let demoted =
            audit_helpers::role_changed(actor, target, "a@example.com", Role::Admin, Role::User);
        assert_eq!(demoted.action, AuditAction::RoleRevoke);
    }

    #[test]
    fn test_transfer_completed_records_both_holders() {
        let initiator = Uuid::new_v4();
        let new_holder = Uuid::new_v4();

        let input = audit_helpers::transfer_completed(initiator, initiator, new_holder);
        assert_eq!(input.resource_type, ResourceType::Registry);
        let changes = input.changes.unwrap();
        let change = changes.get("super_admin").unwrap();
        assert_eq!(change.old, Some(serde_json::json!(initiator.to_string())));
        assert_eq!(change.new, Some(serde_json::json!(new_holder.to_string())));
    }

    #[test]
    fn test_user_blocked_helper() {
        let actor = Uuid::new_v4();
        let target = Uuid::new_v4();

        let input = audit_helpers::user_blocked(actor, target, "fan@example.com");
        assert_eq!(input.action, AuditAction::UserBlock);
        assert!(input.changes.unwrap().contains_key("status"));
    }
}
