//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AuditAction, FieldChange, ResourceType};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the audit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub changes: Option<Json<HashMap<String, FieldChange>>>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntity> for domain::models::audit::AuditLogEntry {
    fn from(entity: AuditLogEntity) -> Self {
        Self {
            id: entity.id,
            actor_id: entity.actor_id,
            actor_email: entity.actor_email,
            action: AuditAction::from_str(&entity.action)
                .unwrap_or(AuditAction::ContentUpdate), // Default fallback
            resource_type: ResourceType::from_str(&entity.resource_type)
                .unwrap_or(ResourceType::Profile),
            resource_id: entity.resource_id,
            resource_name: entity.resource_name,
            changes: entity.changes.map(|c| c.0),
            created_at: entity.created_at,
        }
    }
}
