//! Audit log listing for the back office.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::{AuditLogEntry, Permission};
use persistence::repositories::{AuditLogQuery, AuditLogRepository};
use serde::{Deserialize, Serialize};
use shared::pagination::{decode_cursor, encode_cursor};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::AdminUser;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Query parameters for listing audit logs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsQuery {
    pub actor_id: Option<Uuid>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Opaque cursor from a previous page's `nextCursor`.
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// A single audit entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: String,
    pub actor_id: Option<String>,
    pub actor_email: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub changes: Option<serde_json::Value>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            actor_id: entry.actor_id.map(|id| id.to_string()),
            actor_email: entry.actor_email,
            action: entry.action.to_string(),
            resource_type: entry.resource_type.to_string(),
            resource_id: entry.resource_id,
            resource_name: entry.resource_name,
            changes: entry
                .changes
                .and_then(|c| serde_json::to_value(&c).ok()),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// Cursor-paginated audit log page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogListResponse {
    pub entries: Vec<AuditLogResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// List audit entries, newest first, cursor-paginated.
///
/// GET /api/v1/admin/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<AuditLogListResponse>, ApiError> {
    if !admin.has_permission(Permission::ViewAuditLogs) {
        return Err(ApiError::Forbidden(
            "Audit log access requires elevated permissions".to_string(),
        ));
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let before = match &query.cursor {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|_| ApiError::Validation("Invalid cursor".to_string()))?,
        ),
        None => None,
    };

    let repo = AuditLogRepository::new(state.pool.clone());
    // Fetch one extra row to decide whether another page exists.
    let mut entries = repo
        .list(&AuditLogQuery {
            actor_id: query.actor_id,
            action: query.action.clone(),
            resource_type: query.resource_type.clone(),
            from: query.from,
            to: query.to,
            before,
            limit: limit + 1,
        })
        .await?;

    let next_cursor = if entries.len() as i64 > limit {
        entries.truncate(limit as usize);
        entries
            .last()
            .map(|e| encode_cursor(e.created_at, e.id))
    } else {
        None
    };

    Ok(Json(AuditLogListResponse {
        entries: entries
            .into_iter()
            .map(AuditLogEntry::from)
            .map(Into::into)
            .collect(),
        next_cursor,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_deserializes_filters() {
        let query: ListAuditLogsQuery = serde_json::from_str(
            r#"{"action": "user_block", "resourceType": "profile", "limit": 20}"#,
        )
        .unwrap();
        assert_eq!(query.action.as_deref(), Some("user_block"));
        assert_eq!(query.resource_type.as_deref(), Some("profile"));
        assert_eq!(query.limit, Some(20));
        assert!(query.cursor.is_none());
    }
}
