//! Audit log repository for database operations.
//!
//! Inserts are fire-and-forget from the caller's perspective; listing is
//! filtered and cursor-paginated, newest entries first.

use chrono::{DateTime, Utc};
use domain::models::CreateAuditLogInput;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AuditLogEntity;
use crate::metrics::QueryTimer;

/// Filters for listing audit logs.
#[derive(Debug, Clone, Default)]
pub struct AuditLogQuery {
    pub actor_id: Option<Uuid>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Exclusive cursor: return entries strictly older than this position.
    pub before: Option<(DateTime<Utc>, Uuid)>,
    pub limit: i64,
}

/// Helper for building dynamic WHERE clauses from audit log filters.
struct AuditLogFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl AuditLogFilterBuilder {
    fn build(query: &AuditLogQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.actor_id.is_some() {
            param_count += 1;
            conditions.push(format!("actor_id = ${}", param_count));
        }
        if query.action.is_some() {
            param_count += 1;
            conditions.push(format!("action = ${}", param_count));
        }
        if query.resource_type.is_some() {
            param_count += 1;
            conditions.push(format!("resource_type = ${}", param_count));
        }
        if query.from.is_some() {
            param_count += 1;
            conditions.push(format!("created_at >= ${}", param_count));
        }
        if query.to.is_some() {
            param_count += 1;
            conditions.push(format!("created_at <= ${}", param_count));
        }
        if query.before.is_some() {
            conditions.push(format!(
                "(created_at, id) < (${}, ${})",
                param_count + 1,
                param_count + 2
            ));
            param_count += 2;
        }

        Self {
            conditions,
            param_count,
        }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Repository for audit log operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an audit entry.
    pub async fn insert(&self, input: &CreateAuditLogInput) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("insert_audit_log");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO audit_logs
                (actor_id, actor_email, action, resource_type, resource_id, resource_name, changes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.actor_id)
        .bind(&input.actor_email)
        .bind(input.action.to_string())
        .bind(input.resource_type.to_string())
        .bind(&input.resource_id)
        .bind(&input.resource_name)
        .bind(input.changes.as_ref().map(Json))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List entries matching the query, newest first.
    pub async fn list(&self, query: &AuditLogQuery) -> Result<Vec<AuditLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_audit_logs");
        let filter = AuditLogFilterBuilder::build(query);
        let sql = format!(
            r#"
            SELECT id, actor_id, actor_email, action, resource_type, resource_id,
                   resource_name, changes, created_at
            FROM audit_logs
            {}
            ORDER BY created_at DESC, id DESC
            LIMIT ${}
            "#,
            filter.where_clause(),
            filter.param_count + 1
        );

        let mut q = sqlx::query_as::<_, AuditLogEntity>(&sql);
        if let Some(actor_id) = query.actor_id {
            q = q.bind(actor_id);
        }
        if let Some(ref action) = query.action {
            q = q.bind(action);
        }
        if let Some(ref resource_type) = query.resource_type {
            q = q.bind(resource_type);
        }
        if let Some(from) = query.from {
            q = q.bind(from);
        }
        if let Some(to) = query.to {
            q = q.bind(to);
        }
        if let Some((created_at, id)) = query.before {
            q = q.bind(created_at).bind(id);
        }
        let result = q.bind(query.limit).fetch_all(&self.pool).await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builder_empty_query() {
        let query = AuditLogQuery {
            limit: 50,
            ..Default::default()
        };
        let filter = AuditLogFilterBuilder::build(&query);
        assert_eq!(filter.where_clause(), "");
        assert_eq!(filter.param_count, 0);
    }

    #[test]
    fn test_filter_builder_counts_params() {
        let query = AuditLogQuery {
            actor_id: Some(Uuid::new_v4()),
            action: Some("user_block".to_string()),
            before: Some((Utc::now(), Uuid::new_v4())),
            limit: 50,
            ..Default::default()
        };
        let filter = AuditLogFilterBuilder::build(&query);
        assert_eq!(filter.param_count, 4);
        let clause = filter.where_clause();
        assert!(clause.starts_with("WHERE "));
        assert!(clause.contains("actor_id = $1"));
        assert!(clause.contains("action = $2"));
        assert!(clause.contains("(created_at, id) < ($3, $4)"));
    }

    // Note: query execution tests require database connection and are covered by integration tests
}
