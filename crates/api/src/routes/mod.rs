//! HTTP route handlers.

use domain::models::CreateAuditLogInput;
use persistence::repositories::AuditLogRepository;
use sqlx::PgPool;

pub mod admin_users;
pub mod announcements;
pub mod audit_logs;
pub mod auth;
pub mod events;
pub mod fixtures;
pub mod gallery;
pub mod health;
pub mod layouts;
pub mod navigation;
pub mod players;
pub mod products;
pub mod records;
pub mod teams;
pub mod transfers;
pub mod users;

/// Content mutations share one permission gate on top of the admin-area
/// extractor.
pub(crate) fn require_content_permission(
    admin: &crate::middleware::rbac::CurrentUser,
) -> Result<(), crate::error::ApiError> {
    if admin.has_permission(domain::models::Permission::ManageContent) {
        Ok(())
    } else {
        Err(crate::error::ApiError::Forbidden(
            "Content management requires elevated permissions".to_string(),
        ))
    }
}

/// Write an audit entry without blocking the request. Failures are
/// traced and swallowed.
pub(crate) fn audit_async(pool: &PgPool, input: CreateAuditLogInput) {
    let repo = AuditLogRepository::new(pool.clone());
    tokio::spawn(async move {
        if let Err(e) = repo.insert(&input).await {
            tracing::warn!("Failed to write audit log entry: {}", e);
        }
    });
}
