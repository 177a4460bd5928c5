//! Super Admin transfer request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::TransferStatus;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the super_admin_transfers table.
///
/// Keyed by target user: at most one transfer request per target.
#[derive(Debug, Clone, FromRow)]
pub struct TransferEntity {
    pub target_user_id: Uuid,
    pub target_email: String,
    pub target_display_name: Option<String>,
    pub initiated_by: Uuid,
    pub initiator_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<TransferEntity> for domain::models::TransferRequest {
    fn from(entity: TransferEntity) -> Self {
        Self {
            target_user_id: entity.target_user_id,
            target_email: entity.target_email,
            target_display_name: entity.target_display_name,
            initiated_by: entity.initiated_by,
            initiator_email: entity.initiator_email,
            status: TransferStatus::from_str(&entity.status).unwrap_or(TransferStatus::Cancelled),
            created_at: entity.created_at,
            accepted_at: entity.accepted_at,
            completed_at: entity.completed_at,
        }
    }
}
