//! Super Admin registry entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the super_admin_registry table.
///
/// The table holds at most one row, enforced by a constant-true primary
/// key column. The row names the single current Super Admin.
#[derive(Debug, Clone, FromRow)]
pub struct SuperAdminRegistryEntity {
    pub singleton: bool,
    pub user_id: Uuid,
    pub email: String,
    pub assigned_at: DateTime<Utc>,
}

impl SuperAdminRegistryEntity {
    /// Registry equality is the only authoritative Super Admin check.
    pub fn holds(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_compares_user_id() {
        let holder = Uuid::new_v4();
        let entity = SuperAdminRegistryEntity {
            singleton: true,
            user_id: holder,
            email: "founder@example.com".to_string(),
            assigned_at: Utc::now(),
        };
        assert!(entity.holds(holder));
        assert!(!entity.holds(Uuid::new_v4()));
    }
}
