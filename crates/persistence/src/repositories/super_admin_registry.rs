//! Super Admin registry repository.
//!
//! The registry is a single-row table naming the current Super Admin.
//! Bootstrap uses an insert that yields to any concurrently written row,
//! so exactly one founder wins regardless of racing first registrations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::SuperAdminRegistryEntity;
use crate::metrics::QueryTimer;

/// Repository for the super_admin_registry singleton.
#[derive(Clone)]
pub struct SuperAdminRegistryRepository {
    pool: PgPool,
}

impl SuperAdminRegistryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read the registry row, if assigned.
    pub async fn get(&self) -> Result<Option<SuperAdminRegistryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_super_admin_registry");
        let result = sqlx::query_as::<_, SuperAdminRegistryEntity>(
            r#"
            SELECT singleton, user_id, email, assigned_at
            FROM super_admin_registry
            WHERE singleton = TRUE
            "#,
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Attempt to claim the registry for `user_id`. Returns true when the
    /// claim won, false when another holder already exists. Never
    /// overwrites an existing row.
    pub async fn try_bootstrap(&self, user_id: Uuid, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("bootstrap_super_admin_registry");
        let result = sqlx::query(
            r#"
            INSERT INTO super_admin_registry (singleton, user_id, email, assigned_at)
            VALUES (TRUE, $1, $2, NOW())
            ON CONFLICT (singleton) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() == 1)
    }

    /// Read the registry row inside `tx` with a row lock, blocking any
    /// concurrent transfer completion until `tx` ends.
    pub async fn get_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<SuperAdminRegistryEntity>, sqlx::Error> {
        sqlx::query_as::<_, SuperAdminRegistryEntity>(
            r#"
            SELECT singleton, user_id, email, assigned_at
            FROM super_admin_registry
            WHERE singleton = TRUE
            FOR UPDATE
            "#,
        )
        .fetch_optional(&mut **tx)
        .await
    }

    /// Point the registry at a new holder inside `tx`.
    pub async fn reassign_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        email: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE super_admin_registry
            SET user_id = $1, email = $2, assigned_at = NOW()
            WHERE singleton = TRUE
            "#,
        )
        .bind(user_id)
        .bind(email)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Note: SuperAdminRegistryRepository tests require database connection and are covered by integration tests
}
