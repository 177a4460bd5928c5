//! Super Admin transfer repository.
//!
//! Transfer rows are keyed by target user. Completion is a single
//! transaction flipping four records: the registry row, both affected
//! profiles, and the request itself. Either all land or none do.

use domain::models::{Role, TransferStatus};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::entities::TransferEntity;
use crate::metrics::QueryTimer;

/// Outcome of a completion attempt, decided under the row locks.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// Transfer landed; carries the final request row.
    Completed(TransferEntity),
    /// No request exists for the target.
    NotFound,
    /// Request exists but was never accepted by the target.
    NotAccepted,
    /// The target's profile no longer holds the admin role. A demotion
    /// landed after the request was accepted.
    TargetNotAdmin,
    /// The registry no longer names the expected initiator. Something
    /// else changed hands since this completion was requested.
    RegistryMismatch,
}

/// Repository for Super Admin transfer requests.
#[derive(Clone)]
pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the transfer request aimed at a target user.
    pub async fn find_by_target(
        &self,
        target_user_id: Uuid,
    ) -> Result<Option<TransferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_transfer_by_target");
        let result = sqlx::query_as::<_, TransferEntity>(
            r#"
            SELECT target_user_id, target_email, target_display_name, initiated_by,
                   initiator_email, status, created_at, accepted_at, completed_at
            FROM super_admin_transfers
            WHERE target_user_id = $1
            "#,
        )
        .bind(target_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List every transfer request, open ones first, newest first within
    /// each status.
    pub async fn list(&self) -> Result<Vec<TransferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_transfers");
        let result = sqlx::query_as::<_, TransferEntity>(
            r#"
            SELECT target_user_id, target_email, target_display_name, initiated_by,
                   initiator_email, status, created_at, accepted_at, completed_at
            FROM super_admin_transfers
            ORDER BY (status IN ('pending', 'accepted')) DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a transfer request for a target, replacing any earlier
    /// request for the same target that is not in `accepted` state. An
    /// accepted request is protected; the caller checks for it first and
    /// the row predicate backstops the race.
    pub async fn create_or_replace(
        &self,
        target_user_id: Uuid,
        target_email: &str,
        target_display_name: Option<&str>,
        initiated_by: Uuid,
        initiator_email: &str,
    ) -> Result<Option<TransferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_transfer");
        let result = sqlx::query_as::<_, TransferEntity>(
            r#"
            INSERT INTO super_admin_transfers
                (target_user_id, target_email, target_display_name, initiated_by, initiator_email, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            ON CONFLICT (target_user_id) DO UPDATE
            SET target_email = EXCLUDED.target_email,
                target_display_name = EXCLUDED.target_display_name,
                initiated_by = EXCLUDED.initiated_by,
                initiator_email = EXCLUDED.initiator_email,
                status = 'pending',
                created_at = NOW(),
                accepted_at = NULL,
                completed_at = NULL
            WHERE super_admin_transfers.status <> 'accepted'
            RETURNING target_user_id, target_email, target_display_name, initiated_by,
                      initiator_email, status, created_at, accepted_at, completed_at
            "#,
        )
        .bind(target_user_id)
        .bind(target_email)
        .bind(target_display_name)
        .bind(initiated_by)
        .bind(initiator_email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a pending request as accepted by the target. Returns the
    /// updated row, or None when no pending request exists.
    pub async fn mark_accepted(
        &self,
        target_user_id: Uuid,
    ) -> Result<Option<TransferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("accept_transfer");
        let result = sqlx::query_as::<_, TransferEntity>(
            r#"
            UPDATE super_admin_transfers
            SET status = 'accepted', accepted_at = NOW()
            WHERE target_user_id = $1 AND status = 'pending'
            RETURNING target_user_id, target_email, target_display_name, initiated_by,
                      initiator_email, status, created_at, accepted_at, completed_at
            "#,
        )
        .bind(target_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Cancel an open request. Returns the updated row, or None when the
    /// request is absent or already completed.
    pub async fn cancel(
        &self,
        target_user_id: Uuid,
    ) -> Result<Option<TransferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("cancel_transfer");
        let result = sqlx::query_as::<_, TransferEntity>(
            r#"
            UPDATE super_admin_transfers
            SET status = 'cancelled'
            WHERE target_user_id = $1 AND status IN ('pending', 'accepted')
            RETURNING target_user_id, target_email, target_display_name, initiated_by,
                      initiator_email, status, created_at, accepted_at, completed_at
            "#,
        )
        .bind(target_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Complete an accepted transfer.
    ///
    /// Inside one transaction, with the request, registry and target
    /// profile rows locked:
    /// 1. verify the request was accepted by the target
    /// 2. verify the registry still names `expected_holder`
    /// 3. verify the target's profile still holds the admin role
    /// 4. point the registry at the target
    /// 5. promote the target's profile to super_admin
    /// 6. demote the previous holder's profile to admin
    /// 7. mark the request completed
    ///
    /// Every precondition is re-read under lock: a demotion or a
    /// competing transfer committed after the caller's checks aborts the
    /// completion instead of promoting a stale target.
    pub async fn complete(
        &self,
        target_user_id: Uuid,
        expected_holder: Uuid,
    ) -> Result<CompletionOutcome, sqlx::Error> {
        let timer = QueryTimer::new("complete_transfer");

        let mut tx = self.pool.begin().await?;

        let transfer = sqlx::query_as::<_, TransferEntity>(
            r#"
            SELECT target_user_id, target_email, target_display_name, initiated_by,
                   initiator_email, status, created_at, accepted_at, completed_at
            FROM super_admin_transfers
            WHERE target_user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(target_user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(transfer) = transfer else {
            timer.record();
            return Ok(CompletionOutcome::NotFound);
        };
        let accepted = TransferStatus::from_str(&transfer.status)
            .map(|s| s.can_complete())
            .unwrap_or(false);
        if !accepted {
            timer.record();
            return Ok(CompletionOutcome::NotAccepted);
        }

        let holder = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id FROM super_admin_registry
            WHERE singleton = TRUE
            FOR UPDATE
            "#,
        )
        .fetch_optional(&mut *tx)
        .await?;

        if holder != Some(expected_holder) {
            timer.record();
            return Ok(CompletionOutcome::RegistryMismatch);
        }

        let target_role = sqlx::query_scalar::<_, String>(
            r#"
            SELECT role FROM profiles
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(target_user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let target_is_admin = target_role
            .as_deref()
            .and_then(|r| Role::from_str(r).ok())
            .map(|r| r == Role::Admin)
            .unwrap_or(false);
        if !target_is_admin {
            timer.record();
            return Ok(CompletionOutcome::TargetNotAdmin);
        }

        sqlx::query(
            r#"
            UPDATE super_admin_registry
            SET user_id = $1, email = $2, assigned_at = NOW()
            WHERE singleton = TRUE
            "#,
        )
        .bind(target_user_id)
        .bind(&transfer.target_email)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE profiles
            SET role = 'super_admin', updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(target_user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE profiles
            SET role = 'admin', updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(expected_holder)
        .execute(&mut *tx)
        .await?;

        let completed = sqlx::query_as::<_, TransferEntity>(
            r#"
            UPDATE super_admin_transfers
            SET status = 'completed', completed_at = NOW()
            WHERE target_user_id = $1
            RETURNING target_user_id, target_email, target_display_name, initiated_by,
                      initiator_email, status, created_at, accepted_at, completed_at
            "#,
        )
        .bind(target_user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(CompletionOutcome::Completed(completed))
    }
}

#[cfg(test)]
mod tests {
    // Note: TransferRepository tests require database connection and are covered by integration tests
}
