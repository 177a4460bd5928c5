//! Admin-area operations: role management, blocking, and the Super Admin
//! transfer handshake.
//!
//! Every mutation re-verifies the registry before trusting the caller,
//! regardless of what the route-level gate already checked. The registry
//! row is the single source of truth for who the Super Admin is.

use domain::models::{ProfileStatus, Role, TransferRequest, UserProfile};
use domain::services::audit_helpers;
use persistence::entities::{ProfileEntity, TransferEntity};
use persistence::repositories::{
    AuditLogRepository, CompletionOutcome, ProfileRepository, SuperAdminRegistryRepository,
    TransferRepository, UserRepository,
};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Errors from admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Caller is not the Super Admin")]
    Unauthorized,

    #[error("Target is protected: {0}")]
    ProtectedTarget(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Service for guarded back-office mutations.
#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grant the admin role. Promotes an existing profile, or creates an
    /// admin profile for a known identity without one. Super Admin only.
    pub async fn create_admin(
        &self,
        actor_id: Uuid,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<ProfileEntity, AdminError> {
        self.verify_registry_holder(actor_id).await?;

        let email = email.to_lowercase();
        let profiles = ProfileRepository::new(self.pool.clone());

        let profile = match profiles.find_by_email(&email).await?.map(UserProfile::from) {
            Some(existing) => {
                if existing.role == Role::SuperAdmin {
                    return Err(AdminError::ProtectedTarget(
                        "Cannot change the Super Admin's role".to_string(),
                    ));
                }
                let updated = profiles
                    .set_role(existing.user_id, &Role::Admin.to_string())
                    .await?
                    .ok_or_else(|| AdminError::NotFound("Profile disappeared".to_string()))?;
                self.audit_async(audit_helpers::role_changed(
                    actor_id,
                    updated.user_id,
                    &updated.email,
                    existing.role,
                    Role::Admin,
                ));
                updated
            }
            None => {
                let users = UserRepository::new(self.pool.clone());
                let user = users
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| AdminError::NotFound(format!("No account for {}", email)))?;

                let created = profiles
                    .ensure_profile(
                        user.id,
                        &email,
                        display_name,
                        &Role::Admin.to_string(),
                        Some(actor_id),
                    )
                    .await?;
                self.audit_async(audit_helpers::role_changed(
                    actor_id,
                    created.user_id,
                    &created.email,
                    Role::User,
                    Role::Admin,
                ));
                created
            }
        };

        Ok(profile)
    }

    /// Revoke the admin role, back to a regular user. Super Admin only.
    pub async fn remove_admin(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<ProfileEntity, AdminError> {
        self.verify_registry_holder(actor_id).await?;
        self.verify_not_registry_holder(target_id).await?;

        let profiles = ProfileRepository::new(self.pool.clone());
        let existing = profiles
            .find_by_user_id(target_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AdminError::NotFound("Profile not found".to_string()))?;

        if existing.role != Role::Admin {
            return Err(AdminError::InvalidTarget(
                "Target is not an admin".to_string(),
            ));
        }

        let updated = profiles
            .set_role(target_id, &Role::User.to_string())
            .await?
            .ok_or_else(|| AdminError::NotFound("Profile disappeared".to_string()))?;

        self.audit_async(audit_helpers::role_changed(
            actor_id,
            target_id,
            &existing.email,
            existing.role,
            Role::User,
        ));

        Ok(updated)
    }

    /// Block a user. The registry holder can never be blocked.
    pub async fn block_user(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<ProfileEntity, AdminError> {
        self.verify_not_registry_holder(target_id).await?;

        let profiles = ProfileRepository::new(self.pool.clone());
        let updated = profiles
            .set_status(target_id, &ProfileStatus::Blocked.to_string())
            .await?
            .ok_or_else(|| AdminError::NotFound("Profile not found".to_string()))?;

        self.audit_async(audit_helpers::user_blocked(
            actor_id,
            target_id,
            &updated.email,
        ));

        Ok(updated)
    }

    /// Lift a block.
    pub async fn unblock_user(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<ProfileEntity, AdminError> {
        let profiles = ProfileRepository::new(self.pool.clone());
        let updated = profiles
            .set_status(target_id, &ProfileStatus::Active.to_string())
            .await?
            .ok_or_else(|| AdminError::NotFound("Profile not found".to_string()))?;

        self.audit_async(audit_helpers::user_unblocked(
            actor_id,
            target_id,
            &updated.email,
        ));

        Ok(updated)
    }

    /// Open the transfer handshake toward an admin target.
    ///
    /// The target's role must be exactly admin, and an already-accepted
    /// request for the same target is protected against replacement.
    pub async fn create_transfer_request(
        &self,
        actor_id: Uuid,
        actor_email: &str,
        target_id: Uuid,
    ) -> Result<TransferEntity, AdminError> {
        self.verify_registry_holder(actor_id).await?;

        let profiles = ProfileRepository::new(self.pool.clone());
        let target = profiles
            .find_by_user_id(target_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AdminError::NotFound("Target profile not found".to_string()))?;

        if target.role != Role::Admin {
            return Err(AdminError::InvalidTarget(
                "Transfer target must hold the admin role".to_string(),
            ));
        }

        let transfers = TransferRepository::new(self.pool.clone());
        if let Some(existing) = transfers.find_by_target(target_id).await? {
            let existing = TransferRequest::from(existing);
            if !existing.status.can_be_replaced() {
                return Err(AdminError::Conflict(
                    "An accepted transfer request already exists".to_string(),
                ));
            }
        }

        // The row predicate in the upsert backstops a concurrent accept
        let transfer = transfers
            .create_or_replace(
                target_id,
                &target.email,
                target.display_name.as_deref(),
                actor_id,
                actor_email,
            )
            .await?
            .ok_or_else(|| {
                AdminError::Conflict("An accepted transfer request already exists".to_string())
            })?;

        self.audit_async(audit_helpers::transfer_created(
            actor_id,
            target_id,
            &target.email,
        ));

        Ok(transfer)
    }

    /// Target accepts their own pending request.
    pub async fn accept_transfer_request(
        &self,
        target_id: Uuid,
    ) -> Result<TransferEntity, AdminError> {
        let transfers = TransferRepository::new(self.pool.clone());
        let existing = transfers
            .find_by_target(target_id)
            .await?
            .map(TransferRequest::from)
            .ok_or_else(|| AdminError::NotFound("No pending transfer request".to_string()))?;
        if !existing.status.can_accept() {
            return Err(AdminError::Conflict(
                "Transfer request is not pending".to_string(),
            ));
        }

        // The status predicate on the update backstops a concurrent change
        let transfer = transfers
            .mark_accepted(target_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("No pending transfer request".to_string()))?;

        self.audit_async(audit_helpers::transfer_accepted(
            target_id,
            &transfer.target_email,
        ));

        Ok(transfer)
    }

    /// Complete an accepted transfer, flipping the registry to the target.
    ///
    /// The heavy lifting happens in one repository transaction; request
    /// status, registry holder and the target's admin role are all
    /// re-read under row locks there, so an interleaved demotion or a
    /// competing transfer aborts the completion. This method verifies
    /// the caller up front and translates the transactional outcome.
    pub async fn complete_transfer_request(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<TransferEntity, AdminError> {
        self.verify_registry_holder(actor_id).await?;

        let transfers = TransferRepository::new(self.pool.clone());
        match transfers.complete(target_id, actor_id).await? {
            CompletionOutcome::Completed(transfer) => {
                tracing::info!(
                    previous_holder = %actor_id,
                    new_holder = %target_id,
                    "Super Admin transfer completed"
                );
                crate::middleware::metrics::record_transfer_completed();
                self.audit_async(audit_helpers::transfer_completed(
                    actor_id, actor_id, target_id,
                ));
                Ok(transfer)
            }
            CompletionOutcome::NotFound => {
                Err(AdminError::NotFound("No transfer request".to_string()))
            }
            CompletionOutcome::NotAccepted => Err(AdminError::InvalidTarget(
                "Transfer request has not been accepted".to_string(),
            )),
            CompletionOutcome::TargetNotAdmin => Err(AdminError::InvalidTarget(
                "Transfer target must hold the admin role".to_string(),
            )),
            CompletionOutcome::RegistryMismatch => Err(AdminError::Unauthorized),
        }
    }

    /// Cancel an open request.
    pub async fn cancel_transfer_request(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<TransferEntity, AdminError> {
        self.verify_registry_holder(actor_id).await?;

        let transfers = TransferRepository::new(self.pool.clone());
        let open = transfers
            .find_by_target(target_id)
            .await?
            .map(TransferRequest::from)
            .map(|t| t.status.is_open())
            .unwrap_or(false);
        if !open {
            return Err(AdminError::NotFound("No open transfer request".to_string()));
        }

        let transfer = transfers
            .cancel(target_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("No open transfer request".to_string()))?;

        self.audit_async(audit_helpers::transfer_cancelled(actor_id, target_id));

        Ok(transfer)
    }

    /// Registry equality check. The profile role column is never consulted.
    async fn verify_registry_holder(&self, actor_id: Uuid) -> Result<(), AdminError> {
        let registry = SuperAdminRegistryRepository::new(self.pool.clone());
        let holder = registry.get().await?;
        match holder {
            Some(entry) if entry.holds(actor_id) => Ok(()),
            _ => Err(AdminError::Unauthorized),
        }
    }

    /// Guard against mutating the registry holder.
    async fn verify_not_registry_holder(&self, target_id: Uuid) -> Result<(), AdminError> {
        let registry = SuperAdminRegistryRepository::new(self.pool.clone());
        if let Some(entry) = registry.get().await? {
            if entry.holds(target_id) {
                return Err(AdminError::ProtectedTarget(
                    "The Super Admin account cannot be modified".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Insert an audit entry without blocking the calling operation.
    fn audit_async(&self, input: domain::models::CreateAuditLogInput) {
        let repo = AuditLogRepository::new(self.pool.clone());
        tokio::spawn(async move {
            if let Err(e) = repo.insert(&input).await {
                tracing::warn!("Failed to write audit entry: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    // Note: AdminService flows require database connection and are covered by integration tests
}
