//! Super Admin transfer handshake routes.
//!
//! Creation, completion and cancellation belong to the current holder;
//! acceptance belongs to the target. Every mutation is re-verified
//! against the registry in the service, the route gate is only the
//! first line.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::entities::TransferEntity;
use persistence::repositories::TransferRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::rbac::{AdminUser, SuperAdminUser};
use crate::services::AdminService;

/// A transfer request as returned to the back office.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub target_user_id: String,
    pub target_email: String,
    pub target_display_name: Option<String>,
    pub initiated_by: String,
    pub initiator_email: String,
    pub status: String,
    pub created_at: String,
    pub accepted_at: Option<String>,
    pub completed_at: Option<String>,
}

impl From<TransferEntity> for TransferResponse {
    fn from(entity: TransferEntity) -> Self {
        Self {
            target_user_id: entity.target_user_id.to_string(),
            target_email: entity.target_email,
            target_display_name: entity.target_display_name,
            initiated_by: entity.initiated_by.to_string(),
            initiator_email: entity.initiator_email,
            status: entity.status,
            created_at: entity.created_at.to_rfc3339(),
            accepted_at: entity.accepted_at.map(|t| t.to_rfc3339()),
            completed_at: entity.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Request body for opening a transfer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub target_user_id: Uuid,
}

/// Transfer list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferListResponse {
    pub transfers: Vec<TransferResponse>,
}

/// List transfer requests, newest first.
///
/// GET /api/v1/admin/transfers
pub async fn list_transfers(
    State(state): State<AppState>,
    SuperAdminUser(_actor): SuperAdminUser,
) -> Result<Json<TransferListResponse>, ApiError> {
    let transfers = TransferRepository::new(state.pool.clone()).list().await?;

    Ok(Json(TransferListResponse {
        transfers: transfers.into_iter().map(Into::into).collect(),
    }))
}

/// Open the handshake toward an admin target.
///
/// POST /api/v1/admin/transfers
pub async fn create_transfer(
    State(state): State<AppState>,
    SuperAdminUser(actor): SuperAdminUser,
    Json(request): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    let service = AdminService::new(state.pool.clone());
    let transfer = service
        .create_transfer_request(actor.user_id, &actor.email, request.target_user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(transfer.into())))
}

/// Target accepts their own pending request.
///
/// POST /api/v1/admin/transfers/accept
pub async fn accept_transfer(
    State(state): State<AppState>,
    AdminUser(target): AdminUser,
) -> Result<Json<TransferResponse>, ApiError> {
    let service = AdminService::new(state.pool.clone());
    let transfer = service.accept_transfer_request(target.user_id).await?;

    Ok(Json(transfer.into()))
}

/// Complete an accepted transfer, flipping the registry to the target.
///
/// POST /api/v1/admin/transfers/:target_id/complete
pub async fn complete_transfer(
    State(state): State<AppState>,
    SuperAdminUser(actor): SuperAdminUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<TransferResponse>, ApiError> {
    let service = AdminService::new(state.pool.clone());
    let transfer = service
        .complete_transfer_request(actor.user_id, target_id)
        .await?;

    Ok(Json(transfer.into()))
}

/// Cancel an open request.
///
/// DELETE /api/v1/admin/transfers/:target_id
pub async fn cancel_transfer(
    State(state): State<AppState>,
    SuperAdminUser(actor): SuperAdminUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<TransferResponse>, ApiError> {
    let service = AdminService::new(state.pool.clone());
    let transfer = service
        .cancel_transfer_request(actor.user_id, target_id)
        .await?;

    Ok(Json(transfer.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_transfer_request_deserializes() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"targetUserId": "{}"}}"#, id);
        let request: CreateTransferRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.target_user_id, id);
    }
}
