//! Super Admin transfer handshake domain models.
//!
//! Reassigning the Super Admin seat is a two-phase handshake: the current
//! Super Admin creates a request naming an Admin, the target accepts it, and
//! the Super Admin completes it. Completion is the one operation in the
//! system requiring an atomic multi-record commit (registry, both profiles
//! and the request record flip together).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle state of a transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl TransferStatus {
    /// Only a pending request can be accepted by its target.
    pub fn can_accept(&self) -> bool {
        matches!(self, TransferStatus::Pending)
    }

    /// Only an accepted request can be completed.
    pub fn can_complete(&self) -> bool {
        matches!(self, TransferStatus::Accepted)
    }

    /// Whether the handshake is still in flight.
    pub fn is_open(&self) -> bool {
        matches!(self, TransferStatus::Pending | TransferStatus::Accepted)
    }

    /// A fresh request may replace this one. An accepted request may not be
    /// silently reset by re-sending; it must be cancelled or completed.
    pub fn can_be_replaced(&self) -> bool {
        !matches!(self, TransferStatus::Accepted)
    }
}

impl FromStr for TransferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TransferStatus::Pending),
            "accepted" => Ok(TransferStatus::Accepted),
            "completed" => Ok(TransferStatus::Completed),
            "cancelled" => Ok(TransferStatus::Cancelled),
            _ => Err(format!("Unknown transfer status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferStatus::Pending => write!(f, "pending"),
            TransferStatus::Accepted => write!(f, "accepted"),
            TransferStatus::Completed => write!(f, "completed"),
            TransferStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A transfer request, keyed by the target user so at most one request per
/// target exists at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferRequest {
    pub target_user_id: Uuid,
    pub target_email: String,
    pub target_display_name: Option<String>,
    pub initiated_by: Uuid,
    pub initiator_email: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization_roundtrip() {
        for status in [
            TransferStatus::Pending,
            TransferStatus::Accepted,
            TransferStatus::Completed,
            TransferStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: TransferStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            TransferStatus::from_str("pending").unwrap(),
            TransferStatus::Pending
        );
        assert_eq!(
            TransferStatus::from_str("ACCEPTED").unwrap(),
            TransferStatus::Accepted
        );
        assert!(TransferStatus::from_str("declined").is_err());
    }

    #[test]
    fn test_lifecycle_guards() {
        assert!(TransferStatus::Pending.can_accept());
        assert!(!TransferStatus::Accepted.can_accept());
        assert!(!TransferStatus::Completed.can_accept());
        assert!(!TransferStatus::Cancelled.can_accept());

        assert!(TransferStatus::Accepted.can_complete());
        assert!(!TransferStatus::Pending.can_complete());
        assert!(!TransferStatus::Completed.can_complete());
    }

    #[test]
    fn test_is_open() {
        assert!(TransferStatus::Pending.is_open());
        assert!(TransferStatus::Accepted.is_open());
        assert!(!TransferStatus::Completed.is_open());
        assert!(!TransferStatus::Cancelled.is_open());
    }

    #[test]
    fn test_replacement_policy() {
        // An in-flight accepted handshake cannot be silently reset
        assert!(TransferStatus::Pending.can_be_replaced());
        assert!(TransferStatus::Completed.can_be_replaced());
        assert!(TransferStatus::Cancelled.can_be_replaced());
        assert!(!TransferStatus::Accepted.can_be_replaced());
    }
}
