//! OTP gate entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the otp_gates table.
///
/// One row per email with recent sign-in failures. Once `otp_required`
/// flips, sign-in for that email needs a one-time code. The code itself
/// is stored as a SHA-256 digest, never in the clear.
#[derive(Debug, Clone, FromRow)]
pub struct OtpGateEntity {
    pub email: String,
    pub failed_attempts: i32,
    pub otp_required: bool,
    pub code_hash: Option<String>,
    pub code_expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl OtpGateEntity {
    /// Whether the stored code has lapsed. A gate without a code counts
    /// as expired.
    pub fn code_expired(&self, now: DateTime<Utc>) -> bool {
        match self.code_expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn gate(code_expires_at: Option<DateTime<Utc>>) -> OtpGateEntity {
        OtpGateEntity {
            email: "fan@example.com".to_string(),
            failed_attempts: 3,
            otp_required: true,
            code_hash: Some("abc".to_string()),
            code_expires_at,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_code_expiry_boundary() {
        let now = Utc::now();
        assert!(gate(Some(now)).code_expired(now));
        assert!(!gate(Some(now + Duration::seconds(1))).code_expired(now));
    }

    #[test]
    fn test_missing_code_counts_as_expired() {
        assert!(gate(None).code_expired(Utc::now()));
    }
}
