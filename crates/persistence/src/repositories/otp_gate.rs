//! OTP gate repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::OtpGateEntity;
use crate::metrics::QueryTimer;

/// Repository for email-keyed OTP escalation gates.
#[derive(Clone)]
pub struct OtpGateRepository {
    pool: PgPool,
}

impl OtpGateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the gate for an email, if one exists.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<OtpGateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_otp_gate");
        let result = sqlx::query_as::<_, OtpGateEntity>(
            r#"
            SELECT email, failed_attempts, otp_required, code_hash, code_expires_at, updated_at
            FROM otp_gates
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Bump the failure counter for an email, creating the row on first
    /// failure. Returns the new count.
    pub async fn record_failure(&self, email: &str) -> Result<i32, sqlx::Error> {
        let timer = QueryTimer::new("record_otp_failure");
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO otp_gates (email, failed_attempts, updated_at)
            VALUES ($1, 1, NOW())
            ON CONFLICT (email) DO UPDATE
            SET failed_attempts = otp_gates.failed_attempts + 1,
                updated_at = NOW()
            RETURNING failed_attempts
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Arm the gate so further sign-ins for this email need a code.
    pub async fn require_otp(&self, email: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("require_otp");
        let result = sqlx::query(
            r#"
            UPDATE otp_gates
            SET otp_required = TRUE, updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Store a freshly issued code hash and its expiry.
    pub async fn set_code(
        &self,
        email: &str,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpGateEntity, sqlx::Error> {
        let timer = QueryTimer::new("set_otp_code");
        let result = sqlx::query_as::<_, OtpGateEntity>(
            r#"
            INSERT INTO otp_gates (email, failed_attempts, otp_required, code_hash, code_expires_at, updated_at)
            VALUES ($1, 0, TRUE, $2, $3, NOW())
            ON CONFLICT (email) DO UPDATE
            SET otp_required = TRUE,
                code_hash = EXCLUDED.code_hash,
                code_expires_at = EXCLUDED.code_expires_at,
                updated_at = NOW()
            RETURNING email, failed_attempts, otp_required, code_hash, code_expires_at, updated_at
            "#,
        )
        .bind(email)
        .bind(code_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Drop the gate entirely (successful sign-in or verified code).
    pub async fn clear(&self, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("clear_otp_gate");
        let result = sqlx::query("DELETE FROM otp_gates WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: OtpGateRepository tests require database connection and are covered by integration tests
}
