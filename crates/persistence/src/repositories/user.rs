//! Identity store: user accounts and linked OAuth identities.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{OAuthAccountEntity, UserEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, email, password_hash, email_verified, created_at, updated_at, last_login_at";

/// Repository for the users and oauth_accounts tables.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lookup by email. Callers normalize the address before storage, so a
    /// plain equality match is sufficient here.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new account. `password_hash` is None for OAuth-only
    /// accounts. A duplicate email surfaces as a unique violation for the
    /// service layer to map.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
        email_verified: bool,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "INSERT INTO users (email, password_hash, email_verified) \
             VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(email_verified)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update_last_login(
        &self,
        user_id: Uuid,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        sqlx::query("UPDATE users SET last_login_at = $1, updated_at = NOW() WHERE id = $2")
            .bind(last_login_at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }

    pub async fn find_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<OAuthAccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_oauth_account");
        let result = sqlx::query_as::<_, OAuthAccountEntity>(
            r#"
            SELECT id, user_id, provider, provider_user_id, provider_email, created_at
            FROM oauth_accounts
            WHERE provider = $1 AND provider_user_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Link a provider identity to an existing account.
    pub async fn create_oauth_account(
        &self,
        user_id: Uuid,
        provider: &str,
        provider_user_id: &str,
        provider_email: Option<&str>,
    ) -> Result<OAuthAccountEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_oauth_account");
        let result = sqlx::query_as::<_, OAuthAccountEntity>(
            r#"
            INSERT INTO oauth_accounts (user_id, provider, provider_user_id, provider_email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, provider, provider_user_id, provider_email, created_at
            "#,
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_user_id)
        .bind(provider_email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
