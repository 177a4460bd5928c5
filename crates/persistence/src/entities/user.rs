//! Row mappings for the users and oauth_accounts tables.

use chrono::{DateTime, Utc};
use domain::models::{OAuthAccount, OAuthProvider, User};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// A users row. `password_hash` is NULL for accounts created through an
/// OAuth provider.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<UserEntity> for User {
    fn from(row: UserEntity) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            email_verified: row.email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login_at: row.last_login_at,
        }
    }
}

/// An oauth_accounts row linking a provider identity to a local user.
#[derive(Debug, Clone, FromRow)]
pub struct OAuthAccountEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub provider_user_id: String,
    pub provider_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<OAuthAccountEntity> for OAuthAccount {
    fn from(row: OAuthAccountEntity) -> Self {
        // Google is the only provider rows are ever written with; an
        // unrecognised value can only come from manual data edits.
        let provider =
            OAuthProvider::from_str(&row.provider).unwrap_or(OAuthProvider::Google);
        Self {
            id: row.id,
            user_id: row.user_id,
            provider,
            provider_user_id: row.provider_user_id,
            provider_email: row.provider_email,
            created_at: row.created_at,
        }
    }
}
