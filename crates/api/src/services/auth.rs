//! Authentication service for registration, login, OAuth and token management.
//!
//! The first successful registration wins the registry bootstrap and
//! becomes the Super Admin; every later account starts as a regular user.

use chrono::Utc;
use domain::models::{AuditAction, OAuthProvider, ProfileStatus, ResourceType, Role};
use domain::services::{audit_helpers, AuditLogBuilder};
use persistence::repositories::{
    AuditLogRepository, ProfileRepository, SuperAdminRegistryRepository, UserRepository,
};
use shared::crypto::sha256_hex;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::{normalize_email, validate_password_strength};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration as StdDuration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{AuthConfig, JwtAuthConfig};
use crate::services::otp::{OtpError, OtpService};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Verification code required")]
    OtpRequired,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid OAuth token")]
    InvalidOAuthToken,

    #[error("OAuth provider error: {0}")]
    OAuthProviderError(String),

    #[error("Unsupported OAuth provider")]
    UnsupportedOAuthProvider,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("OTP gate error: {0}")]
    OtpGate(#[from] OtpError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub email_verified: bool,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Token pair with metadata.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_jti: String,
    pub refresh_token: String,
    pub refresh_token_jti: String,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Database row for session query.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    expires_at: chrono::DateTime<Utc>,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_config: JwtConfig,
    access_token_expiry: i64,
    /// Google OAuth client ID for audience validation
    google_client_id: Option<String>,
    /// Budget for the profile read during sign-in
    profile_read_timeout: StdDuration,
    otp: OtpService,
}

impl AuthService {
    /// Creates a new AuthService from configuration.
    pub fn new(
        pool: PgPool,
        jwt_config: &JwtAuthConfig,
        auth_config: &AuthConfig,
        otp: OtpService,
    ) -> Result<Self, AuthError> {
        // Convert literal \n sequences to actual newlines (for env var compatibility)
        let private_key = normalize_pem_key(&jwt_config.private_key);
        let public_key = normalize_pem_key(&jwt_config.public_key);

        let jwt = JwtConfig::with_leeway(
            &private_key,
            &public_key,
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
            jwt_config.leeway_secs,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to initialize JWT: {}", e)))?;

        Ok(Self {
            pool,
            jwt_config: jwt,
            access_token_expiry: jwt_config.access_token_expiry_secs,
            google_client_id: auth_config.google_client_id.clone(),
            profile_read_timeout: StdDuration::from_millis(auth_config.profile_read_timeout_ms),
            otp,
        })
    }

    /// Register a new user with email and password.
    ///
    /// The first registration bootstraps the Super Admin registry. The
    /// insert races concurrent registrations; only one caller wins the
    /// registry row.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthResult, AuthError> {
        validate_password(password)?;

        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let users = UserRepository::new(self.pool.clone());
        if users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let user = match users.create_user(&email, Some(&password_hash), false).await {
            Ok(user) => user,
            // Unique violation from a concurrent registration
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        // First account to claim the registry becomes the Super Admin
        let registry = SuperAdminRegistryRepository::new(self.pool.clone());
        let bootstrapped = registry.try_bootstrap(user.id, &email).await?;
        let role = if bootstrapped {
            Role::SuperAdmin
        } else {
            Role::User
        };

        let profiles = ProfileRepository::new(self.pool.clone());
        profiles
            .create_profile(user.id, &email, Some(display_name), &role.to_string(), None)
            .await?;

        if bootstrapped {
            tracing::info!(user_id = %user.id, email = %email, "Registry bootstrapped by founding account");
            self.audit_async(
                AuditLogBuilder::user_action(user.id, AuditAction::RegistryBootstrap, ResourceType::Registry)
                    .with_actor_email(&email)
                    .on_resource(user.id.to_string())
                    .build(),
            );
        }
        self.audit_async(audit_helpers::user_created(user.id, user.id, &email));

        let tokens = self.generate_tokens(user.id)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user_id: user.id,
            email,
            display_name: display_name.to_string(),
            role,
            email_verified: false,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let email = normalize_email(email);

        // An armed gate blocks password sign-in until the code is verified
        if self.otp.requires_otp(&email).await? {
            return Err(AuthError::OtpRequired);
        }

        let users = UserRepository::new(self.pool.clone());
        let user = users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, password_hash)? {
            self.otp.record_failure(&email).await?;
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self.read_profile_bounded(user.id).await?;
        let (display_name, role) = match profile {
            Some(profile) => {
                let status =
                    ProfileStatus::from_str(&profile.status).unwrap_or(ProfileStatus::Active);
                if status.is_blocked() {
                    return Err(AuthError::AccountBlocked);
                }
                (
                    profile.display_name.unwrap_or_default(),
                    Role::from_str(&profile.role).unwrap_or(Role::User),
                )
            }
            // Profile read timed out or row is missing; sign-in proceeds
            // without the block check rather than failing closed.
            None => (String::new(), Role::User),
        };

        self.otp.record_success(&email).await?;

        users.update_last_login(user.id, Utc::now()).await?;

        let tokens = self.generate_tokens(user.id)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            display_name,
            role,
            email_verified: user.email_verified,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Authenticate using an OAuth provider.
    ///
    /// Validates the ID token with the provider, then either returns the
    /// linked user, links the account to an existing user with the same
    /// email, or creates a fresh identity. A fresh identity still runs
    /// through the registry bootstrap, so a founder can arrive via OAuth.
    pub async fn oauth_login(
        &self,
        provider: &str,
        id_token: &str,
    ) -> Result<AuthResult, AuthError> {
        let provider =
            OAuthProvider::from_str(provider).map_err(|_| AuthError::UnsupportedOAuthProvider)?;

        let oauth_info = match provider {
            OAuthProvider::Google => self.verify_google_token(id_token).await?,
        };

        let users = UserRepository::new(self.pool.clone());
        let email = normalize_email(&oauth_info.email);

        let existing_link = users
            .find_oauth_account(provider.as_str(), &oauth_info.provider_user_id)
            .await?;

        let user_id = if let Some(link) = existing_link {
            link.user_id
        } else if let Some(user) = users.find_by_email(&email).await? {
            users
                .create_oauth_account(
                    user.id,
                    provider.as_str(),
                    &oauth_info.provider_user_id,
                    Some(&email),
                )
                .await?;
            user.id
        } else {
            self.create_oauth_user(&oauth_info, provider).await?
        };

        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let profile = self.read_profile_bounded(user.id).await?;
        let (display_name, role) = match profile {
            Some(profile) => {
                let status =
                    ProfileStatus::from_str(&profile.status).unwrap_or(ProfileStatus::Active);
                if status.is_blocked() {
                    return Err(AuthError::AccountBlocked);
                }
                (
                    profile.display_name.unwrap_or_default(),
                    Role::from_str(&profile.role).unwrap_or(Role::User),
                )
            }
            None => (String::new(), Role::User),
        };

        users.update_last_login(user.id, Utc::now()).await?;

        let tokens = self.generate_tokens(user.id)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            display_name,
            role,
            email_verified: user.email_verified,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Verify Google ID token using Google's tokeninfo endpoint.
    async fn verify_google_token(&self, id_token: &str) -> Result<OAuthUserInfo, AuthError> {
        let client = reqwest::Client::new();
        let response = client
            .get("https://oauth2.googleapis.com/tokeninfo")
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AuthError::OAuthProviderError(format!("Google API error: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidOAuthToken);
        }

        let token_info: GoogleTokenInfo = response.json().await.map_err(|e| {
            AuthError::OAuthProviderError(format!("Failed to parse Google response: {}", e))
        })?;

        // Validate audience - token must be issued for our app
        if let Some(ref expected_client_id) = self.google_client_id {
            let actual_aud = token_info.aud.as_deref().unwrap_or("");
            if actual_aud != expected_client_id {
                tracing::warn!(
                    expected = %expected_client_id,
                    actual = %actual_aud,
                    "Google token audience mismatch"
                );
                return Err(AuthError::InvalidOAuthToken);
            }
        } else {
            tracing::warn!("Google OAuth client ID not configured - audience validation skipped");
        }

        let email = token_info.email.ok_or(AuthError::OAuthProviderError(
            "No email in Google token".to_string(),
        ))?;

        Ok(OAuthUserInfo {
            provider_user_id: token_info.sub,
            email,
            display_name: token_info.name,
            email_verified: token_info.email_verified.unwrap_or(false),
        })
    }

    /// Create a new user and profile from OAuth information.
    async fn create_oauth_user(
        &self,
        oauth_info: &OAuthUserInfo,
        provider: OAuthProvider,
    ) -> Result<Uuid, AuthError> {
        let email = normalize_email(&oauth_info.email);

        let display_name = oauth_info
            .display_name
            .clone()
            .unwrap_or_else(|| email.split('@').next().unwrap_or("User").to_string());

        let users = UserRepository::new(self.pool.clone());
        // No password_hash for OAuth-only users
        let user = users
            .create_user(&email, None, oauth_info.email_verified)
            .await?;

        users
            .create_oauth_account(
                user.id,
                provider.as_str(),
                &oauth_info.provider_user_id,
                Some(&email),
            )
            .await?;

        let registry = SuperAdminRegistryRepository::new(self.pool.clone());
        let bootstrapped = registry.try_bootstrap(user.id, &email).await?;
        let role = if bootstrapped {
            Role::SuperAdmin
        } else {
            Role::User
        };

        let profiles = ProfileRepository::new(self.pool.clone());
        profiles
            .create_profile(user.id, &email, Some(&display_name), &role.to_string(), None)
            .await?;

        self.audit_async(audit_helpers::user_created(user.id, user.id, &email));

        Ok(user.id)
    }

    /// Refresh access token using a valid refresh token.
    ///
    /// Implements token rotation: old refresh token is invalidated and a new one is issued.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired | JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let jti_hash = sha256_hex(&claims.jti);

        let session: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, expires_at
            FROM user_sessions
            WHERE refresh_token_hash = $1 AND user_id = $2
            "#,
        )
        .bind(&jti_hash)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let session = session.ok_or(AuthError::SessionNotFound)?;

        if session.expires_at < Utc::now() {
            sqlx::query("DELETE FROM user_sessions WHERE id = $1")
                .bind(session.id)
                .execute(&self.pool)
                .await?;
            return Err(AuthError::InvalidRefreshToken);
        }

        // A blocked profile cannot mint fresh tokens
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        if let Some(status) = status {
            let status = ProfileStatus::from_str(&status).unwrap_or(ProfileStatus::Active);
            if status.is_blocked() {
                return Err(AuthError::AccountBlocked);
            }
        }

        let new_tokens = self.generate_tokens(user_id)?;

        let now = Utc::now();
        let new_expires_at =
            now + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);
        let new_token_hash = sha256_hex(&new_tokens.access_token_jti);
        let new_refresh_hash = sha256_hex(&new_tokens.refresh_token_jti);

        sqlx::query(
            r#"
            UPDATE user_sessions
            SET token_hash = $1, refresh_token_hash = $2, expires_at = $3, last_used_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&new_token_hash)
        .bind(&new_refresh_hash)
        .bind(new_expires_at)
        .bind(now)
        .bind(session.id)
        .execute(&self.pool)
        .await?;

        Ok(RefreshResult {
            access_token: new_tokens.access_token,
            refresh_token: new_tokens.refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Logout by invalidating the session associated with the refresh token.
    ///
    /// If `all_devices` is true, invalidates all sessions for the user.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> Result<(), AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired | JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        if all_devices {
            sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        } else {
            let jti_hash = sha256_hex(&claims.jti);

            let result = sqlx::query(
                "DELETE FROM user_sessions WHERE refresh_token_hash = $1 AND user_id = $2",
            )
            .bind(&jti_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            // Absent session means already logged out, not an error
            if result.rows_affected() == 0 {
                tracing::debug!(user_id = %user_id, "Session not found during logout, may already be logged out");
            }
        }

        Ok(())
    }

    /// Profile read bounded by the configured timeout. A timeout or
    /// missing row yields None; the caller decides how to degrade.
    async fn read_profile_bounded(
        &self,
        user_id: Uuid,
    ) -> Result<Option<persistence::entities::ProfileEntity>, AuthError> {
        let profiles = ProfileRepository::new(self.pool.clone());
        match tokio::time::timeout(self.profile_read_timeout, profiles.find_by_user_id(user_id))
            .await
        {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(user_id = %user_id, "Profile read exceeded timeout during sign-in");
                Ok(None)
            }
        }
    }

    /// Generate access and refresh tokens for a user.
    fn generate_tokens(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let (access_token, access_jti) = self.jwt_config.generate_access_token(user_id)?;
        let (refresh_token, refresh_jti) = self.jwt_config.generate_refresh_token(user_id)?;

        Ok(TokenPair {
            access_token,
            access_token_jti: access_jti,
            refresh_token,
            refresh_token_jti: refresh_jti,
        })
    }

    /// Create a session for the user with the generated tokens.
    async fn create_session(&self, user_id: Uuid, tokens: &TokenPair) -> Result<(), AuthError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);

        // Hash the JTIs for storage (for revocation checking)
        let token_hash = sha256_hex(&tokens.access_token_jti);
        let refresh_hash = sha256_hex(&tokens.refresh_token_jti);

        sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, token_hash, refresh_token_hash, expires_at, created_at, last_used_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(&refresh_hash)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

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

/// Validate password meets security requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    validate_password_strength(password).map_err(|e| {
        AuthError::WeakPassword(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Password does not meet requirements".to_string()),
        )
    })
}

/// Normalize PEM key by converting literal \n sequences to newlines.
/// Handles quoted values and escaped newlines from env file parsers.
fn normalize_pem_key(key: &str) -> String {
    let key = key.trim_matches('"').trim_matches('\'');
    key.replace("\\n", "\n")
}

/// User information extracted from a verified OAuth token.
#[derive(Debug)]
struct OAuthUserInfo {
    provider_user_id: String,
    email: String,
    display_name: Option<String>,
    email_verified: bool,
}

/// Google tokeninfo response structure.
#[derive(Debug, serde::Deserialize)]
struct GoogleTokenInfo {
    /// Subject (Google user ID)
    sub: String,
    /// Audience (client ID the token was issued for)
    aud: Option<String>,
    /// User's email
    email: Option<String>,
    /// Whether email is verified
    email_verified: Option<bool>,
    /// User's name
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_accepts_strong() {
        assert!(validate_password("Str0ngPass").is_ok());
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("Ab1"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_missing_uppercase() {
        assert!(matches!(
            validate_password("weakpass1"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_missing_digit() {
        assert!(matches!(
            validate_password("WeakPassword"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_normalize_pem_key_converts_escaped_newlines() {
        let raw = "-----BEGIN KEY-----\\nabc\\n-----END KEY-----";
        let normalized = normalize_pem_key(raw);
        assert_eq!(normalized.matches('\n').count(), 2);
    }

    #[test]
    fn test_normalize_pem_key_strips_quotes() {
        let raw = "\"-----BEGIN KEY-----\"";
        assert_eq!(normalize_pem_key(raw), "-----BEGIN KEY-----");
    }
}
