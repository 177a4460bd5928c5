//! Authentication routes: registration, login, OAuth, token management,
//! and the OTP verification gate.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{AuthResult, AuthService, OtpService};

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password (min 8 chars, 1 upper, 1 lower, 1 digit)
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// User's display name
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
}

/// Request body for password login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for OAuth sign-in.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginRequest {
    /// Provider name, currently only "google"
    #[validate(length(min = 1, message = "Provider is required"))]
    pub provider: String,

    /// The provider-issued ID token
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for logout.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,

    /// Invalidate every session for the user, not just this one
    #[serde(default)]
    pub all_devices: bool,
}

/// Query parameters for the OTP status check.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpStatusQuery {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for requesting a verification code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for verifying a code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerifyRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// User information in auth responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub email_verified: bool,
}

/// Token information in auth responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for a successful sign-in or registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

/// Response body for the OTP status check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpStatusResponse {
    pub otp_required: bool,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

fn otp_service(state: &AppState) -> OtpService {
    OtpService::new(state.pool.clone(), &state.config.otp)
}

fn auth_service(state: &AppState) -> Result<AuthService, ApiError> {
    AuthService::new(
        state.pool.clone(),
        &state.config.jwt,
        &state.config.auth,
        otp_service(state),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to initialize auth service: {}", e)))
}

fn auth_response(result: AuthResult) -> AuthResponse {
    AuthResponse {
        user: UserResponse {
            id: result.user_id.to_string(),
            email: result.email,
            display_name: result.display_name,
            role: result.role.to_string(),
            email_verified: result.email_verified,
        },
        tokens: TokensResponse {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: result.access_token_expires_in,
        },
    }
}

/// Register a new user with email and password.
///
/// The first account to register becomes the Super Admin.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let service = auth_service(&state)?;
    let result = service
        .register(&request.email, &request.password, &request.display_name)
        .await?;

    Ok((StatusCode::CREATED, Json(auth_response(result))))
}

/// Sign in with email and password.
///
/// Returns 403 with "Verification code required" when the OTP gate for
/// the email is armed; the client then drives the otp/request +
/// otp/verify flow and retries.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = auth_service(&state)?;
    let result = service.login(&request.email, &request.password).await?;

    Ok(Json(auth_response(result)))
}

/// Sign in with an OAuth provider ID token.
///
/// POST /api/v1/auth/oauth
pub async fn oauth_login(
    State(state): State<AppState>,
    Json(request): Json<OAuthLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = auth_service(&state)?;
    let result = service
        .oauth_login(&request.provider, &request.id_token)
        .await?;

    Ok(Json(auth_response(result)))
}

/// Exchange a refresh token for a fresh token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    request.validate()?;

    let service = auth_service(&state)?;
    let result = service.refresh(&request.refresh_token).await?;

    Ok(Json(TokensResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
    }))
}

/// Invalidate the session tied to the refresh token.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let service = auth_service(&state)?;
    service
        .logout(&request.refresh_token, request.all_devices)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Whether the OTP gate is armed for an email.
///
/// GET /api/v1/auth/otp/status
pub async fn otp_status(
    State(state): State<AppState>,
    Query(query): Query<OtpStatusQuery>,
) -> Result<Json<OtpStatusResponse>, ApiError> {
    query.validate()?;

    let otp_required = otp_service(&state)
        .requires_otp(&query.email.to_lowercase())
        .await?;

    Ok(Json(OtpStatusResponse { otp_required }))
}

/// Issue a verification code for an armed gate.
///
/// POST /api/v1/auth/otp/request
pub async fn otp_request(
    State(state): State<AppState>,
    Json(request): Json<OtpRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    request.validate()?;

    // The code itself goes out via the delivery channel, never in the
    // HTTP response.
    otp_service(&state)
        .issue(&request.email.to_lowercase())
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "Verification code sent".to_string(),
        }),
    ))
}

/// Verify a code, clearing the gate on success.
///
/// POST /api/v1/auth/otp/verify
pub async fn otp_verify(
    State(state): State<AppState>,
    Json(request): Json<OtpVerifyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    otp_service(&state)
        .verify(&request.email.to_lowercase(), &request.code)
        .await?;

    Ok(Json(MessageResponse {
        message: "Verified".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            email: "founder@club.example".to_string(),
            password: "SecureP4ss".to_string(),
            display_name: "Club Founder".to_string(),
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "SecureP4ss".to_string(),
            display_name: "Club Founder".to_string(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_empty_display_name() {
        let request = RegisterRequest {
            email: "founder@club.example".to_string(),
            password: "SecureP4ss".to_string(),
            display_name: "".to_string(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_otp_verify_request_code_length() {
        let request = OtpVerifyRequest {
            email: "fan@club.example".to_string(),
            code: "123".to_string(),
        };
        assert!(request.validate().is_err());

        let request = OtpVerifyRequest {
            email: "fan@club.example".to_string(),
            code: "123456".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_logout_request_defaults_all_devices_false() {
        let request: LogoutRequest =
            serde_json::from_str(r#"{"refreshToken": "token"}"#).unwrap();
        assert!(!request.all_devices);
    }
}
