//! Application services behind the HTTP handlers.

pub mod admin;
pub mod auth;
pub mod layouts;
pub mod otp;

pub use admin::{AdminError, AdminService};
pub use auth::{AuthError, AuthResult, AuthService};
pub use layouts::{LayoutService, ResolvedLayout};
pub use otp::{OtpError, OtpService};
