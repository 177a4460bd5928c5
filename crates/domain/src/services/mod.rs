//! Domain services for Club Portal.
//!
//! Services contain business logic that operates on domain models.

pub mod audit;
pub mod layout_resolution;

pub use audit::{audit_helpers, AuditLogBuilder};
pub use layout_resolution::{resolve_layout, LayoutResolution, ResolutionSource};
