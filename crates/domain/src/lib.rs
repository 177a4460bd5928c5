//! Domain layer for the Club Portal backend.
//!
//! This crate contains:
//! - Domain models (roles, profiles, transfers, layouts, events, content)
//! - Business logic helpers (audit-log building)
//! - Domain error types

pub mod models;
pub mod services;
