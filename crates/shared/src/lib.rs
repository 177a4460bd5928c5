//! Shared utilities and common types for the Club Portal backend.
//!
//! This crate provides functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT token issuing and validation
//! - Hashing helpers for one-time codes
//! - Request validation helpers
//! - Cursor pagination

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
