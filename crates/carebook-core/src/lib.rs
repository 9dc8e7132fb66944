//! # Carebook Core
//!
//! Core types, errors, and utilities for the Carebook API.
//!
//! This crate provides foundational types used throughout the Carebook workspace:
//!
//! - [`errors`]: The authentication error taxonomy and the HTTP-facing [`AppError`]
//! - [`password`]: Salted password hashing and verification (bcrypt)
//!
//! # Example
//!
//! ```ignore
//! use carebook_core::{AppError, AuthError};
//! use carebook_core::password::{hash_password, verify_password};
//!
//! let digest = hash_password("Admin123!", 8)?;
//! assert!(verify_password("Admin123!", &digest)?);
//!
//! // Authentication failures convert into 401 responses
//! let error: AppError = AuthError::InvalidCredentials.into();
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use password::{MAX_PASSWORD_BYTES, digest_cost, hash_password, verify_password};
