//! # Carebook Models
//!
//! Domain models and DTOs for the Carebook API.
//!
//! # Modules
//!
//! - [`users`]: Account roles, credential records and profiles
//! - [`auth`]: Login, refresh, registration and password request/response bodies
//!
//! # Example
//!
//! ```ignore
//! use carebook_models::users::{CredentialRecord, UserRole};
//! use carebook_models::auth::{LoginRequest, TokenPair};
//!
//! if record.role == UserRole::Admin {
//!     println!("{} may manage accounts", record.email);
//! }
//! ```

pub mod auth;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    ChangePasswordRequest, CreateAccountRequest, EmailVerifiedRequest, LoginRequest,
    LoginResponse, MessageResponse, RefreshRequest, RegisterRequest, ResetPasswordRequest,
    TokenPair,
};
pub use users::{CredentialRecord, NewCredential, UserProfile, UserRole};
