//! # Carebook Auth
//!
//! Token issuance and validation, credential management and the server-side
//! authenticator.
//!
//! - [`claims`]: The signed payload shared by access and refresh tokens
//! - [`jwt`]: [`TokenIssuer`], [`TokenValidator`] and [`TokenStatus`]
//! - [`credentials`]: [`CredentialService`], the one place passwords are hashed
//! - [`authenticator`]: [`Authenticator`] for login, refresh and request gating
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use carebook_auth::{Authenticator, CredentialService};
//! use carebook_config::{JwtConfig, PasswordConfig};
//! use carebook_db::MemoryCredentialStore;
//!
//! let credentials = CredentialService::new(
//!     Arc::new(MemoryCredentialStore::new()),
//!     PasswordConfig::default(),
//! )?;
//! let auth = Authenticator::new(credentials, &JwtConfig::from_env()?)?;
//!
//! let outcome = auth.login("admin@example.com", "Admin123!").await?;
//! let claims = auth.authorize(&outcome.tokens.access_token)?;
//! ```

pub mod authenticator;
pub mod claims;
pub mod credentials;
pub mod jwt;

pub use authenticator::{Authenticator, LoginOutcome};
pub use claims::{TokenClaims, TokenKind};
pub use credentials::{CredentialService, NewAccount};
pub use jwt::{TokenIssuer, TokenStatus, TokenValidator, inspect_claims};
