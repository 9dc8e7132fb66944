//! # Carebook Config
//!
//! Configuration types for the Carebook API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Token signing secret, issuer, lifetimes and expiry grace
//! - [`password`]: Password hashing cost and policy
//! - [`database`]: Connection parameters for the credential database
//! - [`server`]: Listen address for the HTTP server
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//!
//! Loaders for required settings return
//! [`AuthError::ConfigurationMissing`](carebook_core::AuthError::ConfigurationMissing);
//! the server treats that as fatal at startup.
//!
//! # Example
//!
//! ```ignore
//! use carebook_config::{CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let password_config = PasswordConfig::from_env()?;
//! let database_config = DatabaseConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
mod env;
pub mod jwt;
pub mod password;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;
