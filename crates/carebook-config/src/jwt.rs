//! Token signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC-SHA256 signing secret, at least 32 bytes (required)
//! - `JWT_ISSUER`: value of the `iss` claim (default: `carebook`)
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: 900)
//! - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default: 604800)
//! - `JWT_EXPIRY_GRACE_SECS`: tokens this close to expiry count as expired (default: 30)

use carebook_core::AuthError;

use crate::env::{parsed_or, required};

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_ISSUER: &str = "carebook";
pub const DEFAULT_ACCESS_EXPIRY: i64 = 900; // 15 minutes
pub const DEFAULT_REFRESH_EXPIRY: i64 = 604_800; // 7 days
pub const DEFAULT_EXPIRY_GRACE: i64 = 30;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub expiry_grace: i64,
}

impl JwtConfig {
    /// Config with the given secret and default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_expiry: DEFAULT_ACCESS_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_EXPIRY,
            expiry_grace: DEFAULT_EXPIRY_GRACE,
        }
    }

    pub fn from_env() -> Result<Self, AuthError> {
        let config = Self {
            secret: required("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            access_token_expiry: parsed_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY)?,
            refresh_token_expiry: parsed_or("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY)?,
            expiry_grace: parsed_or("JWT_EXPIRY_GRACE_SECS", DEFAULT_EXPIRY_GRACE)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no token could be safely issued under.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.secret.trim().is_empty() {
            return Err(AuthError::config("JWT_SECRET must be set"));
        }
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::config(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.issuer.trim().is_empty() {
            return Err(AuthError::config("JWT_ISSUER must not be blank"));
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err(AuthError::config("token lifetimes must be positive"));
        }
        if self.expiry_grace < 0 {
            return Err(AuthError::config("JWT_EXPIRY_GRACE_SECS must not be negative"));
        }
        if self.expiry_grace >= self.access_token_expiry {
            return Err(AuthError::config(
                "JWT_EXPIRY_GRACE_SECS must be shorter than the access token lifetime",
            ));
        }
        Ok(())
    }
}
