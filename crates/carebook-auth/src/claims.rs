//! JWT claim structures for authentication tokens.
//!
//! Access and refresh tokens share one payload shape, [`TokenClaims`], and are
//! told apart by the `typ` claim so a refresh token can never pass the
//! request gate and an access token can never be exchanged for new tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use carebook_core::AuthError;
use carebook_models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed token payload.
///
/// # Fields
///
/// - `sub`: Account ID (subject)
/// - `iss`: Issuer identity, checked on validation
/// - `role`: Account role at issue time
/// - `typ`: Access or refresh
/// - `iat`: Issued-at (Unix timestamp, seconds)
/// - `exp`: Expiry (Unix timestamp, seconds)
/// - `jti`: Unique token identifier, present on refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    pub sub: String,
    pub iss: String,
    pub role: UserRole,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl TokenClaims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenMalformed)
    }

    /// True when the token should be treated as dead at `now`: it has
    /// expired or will within `grace` seconds.
    pub fn is_expired_at(&self, now: i64, grace: i64) -> bool {
        is_expired(self.exp, now, grace)
    }
}

pub(crate) fn is_expired(exp: i64, now: i64, grace: i64) -> bool {
    exp <= now.saturating_add(grace)
}
