//! JWT (JSON Web Token) issuance and validation.
//!
//! - [`TokenIssuer`] mints HS256-signed access and refresh tokens.
//! - [`TokenValidator`] checks a presented token and reports a
//!   [`TokenStatus`] instead of failing.
//! - [`inspect_claims`] decodes a payload without checking the signature,
//!   for holders of a token who do not hold the secret.
//!
//! # Validation order
//!
//! 1. The payload must decode, otherwise [`TokenStatus::Invalid`].
//! 2. `exp <= now + grace` is [`TokenStatus::Expired`] whatever the signature.
//! 3. Signature and issuer must verify, otherwise [`TokenStatus::Invalid`].
//! 4. The `typ` claim must be the expected [`TokenKind`], otherwise
//!    [`TokenStatus::Invalid`].
//!
//! # Example
//!
//! ```ignore
//! use carebook_auth::{TokenIssuer, TokenKind, TokenStatus, TokenValidator};
//! use carebook_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let issuer = TokenIssuer::new(&config)?;
//! let validator = TokenValidator::new(&config)?;
//!
//! let token = issuer.issue(user_id, UserRole::Doctor, TokenKind::Access)?;
//! match validator.validate(&token, TokenKind::Access) {
//!     TokenStatus::Valid(claims) => println!("role: {}", claims.role),
//!     TokenStatus::Expired => println!("log in again"),
//!     TokenStatus::Invalid => println!("rejected"),
//! }
//! ```

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use carebook_config::JwtConfig;
use carebook_core::AuthError;
use carebook_models::{TokenPair, UserRole};

use crate::claims::{TokenClaims, TokenKind, is_expired};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Mints signed, time-bounded tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// # Errors
    ///
    /// Returns [`AuthError::ConfigurationMissing`] if the secret is absent,
    /// shorter than 32 bytes, or a lifetime is not positive.
    pub fn new(config: &JwtConfig) -> Result<Self, AuthError> {
        config.validate()?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_token_expiry: config.access_token_expiry,
            refresh_token_expiry: config.refresh_token_expiry,
        })
    }

    /// Access token lifetime in seconds.
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    pub fn lifetime(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_token_expiry,
            TokenKind::Refresh => self.refresh_token_expiry,
        }
    }

    pub fn issue(&self, subject: Uuid, role: UserRole, kind: TokenKind) -> Result<String, AuthError> {
        self.issue_at(subject, role, kind, Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject: Uuid,
        role: UserRole,
        kind: TokenKind,
        issued_at: i64,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            role,
            typ: kind,
            iat: issued_at,
            exp: issued_at + self.lifetime(kind),
            jti: match kind {
                TokenKind::Access => None,
                TokenKind::Refresh => Some(Uuid::new_v4().to_string()),
            },
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::config(format!("Failed to sign token: {e}")))
    }

    pub fn issue_pair(&self, subject: Uuid, role: UserRole) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(subject, role, Utc::now().timestamp())
    }

    pub fn issue_pair_at(
        &self,
        subject: Uuid,
        role: UserRole,
        issued_at: i64,
    ) -> Result<TokenPair, AuthError> {
        Ok(TokenPair::bearer(
            self.issue_at(subject, role, TokenKind::Access, issued_at)?,
            self.issue_at(subject, role, TokenKind::Refresh, issued_at)?,
            self.access_token_expiry,
        ))
    }
}

/// Outcome of validating a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(TokenClaims),
    Expired,
    /// Undecodable, bad signature, wrong issuer or wrong kind.
    Invalid,
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid(_))
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            TokenStatus::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<TokenClaims, AuthError> {
        match self {
            TokenStatus::Valid(claims) => Ok(claims),
            TokenStatus::Expired => Err(AuthError::TokenExpired),
            TokenStatus::Invalid => Err(AuthError::TokenMalformed),
        }
    }
}

/// Verifies signature, issuer, kind and expiry of presented tokens.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    grace: i64,
}

impl fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidator")
            .field("grace", &self.grace)
            .finish_non_exhaustive()
    }
}

impl TokenValidator {
    pub fn new(config: &JwtConfig) -> Result<Self, AuthError> {
        config.validate()?;

        // Expiry is checked against the grace window before the signature,
        // so the library's own exp check stays off.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            grace: config.expiry_grace,
        })
    }

    pub fn grace(&self) -> i64 {
        self.grace
    }

    pub fn validate(&self, token: &str, expected: TokenKind) -> TokenStatus {
        self.validate_at(token, expected, Utc::now().timestamp())
    }

    pub fn validate_at(&self, token: &str, expected: TokenKind, now: i64) -> TokenStatus {
        let Ok(unverified) = inspect_claims(token) else {
            return TokenStatus::Invalid;
        };

        if is_expired(unverified.exp, now, self.grace) {
            return TokenStatus::Expired;
        }

        let claims = match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "Token failed verification");
                return TokenStatus::Invalid;
            }
        };

        if claims.typ != expected {
            tracing::debug!(expected = ?expected, actual = ?claims.typ, "Token kind mismatch");
            return TokenStatus::Invalid;
        }

        TokenStatus::Valid(claims)
    }
}

/// Decodes a token's payload WITHOUT verifying its signature.
///
/// Only suitable for local decisions such as skipping a request that is
/// bound to fail; never for granting access.
pub fn inspect_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::TokenMalformed)
}
