//! Password hashing backed by bcrypt.
//!
//! Digests embed their salt and cost factor, so verification needs only the
//! digest itself. The cost used for new digests comes from
//! `PasswordConfig::bcrypt_cost` and must lie within [`MIN_COST`]..=[`MAX_COST`].
//!
//! bcrypt only reads the first 72 bytes of its input, including a trailing
//! NUL. Longer passwords are rejected instead of silently cut, so two
//! passwords sharing a long prefix never collide.

use bcrypt::{BcryptError, HashParts, non_truncating_hash, non_truncating_verify};

use crate::errors::AuthError;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Longest password, in bytes, that bcrypt hashes without truncation.
pub const MAX_PASSWORD_BYTES: usize = 71;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(AuthError::config(format!(
            "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
        )));
    }

    non_truncating_hash(password, cost).map_err(|e| match e {
        BcryptError::CostNotAllowed(c) => AuthError::config(format!("bcrypt cost {c} not allowed")),
        BcryptError::Truncation(_) => AuthError::PasswordPolicy(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )),
        other => AuthError::PasswordPolicy(format!("Failed to hash password: {other}")),
    })
}

/// Compares `password` against a stored digest.
///
/// A digest that cannot be parsed never matches; it is logged rather than
/// surfaced so callers see the same outcome as a wrong password. So is a
/// password longer than [`MAX_PASSWORD_BYTES`].
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    match non_truncating_verify(password, digest) {
        Ok(matches) => Ok(matches),
        Err(BcryptError::Truncation(_)) => Ok(false),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password digest could not be verified");
            Ok(false)
        }
    }
}

/// Cost factor embedded in a digest, if it parses.
pub fn digest_cost(digest: &str) -> Option<u32> {
    digest.parse::<HashParts>().ok().map(|parts| parts.get_cost())
}
