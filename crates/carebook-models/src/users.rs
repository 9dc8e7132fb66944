//! Account models.
//!
//! - [`UserRole`] - The three account roles
//! - [`CredentialRecord`] - A persisted account with its password digest
//! - [`NewCredential`] - Insert payload for a new account
//! - [`UserProfile`] - The digest-free view of an account returned by the API

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role carried by an account and embedded in every token it is issued.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    #[default]
    Patient,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Doctor, UserRole::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Doctor => "doctor",
            UserRole::Patient => "patient",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "doctor" => Ok(UserRole::Doctor),
            "patient" => Ok(UserRole::Patient),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A persisted account.
///
/// `password_digest` is a bcrypt digest; the plaintext password is never
/// stored. The record is intentionally not `Serialize` and its `Debug`
/// output redacts the digest.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub password_digest: String,
    pub email_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password_digest", &"<redacted>")
            .field("email_verified", &self.email_verified)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Insert payload for a new account. The digest is produced by the
/// credential service, never by callers of the store.
#[derive(Clone)]
pub struct NewCredential {
    pub email: String,
    pub role: UserRole,
    pub password_digest: String,
    pub email_verified: bool,
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("email_verified", &self.email_verified)
            .finish_non_exhaustive()
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&CredentialRecord> for UserProfile {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            role: record.role,
            email_verified: record.email_verified,
            created_at: record.created_at,
        }
    }
}
