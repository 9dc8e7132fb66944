//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use carebook_core::AuthError;
use carebook_models::{CredentialRecord, NewCredential};

use crate::store::CredentialStore;

const RECORD_COLUMNS: &str =
    "id, email, role, password_digest, email_verified, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

fn storage_error(err: sqlx::Error) -> AuthError {
    tracing::error!(error = %err, "Credential store query failed");
    AuthError::storage(err)
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self))]
    async fn find_by_identity(&self, email: &str) -> Result<Option<CredentialRecord>, AuthError> {
        sqlx::query_as::<_, CredentialRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM credentials WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>, AuthError> {
        sqlx::query_as::<_, CredentialRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM credentials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error)
    }

    #[instrument(skip(self, credential), fields(email = %credential.email, role = %credential.role))]
    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, AuthError> {
        sqlx::query_as::<_, CredentialRecord>(&format!(
            "INSERT INTO credentials (email, role, password_digest, email_verified)
             VALUES ($1, $2, $3, $4)
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(&credential.email)
        .bind(credential.role)
        .bind(&credential.password_digest)
        .bind(credential.email_verified)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AuthError::IdentityTaken
            }
            other => storage_error(other),
        })
    }

    #[instrument(skip(self, digest))]
    async fn update_digest(&self, email: &str, digest: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE credentials SET password_digest = $1, updated_at = NOW() WHERE email = $2",
        )
        .bind(digest)
        .bind(email)
        .execute(&self.db)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::AccountNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_email_verified(&self, id: Uuid, verified: bool) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE credentials SET email_verified = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(verified)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::AccountNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM credentials WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}
