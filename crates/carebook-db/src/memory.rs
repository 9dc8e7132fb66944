//! In-process credential store.
//!
//! Holds records in a `HashMap` behind a `tokio::sync::RwLock`. Used by the
//! server's test suite, the session client tests and anywhere a database is
//! not available.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use carebook_core::AuthError;
use carebook_models::{CredentialRecord, NewCredential};

use crate::store::CredentialStore;

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<Uuid, CredentialRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_identity(&self, email: &str) -> Result<Option<CredentialRecord>, AuthError> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, AuthError> {
        let mut records = self.records.write().await;
        if records.values().any(|r| r.email == credential.email) {
            return Err(AuthError::IdentityTaken);
        }

        let now = Utc::now();
        let record = CredentialRecord {
            id: Uuid::new_v4(),
            email: credential.email,
            role: credential.role,
            password_digest: credential.password_digest,
            email_verified: credential.email_verified,
            created_at: now,
            updated_at: now,
        };
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_digest(&self, email: &str, digest: &str) -> Result<(), AuthError> {
        let mut records = self.records.write().await;
        let record = records
            .values_mut()
            .find(|r| r.email == email)
            .ok_or(AuthError::AccountNotFound)?;
        record.password_digest = digest.to_string();
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn set_email_verified(&self, id: Uuid, verified: bool) -> Result<(), AuthError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(AuthError::AccountNotFound)?;
        record.email_verified = verified;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebook_models::UserRole;

    fn new_credential(email: &str) -> NewCredential {
        NewCredential {
            email: email.to_string(),
            role: UserRole::Patient,
            password_digest: "$2b$04$digest".to_string(),
            email_verified: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryCredentialStore::new();
        let record = store.insert(new_credential("p@example.com")).await.unwrap();

        let by_email = store.find_by_identity("p@example.com").await.unwrap();
        assert_eq!(by_email.as_ref().map(|r| r.id), Some(record.id));

        let by_id = store.find_by_id(record.id).await.unwrap();
        assert_eq!(by_id.map(|r| r.email), Some("p@example.com".to_string()));

        assert!(store.find_by_identity("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_identity_rejected() {
        let store = MemoryCredentialStore::new();
        store.insert(new_credential("dup@example.com")).await.unwrap();
        let result = store.insert(new_credential("dup@example.com")).await;
        assert!(matches!(result, Err(AuthError::IdentityTaken)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_digest() {
        let store = MemoryCredentialStore::new();
        store.insert(new_credential("p@example.com")).await.unwrap();
        store
            .update_digest("p@example.com", "$2b$04$other")
            .await
            .unwrap();

        let record = store.find_by_identity("p@example.com").await.unwrap().unwrap();
        assert_eq!(record.password_digest, "$2b$04$other");

        let missing = store.update_digest("ghost@example.com", "x").await;
        assert!(matches!(missing, Err(AuthError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_set_email_verified_and_delete() {
        let store = MemoryCredentialStore::new();
        let record = store.insert(new_credential("p@example.com")).await.unwrap();

        store.set_email_verified(record.id, true).await.unwrap();
        assert!(store.find_by_id(record.id).await.unwrap().unwrap().email_verified);

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
