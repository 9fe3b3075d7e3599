//! Mock repositories for testing

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskmate_auth_core::{Argon2Hasher, PasswordHasher};
use taskmate_db::{CredentialRepository, CredentialRow, DbError, DbResult};
use uuid::Uuid;

/// In-memory credential repository for testing
#[derive(Default, Clone)]
pub struct MockCredentialRepository {
    by_email: Arc<DashMap<String, CredentialRow>>,
    lookups: Arc<AtomicUsize>,
}

impl MockCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a credential directly
    pub fn insert(&self, row: CredentialRow) {
        self.by_email.insert(row.email.clone(), row);
    }

    /// Create and insert a user with an Argon2 hash of `password`
    pub fn insert_user(&self, email: &str, password: &str) -> CredentialRow {
        let row = CredentialRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            encrypted_password: Argon2Hasher::new().hash(password).unwrap(),
        };
        self.insert(row.clone());
        row
    }

    /// Number of `find_by_email` calls so far
    #[allow(dead_code)]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<CredentialRow>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_email.get(email).map(|r| r.value().clone()))
    }
}

/// Repository whose every call fails
#[derive(Default, Clone)]
pub struct FailingCredentialRepository;

#[async_trait]
impl CredentialRepository for FailingCredentialRepository {
    async fn find_by_email(&self, _email: &str) -> DbResult<Option<CredentialRow>> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}
