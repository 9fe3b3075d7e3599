//! Repository traits
//!
//! Async interfaces over the credential store. Implementations must be
//! shareable across request tasks.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::models::CredentialRow;

/// Read access to stored credentials
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Find a credential by its (already normalized) email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<CredentialRow>>;
}
