//! PostgreSQL repository implementations

mod credential;

pub use credential::PgCredentialRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub credentials: PgCredentialRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            credentials: PgCredentialRepository::new(pool),
        }
    }
}
