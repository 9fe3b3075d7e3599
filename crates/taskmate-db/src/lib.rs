//! Taskmate DB - Credential store
//!
//! SQLx-based access to the `auth.users` table that backs password login.
//! The auth core only ever reads from it.
//!
//! # Example
//!
//! ```rust,ignore
//! use taskmate_db::{create_pool, CredentialRepository, Repositories};
//!
//! let pool = create_pool("postgres://localhost/taskmate").await?;
//! let repos = Repositories::new(pool);
//!
//! let credential = repos.credentials.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolOptions};
pub use repo::*;
