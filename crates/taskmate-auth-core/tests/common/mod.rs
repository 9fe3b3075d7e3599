//! Common test utilities for taskmate-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{FailingCredentialRepository, MockCredentialRepository};
