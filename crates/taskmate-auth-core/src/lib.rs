//! Taskmate Auth Core - Authentication business logic
//!
//! Session token issuing and validation, credential login, principal
//! resolution, and magic-link forwarding to the identity provider.
//!
//! # Example
//!
//! ```rust,ignore
//! use taskmate_auth_core::{AuthConfig, AuthService, ProviderConfig};
//!
//! let auth_config = AuthConfig::try_new(&jwt_secret_b64)?;
//! let service = AuthService::new(&auth_config, ProviderConfig::new(url, key), repo)?;
//!
//! let token = service.login("user@example.com", "password").await?;
//! let validated = service.validate_token(token.as_str())?;
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod key;
pub mod magic_link;
pub mod password;
pub mod principal;
pub mod service;
pub mod token;

pub use config::{AuthConfig, ProviderConfig};
pub use credential::{normalize_email, CredentialAuthenticator};
pub use error::{AuthError, UpstreamError};
pub use key::{KeyError, SigningKey};
pub use magic_link::{triage_response, MagicLinkForwarder};
pub use password::{Argon2Hasher, HashScheme, PasswordError, PasswordHasher};
pub use principal::{Principal, SubjectResolver};
pub use service::AuthService;
pub use token::{SessionClaims, SessionToken, TokenService, ValidatedToken};
