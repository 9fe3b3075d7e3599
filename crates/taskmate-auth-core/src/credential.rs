//! Email/password login
//!
//! Every way a login can fail (unknown email, wrong password, broken store or
//! hash) surfaces to the caller as the same [`AuthError::InvalidCredentials`].
//! The real cause is only visible in the logs.

use std::sync::Arc;

use taskmate_db::CredentialRepository;

use crate::password::{Argon2Hasher, PasswordHasher};
use crate::{AuthError, SessionToken, TokenService};

/// Verified against when the email is unknown so both failure paths hash.
const DUMMY_PASSWORD: &str = "taskmate-dummy-password";

/// Why a login attempt failed, before collapsing
#[derive(Debug)]
enum LoginFailure {
    UnknownEmail,
    WrongPassword,
    Internal(String),
}

impl From<LoginFailure> for AuthError {
    fn from(failure: LoginFailure) -> Self {
        match failure {
            LoginFailure::UnknownEmail => {
                tracing::debug!("Login failed: no credential for email");
            }
            LoginFailure::WrongPassword => {
                tracing::debug!("Login failed: password mismatch");
            }
            LoginFailure::Internal(cause) => {
                tracing::error!(error = %cause, "Login failed on internal error");
            }
        }
        AuthError::InvalidCredentials
    }
}

/// Trim and lowercase an email for lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verifies email/password pairs and issues session tokens
pub struct CredentialAuthenticator<
    R: CredentialRepository + ?Sized,
    H: PasswordHasher = Argon2Hasher,
> {
    repo: Arc<R>,
    hasher: H,
    tokens: Arc<TokenService>,
    dummy_hash: Option<String>,
}

impl<R: CredentialRepository + ?Sized> CredentialAuthenticator<R, Argon2Hasher> {
    /// Create an authenticator using Argon2 hashes
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self::with_hasher(repo, tokens, Argon2Hasher::new())
    }
}

impl<R: CredentialRepository + ?Sized, H: PasswordHasher> CredentialAuthenticator<R, H> {
    /// Create an authenticator with a custom hasher
    pub fn with_hasher(repo: Arc<R>, tokens: Arc<TokenService>, hasher: H) -> Self {
        let dummy_hash = match hasher.hash(DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Could not prepare dummy hash for unknown-email logins");
                None
            }
        };

        Self {
            repo,
            hasher,
            tokens,
            dummy_hash,
        }
    }

    /// Verify an email/password pair and issue a session token for the user.
    ///
    /// # Errors
    /// - [`AuthError::MalformedRequest`] if either field is blank
    /// - [`AuthError::InvalidCredentials`] for every other failure
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MalformedRequest(
                "email and password are required".to_string(),
            ));
        }

        let token = self.try_authenticate(&email, password).await?;
        tracing::info!(subject = %token.subject(), "Login succeeded");
        Ok(token)
    }

    async fn try_authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, LoginFailure> {
        let credential = self
            .repo
            .find_by_email(email)
            .await
            .map_err(|e| LoginFailure::Internal(format!("credential lookup: {e}")))?;

        let Some(credential) = credential else {
            if let Some(dummy) = &self.dummy_hash {
                let _ = self.hasher.verify(password, dummy);
            }
            return Err(LoginFailure::UnknownEmail);
        };

        let matches = self
            .hasher
            .verify(password, &credential.encrypted_password)
            .map_err(|e| {
                LoginFailure::Internal(format!("stored hash for {}: {e}", credential.id))
            })?;

        if !matches {
            return Err(LoginFailure::WrongPassword);
        }

        self.tokens
            .issue_for(&credential.subject())
            .map_err(|e| LoginFailure::Internal(format!("token issue: {e}")))
    }
}

impl<R, H> std::fmt::Debug for CredentialAuthenticator<R, H>
where
    R: CredentialRepository + ?Sized,
    H: PasswordHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAuthenticator")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
