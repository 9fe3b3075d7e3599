//! Auth service - ties together login, token validation, subject resolution
//! and magic-link forwarding

use std::sync::Arc;

use taskmate_db::CredentialRepository;

use crate::{
    config::{AuthConfig, ProviderConfig},
    credential::{normalize_email, CredentialAuthenticator},
    magic_link::MagicLinkForwarder,
    principal::{Principal, SubjectResolver},
    token::{SessionToken, TokenService, ValidatedToken},
    AuthError,
};

/// Authentication service
///
/// Provides unified interface for:
/// - Credential login (email/password to session token)
/// - Session token validation
/// - Principal to subject resolution
/// - Magic-link forwarding to the identity provider
pub struct AuthService<R: CredentialRepository + ?Sized> {
    tokens: Arc<TokenService>,
    resolver: SubjectResolver,
    authenticator: CredentialAuthenticator<R>,
    forwarder: MagicLinkForwarder,
}

impl<R: CredentialRepository + ?Sized> AuthService<R> {
    /// Create a new auth service
    ///
    /// # Errors
    /// Returns a configuration error if the token service or provider
    /// client cannot be built.
    pub fn new(
        auth_config: &AuthConfig,
        provider_config: ProviderConfig,
        credential_repo: Arc<R>,
    ) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::new(auth_config)?);

        Ok(Self {
            resolver: SubjectResolver::new(Arc::clone(&tokens)),
            authenticator: CredentialAuthenticator::new(credential_repo, Arc::clone(&tokens)),
            forwarder: MagicLinkForwarder::new(provider_config)?,
            tokens,
        })
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Verify credentials and issue a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionToken, AuthError> {
        self.authenticator.authenticate(email, password).await
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Validate a session token
    pub fn validate_token(&self, token: &str) -> Result<ValidatedToken, AuthError> {
        self.tokens.validate(token)
    }

    /// Resolve a principal to its canonical subject
    pub fn resolve_principal(&self, principal: &Principal) -> Result<String, AuthError> {
        self.resolver.resolve(principal)
    }

    /// Shared token service, for the request gate
    pub fn tokens(&self) -> Arc<TokenService> {
        Arc::clone(&self.tokens)
    }

    /// Lifetime of issued tokens
    pub fn token_ttl(&self) -> chrono::Duration {
        self.tokens.ttl()
    }

    // =========================================================================
    // Magic link
    // =========================================================================

    /// Forward a magic-link request to the identity provider
    pub async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::MalformedRequest("Email is required".to_string()));
        }
        self.forwarder.send_magic_link(&email, redirect_to).await
    }
}
