//! Application state

use std::ops::Deref;
use std::sync::Arc;

use cookie::{Cookie, SameSite};
use taskmate_auth_core::{AuthError, AuthService, TokenService};
use taskmate_db::{CredentialRepository, DbPool};

use crate::config::Config;

/// Auth service over a type-erased credential store
pub type AuthServiceImpl = AuthService<dyn CredentialRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for login, token validation and magic links
    pub auth: Arc<AuthServiceImpl>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    ///
    /// # Errors
    /// Returns error if the auth service cannot be built from `config`.
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        pool: DbPool,
        config: Config,
    ) -> Result<Self, AuthError> {
        let auth = AuthService::new(&config.auth, config.provider.clone(), credentials)?;

        Ok(Self {
            auth: Arc::new(auth),
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        })
    }

    /// Token service shared with the authentication gate
    pub fn tokens(&self) -> Arc<TokenService> {
        self.auth.tokens()
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }

    /// Session cookie carrying `token`, living as long as the token
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        let max_age = self.auth.token_ttl().num_seconds();
        self.build_cookie(token.to_string(), max_age)
    }

    /// Expired, empty session cookie
    pub fn cleared_cookie(&self) -> Cookie<'static> {
        self.build_cookie(String::new(), 0)
    }

    fn build_cookie(&self, value: String, max_age_secs: i64) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.config.cookie.name.clone(), value);
        cookie.set_http_only(true);
        cookie.set_secure(self.config.cookie.secure);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(cookie::time::Duration::seconds(max_age_secs));
        cookie
    }
}
