//! Configuration for the Auth API service.

use std::time::Duration;

use axum::http::HeaderValue;
use taskmate_auth_core::{AuthConfig, ProviderConfig};
use taskmate_axum::DEFAULT_COOKIE_NAME;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Token signing configuration
    pub auth: AuthConfig,

    /// Magic-link provider configuration
    pub provider: ProviderConfig,

    /// Session cookie settings
    pub cookie: CookieSettings,

    /// Inbound request timeout
    pub request_timeout: Duration,

    /// Origin allowed to call the API with credentials
    pub cors_allowed_origin: HeaderValue,
}

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Cookie name
    pub name: String,
    /// Whether to mark the cookie `Secure`
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            secure: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080u16)?;

        // Signing secret (Base64, at least 32 bytes decoded)
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        // Token lifetime (default 1 hour)
        let expiration_ms = parse_or(&lookup, "JWT_EXPIRATION_MS", 3_600_000u64)?;
        if expiration_ms == 0 {
            return Err(ConfigError::Invalid("JWT_EXPIRATION_MS"));
        }

        let auth = AuthConfig::try_new(&jwt_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_token_ttl(Duration::from_millis(expiration_ms));

        // Session cookie
        let cookie = CookieSettings {
            name: lookup("SESSION_COOKIE_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
        };

        // Magic-link provider (optional; calls fail without it)
        let connect_ms = parse_or(&lookup, "PROVIDER_CONNECT_TIMEOUT_MS", 10_000u64)?;
        let read_ms = parse_or(&lookup, "PROVIDER_READ_TIMEOUT_MS", 10_000u64)?;
        let provider = ProviderConfig::new(lookup("SUPABASE_URL"), lookup("SUPABASE_KEY"))
            .with_timeouts(Duration::from_millis(connect_ms), Duration::from_millis(read_ms));

        // Request timeout (default 30 seconds)
        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;

        // Browser origin allowed to send credentials
        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|| "http://localhost:4200".to_string())
            .parse::<HeaderValue>()
            .map_err(|_| ConfigError::Invalid("CORS_ALLOWED_ORIGIN"))?;

        Ok(Self {
            http_port,
            database_url,
            auth,
            provider,
            cookie,
            request_timeout: Duration::from_secs(request_timeout_secs),
            cors_allowed_origin,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
