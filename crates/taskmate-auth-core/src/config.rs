//! Configuration types for the auth core

use std::time::Duration;

use crate::key::{KeyError, SigningKey};
use crate::AuthError;

/// Token issuing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for session token signing
    pub signing_key: SigningKey,
    /// Lifetime of issued session tokens
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Default session token lifetime (1 hour)
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

    /// Create a new auth config with the default token lifetime
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            token_ttl: Self::DEFAULT_TOKEN_TTL,
        }
    }

    /// Create a config from a Base64 signing secret
    ///
    /// # Errors
    /// Returns error if the secret is missing, not Base64, or too short.
    pub fn try_new(secret_base64: &str) -> Result<Self, KeyError> {
        SigningKey::from_base64(secret_base64).map(Self::new)
    }

    /// Set the token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

/// Upstream identity provider (magic-link) configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// Provider base URL, without trailing slash
    pub base_url: Option<String>,
    /// Provider API key
    pub api_key: Option<String>,
    /// TCP connect timeout for outbound calls
    pub connect_timeout: Duration,
    /// Read timeout for outbound calls
    pub read_timeout: Duration,
}

impl ProviderConfig {
    /// Default connect and read timeout (10 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Sub-path of the passwordless login endpoint
    pub const OTP_PATH: &'static str = "/auth/v1/otp";

    /// Create a provider config; blank values are treated as unset
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            base_url,
            api_key,
            connect_timeout: Self::DEFAULT_TIMEOUT,
            read_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set connect and read timeouts
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Both provider settings, or a configuration error naming what is missing
    pub fn credentials(&self) -> Result<(&str, &str), AuthError> {
        match (self.base_url.as_deref(), self.api_key.as_deref()) {
            (Some(url), Some(key)) => Ok((url, key)),
            (None, _) => Err(AuthError::Configuration(
                "provider base URL is not configured".to_string(),
            )),
            (_, None) => Err(AuthError::Configuration(
                "provider API key is not configured".to_string(),
            )),
        }
    }

    /// Full URL of the passwordless login endpoint
    pub fn otp_url(&self) -> Result<String, AuthError> {
        let (base_url, _) = self.credentials()?;
        Ok(format!("{base_url}{}", Self::OTP_PATH))
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::try_new(&STANDARD.encode([3u8; 32])).unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(3600));

        let config = config.with_token_ttl(Duration::from_millis(1500));
        assert_eq!(config.token_ttl, Duration::from_millis(1500));
    }

    #[test]
    fn test_provider_url_trailing_slash_stripped() {
        let config = ProviderConfig::new(
            Some("https://project.supabase.co///".to_string()),
            Some("anon-key".to_string()),
        );
        assert_eq!(
            config.otp_url().unwrap(),
            "https://project.supabase.co/auth/v1/otp"
        );
    }

    #[test]
    fn test_provider_missing_values() {
        let config = ProviderConfig::new(None, Some("key".to_string()));
        assert!(matches!(
            config.credentials(),
            Err(AuthError::Configuration(_))
        ));

        let config = ProviderConfig::new(
            Some("https://p.example".to_string()),
            Some("  ".to_string()),
        );
        assert!(matches!(
            config.credentials(),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_provider_debug_hides_key() {
        let config = ProviderConfig::new(
            Some("https://p.example".to_string()),
            Some("super-secret-anon-key".to_string()),
        );
        let rendered = format!("{config:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_provider_default_timeouts() {
        let config = ProviderConfig::new(None, None);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
    }
}
