//! Tower middleware layer for session authentication.
//!
//! The [`AuthGateLayer`] looks for a session token on every request, and if
//! it validates, stores an [`IdentityContext`] in the request extensions.
//! Requests without a usable token continue anonymously.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, HeaderMap, Request};
use cookie::Cookie;
use taskmate_auth_core::TokenService;
use tower::{Layer, Service};

use crate::context::{AuthSource, IdentityContext};

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "tm_token";

/// Configuration for the authentication gate.
#[derive(Debug, Clone)]
pub struct AuthGateConfig {
    /// Name of the session cookie to read.
    pub cookie_name: String,
}

impl Default for AuthGateConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl AuthGateConfig {
    /// Create a new config builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session cookie name.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }
}

/// Tower layer that establishes request identity from session tokens.
#[derive(Clone)]
pub struct AuthGateLayer {
    tokens: Arc<TokenService>,
    config: AuthGateConfig,
}

impl AuthGateLayer {
    /// Create a new gate layer with the default cookie name.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            config: AuthGateConfig::default(),
        }
    }

    /// Create a new gate layer with custom configuration.
    #[must_use]
    pub fn with_config(tokens: Arc<TokenService>, config: AuthGateConfig) -> Self {
        Self { tokens, config }
    }
}

impl<S> Layer<S> for AuthGateLayer {
    type Service = AuthGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthGateService {
            inner,
            tokens: Arc::clone(&self.tokens),
            config: self.config.clone(),
        }
    }
}

/// The authentication gate service.
#[derive(Clone)]
pub struct AuthGateService<S> {
    inner: S,
    tokens: Arc<TokenService>,
    config: AuthGateConfig,
}

impl<S> AuthGateService<S> {
    /// Find a candidate token: bearer header first, then the session cookie.
    fn extract_candidate(&self, headers: &HeaderMap) -> Option<(String, AuthSource)> {
        if let Some(token) = bearer_token(headers) {
            return Some((token.to_string(), AuthSource::BearerToken));
        }

        cookie_value(headers, &self.config.cookie_name)
            .map(|token| (token, AuthSource::Cookie))
    }

    /// Validate the candidate and build an identity, if any.
    fn authenticate(&self, headers: &HeaderMap) -> Option<IdentityContext> {
        let (token, source) = self.extract_candidate(headers)?;

        match self.tokens.validate(&token) {
            Ok(validated) => Some(IdentityContext::new(validated.subject, source)),
            Err(_) => {
                tracing::warn!(
                    source = source.as_str(),
                    "Rejected session token; continuing anonymously"
                );
                None
            }
        }
    }
}

impl<S, B> Service<Request<B>> for AuthGateService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if req.extensions().get::<IdentityContext>().is_none() {
            if let Some(identity) = self.authenticate(req.headers()) {
                tracing::debug!(subject = %identity.subject, "Request authenticated");
                req.extensions_mut().insert(identity);
            }
        }

        self.inner.call(req)
    }
}

/// Token from `Authorization: Bearer <token>`, if present and non-empty.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Value of the named cookie across all `Cookie` headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
