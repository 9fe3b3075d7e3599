//! Axum extractors for the request identity.
//!
//! The gate never rejects a request on its own; handlers that need an
//! identity ask for one with [`RequireAuth`].
//!
//! # Usage
//!
//! ```ignore
//! use taskmate_axum::{MaybeAuth, RequireAuth};
//!
//! // Requires authentication (401 if not authenticated)
//! async fn protected(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.subject)
//! }
//!
//! // Optional authentication
//! async fn maybe_auth(auth: MaybeAuth) -> String {
//!     match auth.0 {
//!         Some(ctx) => format!("Hello, {}!", ctx.subject),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::IdentityContext;
use crate::error::AuthRejection;

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if the gate did not establish an identity.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub IdentityContext);

impl Deref for RequireAuth {
    type Target = IdentityContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .map(Self)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor for optional authentication.
///
/// Holds `None` for anonymous requests rather than failing.
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<IdentityContext>);

impl Deref for MaybeAuth {
    type Target = Option<IdentityContext>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<IdentityContext>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AuthSource;
    use axum::http::Request;

    #[tokio::test]
    async fn test_require_auth_without_identity() {
        let (mut parts, _) = Request::new(()).into_parts();
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.unwrap_err(), AuthRejection::Unauthenticated);
    }

    #[tokio::test]
    async fn test_require_auth_with_identity() {
        let (mut parts, _) = Request::new(()).into_parts();
        parts
            .extensions
            .insert(IdentityContext::new("user-1", AuthSource::Cookie));

        let auth = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.subject, "user-1");
    }

    #[tokio::test]
    async fn test_maybe_auth_is_none_when_anonymous() {
        let (mut parts, _) = Request::new(()).into_parts();
        let auth = MaybeAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(auth.is_none());
    }
}
