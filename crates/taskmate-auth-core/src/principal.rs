//! Principal to subject resolution

use std::sync::Arc;

use crate::{AuthError, TokenService};

/// Something that identifies a caller
///
/// A principal is either a plain subject string or a signed session token
/// that still needs to be unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    RawSubject(String),
    EncodedToken(String),
}

impl Principal {
    /// Classify a raw value.
    ///
    /// Values with at least three dot-separated segments are treated as
    /// encoded tokens; anything else is taken as a subject as-is. Trailing
    /// empty segments do not count, so `"user.."` is a subject.
    pub fn classify(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim_end_matches('.').split('.').count() >= 3 {
            Self::EncodedToken(value)
        } else {
            Self::RawSubject(value)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::RawSubject(s) | Self::EncodedToken(s) => s,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::EncodedToken(_))
    }
}

/// Turns principals into canonical subject strings
#[derive(Debug, Clone)]
pub struct SubjectResolver {
    tokens: Arc<TokenService>,
}

impl SubjectResolver {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Resolve a principal to its subject.
    ///
    /// Tokens must validate; raw subjects are returned unchanged. Blank
    /// input and invalid tokens both fail with
    /// [`AuthError::SubjectResolutionFailure`].
    pub fn resolve(&self, principal: &Principal) -> Result<String, AuthError> {
        if principal.as_str().trim().is_empty() {
            return Err(AuthError::SubjectResolutionFailure);
        }

        match principal {
            Principal::RawSubject(subject) => Ok(subject.clone()),
            Principal::EncodedToken(token) => self
                .tokens
                .validate(token)
                .map(|validated| validated.subject)
                .map_err(|_| {
                    tracing::debug!("Principal looked like a token but did not validate");
                    AuthError::SubjectResolutionFailure
                }),
        }
    }

    /// Classify and resolve a raw value in one step
    pub fn resolve_raw(&self, value: &str) -> Result<String, AuthError> {
        self.resolve(&Principal::classify(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthConfig, SigningKey};

    fn resolver() -> (SubjectResolver, Arc<TokenService>) {
        let key = SigningKey::new([42u8; 48]).unwrap();
        let tokens = Arc::new(TokenService::new(&AuthConfig::new(key)).unwrap());
        (SubjectResolver::new(Arc::clone(&tokens)), tokens)
    }

    #[test]
    fn test_classify() {
        assert!(Principal::classify("a.b.c").is_token());
        assert!(Principal::classify("a.b.c.d.e").is_token());
        assert!(!Principal::classify("user@example.com").is_token());
        assert!(!Principal::classify("a.b").is_token());
        assert!(!Principal::classify("user..").is_token());
        assert!(!Principal::classify("...").is_token());
        assert!(Principal::classify("a..b").is_token());
        assert!(!Principal::classify("9b2f4c1e-0000-4000-8000-000000000001").is_token());
    }

    #[test]
    fn test_raw_subject_passes_through() {
        let (resolver, _) = resolver();
        assert_eq!(resolver.resolve_raw("user-42").unwrap(), "user-42");
    }

    #[test]
    fn test_token_is_unpacked() {
        let (resolver, tokens) = resolver();
        let token = tokens.issue_for("user-42").unwrap();
        assert_eq!(resolver.resolve_raw(token.as_str()).unwrap(), "user-42");
    }

    #[test]
    fn test_invalid_token_fails() {
        let (resolver, _) = resolver();
        assert!(matches!(
            resolver.resolve_raw("x.y.z"),
            Err(AuthError::SubjectResolutionFailure)
        ));
    }

    #[test]
    fn test_blank_fails() {
        let (resolver, _) = resolver();
        assert!(matches!(
            resolver.resolve_raw(""),
            Err(AuthError::SubjectResolutionFailure)
        ));
        assert!(matches!(
            resolver.resolve(&Principal::RawSubject("  ".into())),
            Err(AuthError::SubjectResolutionFailure)
        ));
    }
}
