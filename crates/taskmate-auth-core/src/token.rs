//! Session token issuing and validation
//!
//! Tokens are compact HS512 JWTs carrying `sub`, `iat` and `exp` plus any
//! extra claims. Nothing is stored server-side: a token is valid exactly when
//! its signature verifies, it has not expired, and its subject is non-empty.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AuthConfig, AuthError};

/// Claim names the token service always computes itself
const REGISTERED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (canonical user ID)
    pub sub: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
    /// Caller-supplied claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A freshly issued, signed session token
#[derive(Clone)]
pub struct SessionToken {
    token: String,
    subject: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Compact serialized form
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Consume into the compact serialized form
    pub fn into_string(self) -> String {
        self.token
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("subject", &self.subject)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedToken {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub claims: Map<String, Value>,
}

/// Issues and validates session tokens with the process signing key
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Arc<Validation>,
    ttl: ChronoDuration,
}

impl TokenService {
    /// Create a token service from auth configuration
    ///
    /// # Errors
    /// Returns a configuration error if the TTL is out of range.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let ttl = ChronoDuration::from_std(config.token_ttl)
            .map_err(|_| AuthError::Configuration("token TTL out of range".to_string()))?;

        // Expiry is checked by hand so the boundary is strict and leeway-free.
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["sub".to_string(), "exp".to_string()]);

        Ok(Self {
            encoding_key: config.signing_key.encoding_key(),
            decoding_key: config.signing_key.decoding_key(),
            validation: Arc::new(validation),
            ttl,
        })
    }

    /// Token lifetime
    pub fn ttl(&self) -> ChronoDuration {
        self.ttl
    }

    /// Issue a token for `subject` with no extra claims
    pub fn issue_for(&self, subject: &str) -> Result<SessionToken, AuthError> {
        self.issue(subject, Map::new())
    }

    /// Issue a token for `subject` carrying `extra_claims`
    pub fn issue(
        &self,
        subject: &str,
        extra_claims: Map<String, Value>,
    ) -> Result<SessionToken, AuthError> {
        self.issue_at(subject, extra_claims, Utc::now())
    }

    /// Issue a token as of `now`
    ///
    /// Registered claims (`sub`, `iat`, `exp`) in `extra_claims` are dropped.
    pub fn issue_at(
        &self,
        subject: &str,
        mut extra_claims: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        if subject.trim().is_empty() {
            tracing::debug!("Refusing to issue token for empty subject");
            return Err(AuthError::TokenInvalid);
        }

        for name in REGISTERED_CLAIMS {
            extra_claims.remove(name);
        }

        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            tracing::error!(ttl_secs = self.ttl.num_seconds(), "Token expiry overflows");
            AuthError::Internal("token expiry out of range".to_string())
        })?;
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            extra: extra_claims,
        };

        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to sign session token");
                AuthError::Internal("failed to sign session token".to_string())
            })?;

        Ok(SessionToken {
            token,
            subject: claims.sub,
            issued_at: timestamp_to_utc(claims.iat),
            expires_at: timestamp_to_utc(claims.exp),
        })
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> Result<ValidatedToken, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`
    ///
    /// Checks signature, then expiry (`now < exp`), then subject. Every
    /// failure is reported as [`AuthError::TokenInvalid`]; the specific
    /// reason only goes to the debug log.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ValidatedToken, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!(error = %e, "Token signature or structure rejected");
                AuthError::TokenInvalid
            },
        )?;

        let claims = data.claims;

        if now.timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(AuthError::TokenInvalid);
        }

        if claims.sub.trim().is_empty() {
            tracing::debug!("Token has empty subject");
            return Err(AuthError::TokenInvalid);
        }

        Ok(ValidatedToken {
            subject: claims.sub,
            issued_at: timestamp_to_utc(claims.iat),
            expires_at: timestamp_to_utc(claims.exp),
            claims: claims.extra,
        })
    }

    /// Subject of a valid token, or `None` for anything else
    pub fn extract_subject(&self, token: &str) -> Option<String> {
        self.validate(token).ok().map(|validated| validated.subject)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

fn timestamp_to_utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SigningKey;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use std::time::Duration;

    fn service() -> TokenService {
        let key = SigningKey::new(b"unit-test-signing-key-material-0123456789").unwrap();
        TokenService::new(&AuthConfig::new(key)).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_issue_sets_ttl() {
        let tokens = service();
        let now = at(1_700_000_000);
        let token = tokens.issue_at("user-1", Map::new(), now).unwrap();

        assert_eq!(token.subject(), "user-1");
        assert_eq!(token.issued_at(), now);
        assert_eq!(token.expires_at(), now + ChronoDuration::hours(1));
        assert_eq!(token.as_str().split('.').count(), 3);
    }

    #[test]
    fn test_huge_ttl_is_error_not_panic() {
        let key = SigningKey::new(b"unit-test-signing-key-material-0123456789").unwrap();
        let config = AuthConfig::new(key).with_token_ttl(Duration::from_secs(9_000_000_000_000));
        let tokens = TokenService::new(&config).unwrap();

        let result = tokens.issue_at("user-1", Map::new(), at(1_700_000_000));
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_round_trip() {
        let tokens = service();
        let token = tokens.issue_for("9b2f4c1e-0000-4000-8000-000000000001").unwrap();
        let validated = tokens.validate(token.as_str()).unwrap();
        assert_eq!(validated.subject, "9b2f4c1e-0000-4000-8000-000000000001");
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let tokens = service();
        let issued = at(1_700_000_000);
        let token = tokens.issue_at("user-1", Map::new(), issued).unwrap();
        let exp = token.expires_at();

        assert!(tokens.validate_at(token.as_str(), exp).is_err());
        assert!(tokens
            .validate_at(token.as_str(), exp - ChronoDuration::seconds(1))
            .is_ok());
        assert!(tokens
            .validate_at(token.as_str(), exp + ChronoDuration::seconds(1))
            .is_err());
    }

    #[test]
    fn test_extra_claims_round_trip_and_cannot_override() {
        let tokens = service();
        let mut extra = Map::new();
        extra.insert("role".to_string(), Value::from("user"));
        extra.insert("sub".to_string(), Value::from("attacker"));
        extra.insert("exp".to_string(), Value::from(i64::MAX));

        let token = tokens.issue("user-1", extra).unwrap();
        let validated = tokens.validate(token.as_str()).unwrap();

        assert_eq!(validated.subject, "user-1");
        assert_eq!(validated.claims.get("role"), Some(&Value::from("user")));
        assert!(!validated.claims.contains_key("sub"));
        assert!(validated.expires_at < Utc::now() + ChronoDuration::hours(2));
    }

    #[test]
    fn test_empty_subject_refused() {
        let tokens = service();
        assert!(matches!(
            tokens.issue_for("   "),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = service();
        let other = TokenService::new(&AuthConfig::new(
            SigningKey::new(b"a-completely-different-signing-key-bytes!!").unwrap(),
        ))
        .unwrap();

        let token = signer.issue_for("user-1").unwrap();
        assert!(matches!(
            other.validate(token.as_str()),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let tokens = service();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"user-1","iat":1,"exp":99999999999}"#);
        let forged = format!("{header}.{payload}.");

        assert!(tokens.validate(&forged).is_err());
        assert_eq!(tokens.extract_subject(&forged), None);
    }

    #[test]
    fn test_extract_subject_never_fails() {
        let tokens = service();
        assert_eq!(tokens.extract_subject(""), None);
        assert_eq!(tokens.extract_subject("a.b.c"), None);
        assert_eq!(tokens.extract_subject("no-dots-at-all"), None);

        let token = tokens.issue_for("user-7").unwrap();
        assert_eq!(tokens.extract_subject(token.as_str()), Some("user-7".to_string()));
    }

    #[test]
    fn test_sub_second_ttl_yields_token_valid_until_exp() {
        let key = SigningKey::new([9u8; 32]).unwrap();
        let config = AuthConfig::new(key).with_token_ttl(Duration::from_millis(2500));
        let tokens = TokenService::new(&config).unwrap();
        let now = at(1_700_000_000);
        let token = tokens.issue_at("user-1", Map::new(), now).unwrap();
        assert_eq!(token.expires_at(), at(1_700_000_002));
    }
}
