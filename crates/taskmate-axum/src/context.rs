//! Request identity context.
//!
//! The [`IdentityContext`] is written at most once per request by the
//! authentication gate and read by handlers through the extractors.

use taskmate_auth_core::Principal;

/// Role granted to an authenticated caller.
///
/// Every authenticated request currently gets [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Regular user.
    #[default]
    User,
}

impl Role {
    /// Authority string as exposed to clients.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the session token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// `Authorization: Bearer` header.
    BearerToken,
    /// Session cookie.
    Cookie,
}

impl AuthSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BearerToken => "bearer",
            Self::Cookie => "cookie",
        }
    }
}

/// Identity of the caller for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    /// Subject from the validated token.
    pub subject: String,
    /// Granted role.
    pub role: Role,
    /// Where the token came from.
    pub source: AuthSource,
}

impl IdentityContext {
    /// Create a context with the default role.
    #[must_use]
    pub fn new(subject: impl Into<String>, source: AuthSource) -> Self {
        Self {
            subject: subject.into(),
            role: Role::default(),
            source,
        }
    }

    /// The subject as a tagged principal.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::RawSubject(self.subject.clone())
    }
}
