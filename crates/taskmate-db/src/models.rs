//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use sqlx::FromRow;
use uuid::Uuid;

/// Credential row from `auth.users`
///
/// `encrypted_password` holds a one-way password hash in PHC string form,
/// never the plaintext.
#[derive(Clone, FromRow)]
pub struct CredentialRow {
    pub id: Uuid,
    pub email: String,
    pub encrypted_password: String,
}

impl CredentialRow {
    /// Canonical subject for tokens issued to this user
    pub fn subject(&self) -> String {
        self.id.to_string()
    }
}

impl std::fmt::Debug for CredentialRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
