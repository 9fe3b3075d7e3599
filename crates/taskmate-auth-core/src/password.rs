//! Password hash verification
//!
//! New hashes are Argon2id PHC strings. Stored bcrypt hashes (`$2a$`, `$2b$`,
//! `$2y$`) still verify, so existing accounts keep working. Verification never
//! compares plaintext.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use thiserror::Error;

/// Errors that can occur during password operations
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("password verification failed: {0}")]
    Verification(String),

    #[error("invalid password hash format")]
    InvalidHashFormat,
}

/// One-way password hashing scheme
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// `Ok(false)` means the password is wrong; `Err` means the hash itself
    /// could not be used.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Hash scheme of a stored password, read from its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    Argon2,
    Bcrypt,
}

impl HashScheme {
    /// Detect the scheme of a stored hash, if it is one we understand
    pub fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$argon2") {
            Some(Self::Argon2)
        } else if ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p)) {
            Some(Self::Bcrypt)
        } else {
            None
        }
    }
}

/// Argon2id hasher with default parameters; also verifies bcrypt hashes
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn verify_argon2(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Verification(e.to_string())),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        match HashScheme::detect(hash) {
            Some(HashScheme::Argon2) => self.verify_argon2(password, hash),
            Some(HashScheme::Bcrypt) => bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::Verification(e.to_string())),
            None => Err(PasswordError::InvalidHashFormat),
        }
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Argon2Hasher")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("correct horse battery staple", &hash).unwrap());
        assert!(!hasher.verify("Correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = Argon2Hasher::new();
        let a = hasher.hash("pw").unwrap();
        let b = hasher.hash("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_bcrypt_vectors_verify() {
        let hasher = Argon2Hasher::new();
        let hash = "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

        assert!(hasher.verify("U*U", hash).unwrap());
        assert!(!hasher.verify("U*V", hash).unwrap());
    }

    #[test]
    fn test_bcrypt_2b_and_2y_prefixes() {
        let hasher = Argon2Hasher::new();
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        assert!(hash.starts_with("$2b$"));
        assert!(hasher.verify("hunter2", &hash).unwrap());

        let as_2y = hash.replacen("$2b$", "$2y$", 1);
        assert!(hasher.verify("hunter2", &as_2y).unwrap());
        assert!(!hasher.verify("hunter3", &as_2y).unwrap());
    }

    #[test]
    fn test_detect_scheme() {
        assert_eq!(HashScheme::detect("$argon2id$v=19$m=19456"), Some(HashScheme::Argon2));
        assert_eq!(HashScheme::detect("$2a$10$abc"), Some(HashScheme::Bcrypt));
        assert_eq!(HashScheme::detect("$1$md5crypt"), None);
        assert_eq!(HashScheme::detect(""), None);
    }

    #[test]
    fn test_garbage_hash_is_error() {
        let hasher = Argon2Hasher::new();
        assert!(matches!(
            hasher.verify("pw", "plaintext-password"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }
}
