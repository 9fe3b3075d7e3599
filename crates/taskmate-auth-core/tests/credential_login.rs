//! Integration tests for email/password login
//!
//! Uses the in-memory credential repository and real Argon2 and bcrypt hashes.

mod common;

use std::sync::Arc;

use common::{FailingCredentialRepository, MockCredentialRepository};
use taskmate_auth_core::{AuthConfig, AuthError, CredentialAuthenticator, SigningKey, TokenService};
use taskmate_db::CredentialRow;
use uuid::Uuid;

fn token_service() -> Arc<TokenService> {
    let key = SigningKey::new([11u8; 64]).unwrap();
    Arc::new(TokenService::new(&AuthConfig::new(key)).unwrap())
}

#[tokio::test]
async fn test_login_issues_token_for_user_id() {
    let repo = MockCredentialRepository::new();
    let user = repo.insert_user("alice@example.com", "hunter2-but-longer");
    let tokens = token_service();
    let authenticator = CredentialAuthenticator::new(Arc::new(repo), Arc::clone(&tokens));

    let token = authenticator
        .authenticate("alice@example.com", "hunter2-but-longer")
        .await
        .unwrap();

    assert_eq!(token.subject(), user.id.to_string());
    let validated = tokens.validate(token.as_str()).unwrap();
    assert_eq!(validated.subject, user.id.to_string());
}

#[tokio::test]
async fn test_login_normalizes_email() {
    let repo = MockCredentialRepository::new();
    repo.insert_user("alice@example.com", "pw-123456");
    let authenticator = CredentialAuthenticator::new(Arc::new(repo), token_service());

    let result = authenticator
        .authenticate("  Alice@Example.COM ", "pw-123456")
        .await;

    assert!(result.is_ok(), "Expected login to succeed, got: {:?}", result);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let repo = MockCredentialRepository::new();
    repo.insert_user("alice@example.com", "right-password");
    let authenticator = CredentialAuthenticator::new(Arc::new(repo), token_service());

    let unknown = authenticator
        .authenticate("nobody@example.com", "right-password")
        .await
        .unwrap_err();
    let wrong = authenticator
        .authenticate("alice@example.com", "wrong-password")
        .await
        .unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.error_code(), wrong.error_code());
    assert_eq!(unknown.status_code(), wrong.status_code());
}

#[tokio::test]
async fn test_repository_failure_collapses_to_invalid_credentials() {
    let authenticator =
        CredentialAuthenticator::new(Arc::new(FailingCredentialRepository), token_service());

    let err = authenticator
        .authenticate("alice@example.com", "whatever")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_unparseable_stored_hash_collapses_to_invalid_credentials() {
    let repo = MockCredentialRepository::new();
    repo.insert(CredentialRow {
        id: Uuid::new_v4(),
        email: "legacy@example.com".to_string(),
        encrypted_password: "plaintext-from-an-old-import".to_string(),
    });
    let authenticator = CredentialAuthenticator::new(Arc::new(repo), token_service());

    let err = authenticator
        .authenticate("legacy@example.com", "plaintext-from-an-old-import")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_blank_fields_are_malformed_and_skip_lookup() {
    let repo = MockCredentialRepository::new();
    let authenticator =
        CredentialAuthenticator::new(Arc::new(repo.clone()), token_service());

    let err = authenticator.authenticate("   ", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::MalformedRequest(_)));

    let err = authenticator
        .authenticate("alice@example.com", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MalformedRequest(_)));

    assert_eq!(repo.lookups(), 0);
}

#[tokio::test]
async fn test_login_accepts_stored_bcrypt_hash() {
    let repo = MockCredentialRepository::new();
    let id = Uuid::new_v4();
    repo.insert(CredentialRow {
        id,
        email: "alice@example.com".to_string(),
        encrypted_password: "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW"
            .to_string(),
    });
    let authenticator = CredentialAuthenticator::new(Arc::new(repo), token_service());

    let token = authenticator
        .authenticate("alice@example.com", "U*U")
        .await
        .unwrap();
    assert_eq!(token.subject(), id.to_string());

    let err = authenticator
        .authenticate("alice@example.com", "U*V")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}
