//! AuthService flows with real argon2 hashing and JWT signing.

#![cfg(feature = "auth")]

use std::sync::Arc;

use scribe_core::domain::Caller;
use scribe_core::ports::TokenService;
use scribe_core::service::RegisterUser;
use scribe_core::{AuthService, DomainError};
use scribe_infra::{Argon2PasswordService, InMemoryUserRepository, JwtConfig, JwtTokenService};

fn service() -> (AuthService, Arc<JwtTokenService>) {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "integration-secret".to_string(),
        ..JwtConfig::default()
    }));
    let auth = AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2PasswordService::new()),
        tokens.clone(),
    );
    (auth, tokens)
}

fn alice() -> RegisterUser {
    RegisterUser {
        username: " alice ".to_string(),
        email: "Alice@Example.com".to_string(),
        password: "password123".to_string(),
    }
}

#[tokio::test]
async fn test_register_issues_token_for_new_user() {
    let (auth, tokens) = service();

    let session = auth.register(alice()).await.unwrap();

    assert_eq!(session.user.username, "alice");
    assert_eq!(session.user.email, "alice@example.com");
    assert_ne!(session.user.password_hash, "password123");
    assert_eq!(session.expires_in, 24 * 3600);

    let claims = tokens.validate_token(&session.token).unwrap();
    assert_eq!(claims.user_id, session.user.id);
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let (auth, _) = service();
    auth.register(alice()).await.unwrap();

    let err = auth.register(alice()).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let same_name = RegisterUser {
        email: "other@example.com".to_string(),
        ..alice()
    };
    let err = auth.register(same_name).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn test_register_validates_input() {
    let (auth, _) = service();

    let err = auth
        .register(RegisterUser {
            username: "al".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_login_and_current_user() {
    let (auth, tokens) = service();
    let registered = auth.register(alice()).await.unwrap();

    let session = auth.login("alice@example.com", "password123").await.unwrap();
    assert_eq!(session.user.id, registered.user.id);

    let caller: Caller = tokens.validate_token(&session.token).unwrap().into();
    let me = auth.current_user(&caller).await.unwrap();
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (auth, _) = service();
    auth.register(alice()).await.unwrap();

    assert!(matches!(
        auth.login("alice@example.com", "wrong-password").await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        auth.login("nobody@example.com", "password123").await,
        Err(DomainError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_current_user_for_unknown_account() {
    let (auth, _) = service();
    let ghost = Caller {
        user_id: uuid::Uuid::new_v4(),
        username: "ghost".to_string(),
    };

    assert!(matches!(
        auth.current_user(&ghost).await,
        Err(DomainError::Unauthenticated)
    ));
}
