//! Account registration, login and identity lookup.

use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_STORE_TIMEOUT, bounded};
use crate::domain::{Caller, User};
use crate::error::{DomainError, ValidationErrors};
use crate::ports::{PasswordService, TokenService, UserRepository};

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 30;
const PASSWORD_MIN_CHARS: usize = 8;

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A freshly issued bearer credential and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Identity provider built on the user store, a password hasher and a
/// token signer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub async fn register(&self, input: RegisterUser) -> Result<Session, DomainError> {
        let username = input.username.trim().to_string();
        let email = normalize_email(&input.email);
        validate_registration(&username, &email, &input.password)?;

        if bounded(self.store_timeout, self.users.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("Email already registered".into()));
        }
        if bounded(self.store_timeout, self.users.find_by_username(&username))
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("Username already taken".into()));
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(username, email, password_hash);
        let saved = bounded(self.store_timeout, self.users.insert(user)).await?;

        tracing::info!(user_id = %saved.id, "User registered");
        self.issue(saved)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = normalize_email(email);
        let user = bounded(self.store_timeout, self.users.find_by_email(&email))
            .await?
            .ok_or(DomainError::Unauthenticated)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(DomainError::Unauthenticated);
        }

        self.issue(user)
    }

    /// The stored account behind a resolved caller.
    pub async fn current_user(&self, caller: &Caller) -> Result<User, DomainError> {
        bounded(self.store_timeout, self.users.find_by_id(caller.user_id))
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    fn issue(&self, user: User) -> Result<Session, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username, vec!["user".to_string()])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Session {
            token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new();

    let username_len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&username_len) {
        errors.add(
            "username",
            format!(
                "Username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
            ),
        );
    }
    if email.is_empty() || !email.contains('@') {
        errors.add("email", "Invalid email address");
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add(
            "password",
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters"),
        );
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration("alice", "alice@example.com", "password1").is_ok());

        let err = validate_registration("al", "not-an-email", "short").unwrap_err();
        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
