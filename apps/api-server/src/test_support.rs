//! Shared fixtures for handler tests.

use std::sync::Arc;

use actix_web::web;
use uuid::Uuid;

use scribe_core::domain::User;
use scribe_core::ports::{BaseRepository, TokenService};
use scribe_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

use crate::state::{AppState, StoreKind};

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub tokens: web::Data<Arc<dyn TokenService>>,
    users: Arc<InMemoryUserRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..JwtConfig::default()
        }));

        let state = AppState::from_parts(
            Arc::new(InMemoryPostRepository::new()),
            users.clone(),
            Arc::new(Argon2PasswordService::new()),
            tokens.clone(),
            std::time::Duration::from_secs(1),
            StoreKind::Memory,
        );

        Self {
            state: web::Data::new(state),
            tokens: web::Data::new(tokens),
            users,
        }
    }

    /// Store an account directly, skipping password hashing, and mint a
    /// bearer token for it.
    pub async fn user(&self, username: &str) -> (Uuid, String) {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "not-a-real-hash".to_string(),
        );
        let user = self.users.insert(user).await.unwrap();
        let token = self
            .tokens
            .generate_token(user.id, &user.username, vec!["user".to_string()])
            .unwrap();
        (user.id, token)
    }
}
