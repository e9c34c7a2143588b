//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use scribe_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use scribe_core::{AuthService, PostService};
use scribe_infra::{Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use scribe_infra::{PostgresPostRepository, PostgresUserRepository, database};

/// Which backend the repositories talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub auth: AuthService,
    pub store: StoreKind,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>, StoreKind);

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured
    /// and falling back to the in-memory store otherwise.
    pub async fn new(config: &AppConfig, tokens: Arc<dyn TokenService>) -> Self {
        let (posts, users, store) = Self::repositories(config).await;
        let state = Self::from_parts(
            posts,
            users,
            Arc::new(Argon2PasswordService::new()),
            tokens,
            config.store_timeout,
            store,
        );

        tracing::info!(store = state.store.as_str(), "Application state initialized");
        state
    }

    pub fn from_parts(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        store_timeout: Duration,
        store: StoreKind,
    ) -> Self {
        Self {
            posts: PostService::new(posts, users.clone()).with_store_timeout(store_timeout),
            auth: AuthService::new(users, passwords, tokens).with_store_timeout(store_timeout),
            store,
        }
    }

    fn in_memory() -> Repositories {
        (
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            StoreKind::Memory,
        )
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match database::connect(db_config).await {
            Ok(conn) => (
                Arc::new(PostgresPostRepository::new(conn.clone())),
                Arc::new(PostgresUserRepository::new(conn)),
                StoreKind::Postgres,
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> Repositories {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        Self::in_memory()
    }
}
