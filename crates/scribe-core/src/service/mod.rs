//! Application services - the operations the HTTP layer calls.

mod auth;
mod posts;

use std::future::Future;
use std::time::Duration;

use crate::error::RepoError;

pub use auth::{AuthService, RegisterUser, Session};
pub use posts::PostService;

/// Upper bound for a single store call unless configured otherwise.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a store call, turning an overrun into `RepoError::Timeout`.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, RepoError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(timeout_ms = millis, "Store call timed out");
            Err(RepoError::Timeout(millis))
        }
    }
}
