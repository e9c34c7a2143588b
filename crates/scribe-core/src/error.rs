//! Domain-level error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not allowed to modify this {0}")]
    Forbidden(&'static str),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field-level failure found while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise a `DomainError::Validation`.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }

    /// Human-readable `field: message` lines.
    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Store call timed out after {0} ms")]
    Timeout(u64),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => DomainError::StoreUnavailable(msg),
            RepoError::Timeout(ms) => {
                DomainError::StoreUnavailable(format!("no response within {ms} ms"))
            }
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::Query(msg) => DomainError::Internal(msg),
            RepoError::NotFound => DomainError::Internal("entity vanished mid-operation".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Please provide a title");
        errors.add("content", "Please provide content");

        assert_eq!(
            errors.messages(),
            vec![
                "title: Please provide a title".to_string(),
                "content: Please provide content".to_string(),
            ]
        );
        assert!(matches!(
            errors.into_result(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_validation_errors_pass() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_repo_errors_map_to_domain() {
        assert!(matches!(
            DomainError::from(RepoError::Connection("refused".into())),
            DomainError::StoreUnavailable(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Timeout(50)),
            DomainError::StoreUnavailable(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Constraint("users_email_key".into())),
            DomainError::Duplicate(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Query("syntax".into())),
            DomainError::Internal(_)
        ));
    }
}
