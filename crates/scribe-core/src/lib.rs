//! # Scribe Core
//!
//! The domain layer of the Scribe blog backend.
//! Post lifecycle rules, ownership checks and the ports that infrastructure
//! implements. No database or HTTP dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::{AuthService, PostService};
