//! Shared Module
//!
//! Types used on both sides of the backend boundary: domain records,
//! configuration, input validation and the shared error type.

/// Domain records (Identity, Post, SavedRecord, ...)
pub mod models;

/// Shared error types
pub mod error;

/// Backend configuration
pub mod config;

/// Sign-up input validation
pub mod validation;

pub use config::{AccountRollback, BackendConfig, BackendConfigBuilder, ConfigError, SavePolicy};
pub use error::SharedError;
pub use models::{Account, Identity, NewUser, Post, SavedRecord, Session, UploadedFile};
