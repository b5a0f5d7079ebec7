//! Backend Error Module
//!
//! Errors raised at the remote backend boundary, before the domain layer
//! maps them onto its own taxonomy.
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Conversions from HTTP responses and client errors
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
