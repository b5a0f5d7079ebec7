//! snapfeed - client core for a photo-sharing social app
//!
//! The crate holds the part of the client that is more than presentation:
//! who is signed in, and the domain operations that talk to a hosted
//! backend-as-a-service (accounts and sessions, a document database, object
//! storage).
//!
//! # Module Structure
//!
//! - **`shared`** - domain records, configuration, validation, shared errors
//! - **`backend`** - the `RemoteBackend` trait with HTTP and in-memory
//!   implementations
//! - **`client`** - session manager and domain operations
//!
//! # Usage
//!
//! ```rust,no_run
//! use snapfeed::backend::HttpBackend;
//! use snapfeed::client::Client;
//! use snapfeed::shared::BackendConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::from_env()?;
//! let client = Client::new(HttpBackend::new(&config)?, config);
//!
//! client.sign_in("ada@example.com", "analytical").await?;
//! let me = client.check_current_user().await;
//! let feed = client.get_recent_posts().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Operations return `Result<T, OperationError>`; the session check returns
//! `Option<Identity>`. Backend failures are logged through `tracing` and
//! never panic.

/// Shared types and data structures
pub mod shared;

/// Remote backend boundary
pub mod backend;

/// Session manager and domain operations
pub mod client;

pub use backend::{HttpBackend, MemoryBackend, RemoteBackend};
pub use client::{Client, ErrorKind, OperationError};
