//! Client Module
//!
//! The domain operations layer. A [`Client`] bundles the backend, the
//! configuration and the [`SessionManager`]; it is the context object passed
//! to whatever renders the application.
//!
//! - **`session`** - signed-in identity and its lifecycle
//! - **`auth`** - account creation, sign in, sign out
//! - **`posts`** - post creation with upload compensation
//! - **`interactions`** - likes and saved posts
//! - **`feed`** - recent posts and search
//! - **`error`** - operation error taxonomy
//!
//! # Example
//!
//! ```rust,no_run
//! use snapfeed::backend::MemoryBackend;
//! use snapfeed::client::Client;
//! use snapfeed::shared::BackendConfig;
//!
//! # async fn example(config: BackendConfig) {
//! let client = Client::new(MemoryBackend::new(), config);
//! if let Some(identity) = client.check_current_user().await {
//!     println!("signed in as {}", identity.name);
//! }
//! # }
//! ```

use std::sync::Arc;

use crate::backend::RemoteBackend;
use crate::shared::{BackendConfig, Identity};

pub mod auth;
pub mod error;
pub mod feed;
pub mod interactions;
pub mod posts;
pub mod session;

pub use error::{ErrorKind, Operation, OperationError};
pub use feed::RECENT_POSTS_LIMIT;
pub use interactions::{find_saved, has_liked, toggle_like};
pub use posts::{normalize_tags, NewPost, POST_PREVIEW};
pub use session::{SessionManager, SessionState};

/// Domain operations over a remote backend
pub struct Client<B> {
    backend: Arc<B>,
    config: BackendConfig,
    session: SessionManager<B>,
}

impl<B: RemoteBackend> Client<B> {
    pub fn new(backend: B, config: BackendConfig) -> Self {
        Self::with_backend(Arc::new(backend), config)
    }

    /// Build a client around a backend that is also used elsewhere
    pub fn with_backend(backend: Arc<B>, config: BackendConfig) -> Self {
        let session = SessionManager::new(Arc::clone(&backend), config.user_collection_id.clone());
        Self {
            backend,
            config,
            session,
        }
    }

    pub fn session(&self) -> &SessionManager<B> {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// See [`SessionManager::check_current_user`]
    pub async fn check_current_user(&self) -> Option<Identity> {
        self.session.check_current_user().await
    }
}
