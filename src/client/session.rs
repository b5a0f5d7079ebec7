/**
 * Session Manager
 *
 * Holds the client's view of who is signed in. The state starts empty, is
 * filled by `check_current_user` and emptied by `clear` (or by a failed
 * check). Nothing else can write it; other components read a snapshot.
 *
 * Concurrent checks are not deduplicated: callers are expected to run one
 * at a time, and the last one to finish wins.
 */

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::{BackendError, Query, RemoteBackend};
use crate::shared::Identity;

/// Authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current_identity: Option<Identity>,
    is_authenticated: bool,
    is_loading: bool,
}

impl SessionState {
    pub fn current_identity(&self) -> Option<&Identity> {
        self.current_identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

/// Session manager
pub struct SessionManager<B> {
    backend: Arc<B>,
    user_collection_id: String,
    state: RwLock<SessionState>,
}

impl<B: RemoteBackend> SessionManager<B> {
    pub fn new(backend: Arc<B>, user_collection_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_collection_id: user_collection_id.into(),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Resolve the signed-in identity and cache it.
    ///
    /// Returns `None` and clears the cache when there is no session, the
    /// account has no identity document, or the backend fails.
    pub async fn check_current_user(&self) -> Option<Identity> {
        self.state.write().await.is_loading = true;

        let lookup = self.fetch_current_identity().await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match lookup {
            Ok(Some(identity)) => {
                tracing::debug!(identity_id = %identity.id, "session check: signed in");
                state.current_identity = Some(identity.clone());
                state.is_authenticated = true;
                Some(identity)
            }
            Ok(None) => {
                tracing::warn!("session check: account has no identity document");
                state.current_identity = None;
                state.is_authenticated = false;
                None
            }
            Err(e) if e.is_unauthorized() => {
                tracing::debug!("session check: no active session ({})", e);
                state.current_identity = None;
                state.is_authenticated = false;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "session check failed");
                state.current_identity = None;
                state.is_authenticated = false;
                None
            }
        }
    }

    async fn fetch_current_identity(&self) -> Result<Option<Identity>, BackendError> {
        let account = self.backend.get_account().await?;
        let list = self
            .backend
            .list_documents(
                &self.user_collection_id,
                &[Query::equal("accountId", account.id.as_str()), Query::limit(1)],
            )
            .await?;

        match list.documents.into_iter().next() {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Forget the signed-in identity
    pub async fn clear(&self) {
        *self.state.write().await = SessionState::default();
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.state.read().await.current_identity.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }
}
