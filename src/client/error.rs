//! Operation errors
//!
//! Every domain operation reports failure as an [`OperationError`]. The
//! variant says which step of the operation failed; [`OperationError::kind`]
//! flattens that into an [`ErrorKind`] for callers that only branch on the
//! category.

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;
use crate::shared::SharedError;

/// Domain operations, used to label generic backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateAccount,
    SignOut,
    CreatePost,
    LikePost,
    SavePost,
    DeleteSavedPost,
    RecentPosts,
    SearchPosts,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateAccount => write!(f, "create account"),
            Operation::SignOut => write!(f, "sign out"),
            Operation::CreatePost => write!(f, "create post"),
            Operation::LikePost => write!(f, "like post"),
            Operation::SavePost => write!(f, "save post"),
            Operation::DeleteSavedPost => write!(f, "delete saved post"),
            Operation::RecentPosts => write!(f, "recent posts"),
            Operation::SearchPosts => write!(f, "search posts"),
        }
    }
}

/// Failure category of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthFailed,
    UploadFailed,
    PreviewFailed,
    PostCreateFailed,
    ProfileCreateFailed,
    Validation,
    BackendUnavailable,
}

/// Error returned by a domain operation
#[derive(Debug, Error)]
pub enum OperationError {
    /// Bad credentials, or the backend rejected account creation
    #[error("authentication failed: {source}")]
    AuthFailed {
        #[source]
        source: BackendError,
    },

    /// The file never reached storage
    #[error("upload failed: {source}")]
    UploadFailed {
        #[source]
        source: BackendError,
    },

    /// The uploaded file had no usable preview and was discarded
    #[error("preview unavailable for file {file_id}: {reason}")]
    PreviewFailed { file_id: String, reason: String },

    /// The post document was not written; the upload was discarded
    #[error("post creation failed for file {file_id}: {source}")]
    PostCreateFailed {
        file_id: String,
        #[source]
        source: BackendError,
    },

    /// The auth account exists but its identity document was not written.
    /// `orphaned` tells whether the account is still there.
    #[error("identity document for account {account_id} was not created (orphaned: {orphaned}): {source}")]
    ProfileCreateFailed {
        account_id: String,
        orphaned: bool,
        #[source]
        source: BackendError,
    },

    /// Input was rejected before reaching the backend
    #[error("invalid input: {0}")]
    Validation(SharedError),

    /// Any other backend failure
    #[error("backend unavailable during {operation}: {source}")]
    BackendUnavailable {
        operation: Operation,
        #[source]
        source: BackendError,
    },
}

impl OperationError {
    pub fn backend(operation: Operation, source: BackendError) -> Self {
        Self::BackendUnavailable { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthFailed { .. } => ErrorKind::AuthFailed,
            Self::UploadFailed { .. } => ErrorKind::UploadFailed,
            Self::PreviewFailed { .. } => ErrorKind::PreviewFailed,
            Self::PostCreateFailed { .. } => ErrorKind::PostCreateFailed,
            Self::ProfileCreateFailed { .. } => ErrorKind::ProfileCreateFailed,
            Self::Validation(_) => ErrorKind::Validation,
            Self::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
        }
    }

    /// Notification text for the failures the UI reports directly
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            Self::BackendUnavailable { operation, .. } => match operation {
                Operation::LikePost => Some("Something went wrong, couldn't like this post."),
                Operation::SavePost => Some("Something went wrong, couldn't save this post."),
                Operation::DeleteSavedPost => {
                    Some("Something went wrong, couldn't remove this post from your saved posts.")
                }
                _ => None,
            },
            _ => None,
        }
    }
}
