//! Post creation
//!
//! Creating a post is upload → preview → document. Once the upload has
//! succeeded, every step that fails before the document is stored deletes
//! the uploaded file exactly once before reporting, so storage never keeps
//! a file that no post links to. A stored document whose response cannot be
//! decoded keeps its file.

use reqwest::Url;
use serde_json::{Map, Value};

use crate::backend::{FileUpload, PreviewOptions, RemoteBackend};
use crate::client::error::{Operation, OperationError};
use crate::client::Client;
use crate::shared::models::unique_id;
use crate::shared::{Post, UploadedFile};

/// Preview used for post images
pub const POST_PREVIEW: PreviewOptions = PreviewOptions {
    width: 2000,
    height: 2000,
    gravity: "top",
    quality: 100,
};

/// Input for post creation
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Identity id of the author
    pub creator_id: String,
    pub caption: String,
    pub file: FileUpload,
    pub location: Option<String>,
    /// Free-text, comma separated
    pub tags: Option<String>,
}

/// Split a comma separated tag field into tags.
///
/// All whitespace is removed and empty segments are dropped, so an empty or
/// absent field yields no tags.
pub fn normalize_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl<B: RemoteBackend> Client<B> {
    /// Upload the image and create the post document that links it
    pub async fn create_post(&self, post: NewPost) -> Result<Post, OperationError> {
        let bucket_id = &self.config.storage_id;

        let uploaded: UploadedFile = self
            .backend
            .create_file(bucket_id, &unique_id(), post.file)
            .await
            .map_err(|source| {
                tracing::warn!(error = %source, "create post: upload failed");
                OperationError::UploadFailed { source }
            })?;
        let file_id = uploaded.id;

        let image_url = match self.backend.file_preview_url(bucket_id, &file_id, &POST_PREVIEW) {
            Ok(url) if url.trim().is_empty() => Err("preview URL is empty".to_string()),
            Ok(url) => match Url::parse(&url) {
                Ok(_) => Ok(url),
                Err(e) => Err(format!("preview URL {:?} is invalid: {}", url, e)),
            },
            Err(e) => Err(e.to_string()),
        };
        let image_url = match image_url {
            Ok(url) => url,
            Err(reason) => {
                tracing::warn!(file_id = %file_id, reason = %reason, "create post: no preview for upload");
                self.discard_upload(&file_id).await;
                return Err(OperationError::PreviewFailed { file_id, reason });
            }
        };

        let tags = normalize_tags(post.tags.as_deref());

        let mut data = Map::new();
        data.insert("creator".into(), Value::String(post.creator_id));
        data.insert("caption".into(), Value::String(post.caption));
        data.insert("imageUrl".into(), Value::String(image_url));
        data.insert("imageId".into(), Value::String(file_id.clone()));
        data.insert(
            "location".into(),
            post.location.map(Value::String).unwrap_or(Value::Null),
        );
        data.insert(
            "tags".into(),
            Value::Array(tags.into_iter().map(Value::String).collect()),
        );

        let created = self
            .backend
            .create_document(&self.config.post_collection_id, &unique_id(), data)
            .await
            .and_then(|document| document.decode::<Post>());

        match created {
            Ok(post) => {
                tracing::info!(post_id = %post.id, file_id = %file_id, "post created");
                Ok(post)
            }
            // stored and linking the upload; the file stays
            Err(source) if source.is_unreadable_response() => {
                tracing::error!(file_id = %file_id, error = %source, "create post: stored post could not be read back");
                Err(OperationError::backend(Operation::CreatePost, source))
            }
            Err(source) => {
                tracing::warn!(file_id = %file_id, error = %source, "create post: document not created");
                self.discard_upload(&file_id).await;
                Err(OperationError::PostCreateFailed { file_id, source })
            }
        }
    }

    /// Compensating delete for an upload no post will link to
    async fn discard_upload(&self, file_id: &str) {
        match self.backend.delete_file(&self.config.storage_id, file_id).await {
            Ok(()) => tracing::debug!(file_id, "discarded unlinked upload"),
            Err(e) => tracing::error!(file_id, error = %e, "failed to discard unlinked upload; file leaked"),
        }
    }
}
