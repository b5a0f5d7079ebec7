//! Backend Module
//!
//! The remote backend-as-a-service seen from the client: accounts and
//! sessions, a document database with query predicates, and object storage.
//! Everything the domain operations need goes through [`RemoteBackend`].
//!
//! Two implementations are provided:
//!
//! - **`http`** - REST client for an Appwrite-compatible service
//! - **`memory`** - in-process backend with the same observable behaviour,
//!   for development and tests
//!
//! ```text
//! backend/
//! ├── mod.rs     - Trait and wire types
//! ├── query.rs   - Listing predicates
//! ├── http.rs    - REST implementation
//! ├── memory.rs  - In-process implementation
//! └── error/     - BackendError
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::{Account, Session, SharedError, UploadedFile};

pub mod error;
pub mod http;
pub mod memory;
pub mod query;

pub use error::BackendError;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use query::Query;

/// Session id addressing the caller's own active session
pub const CURRENT_SESSION: &str = "current";

/// Generic backend document: system attributes plus flattened user attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Look up an attribute, including the `$id`/`$createdAt`/`$updatedAt`
    /// system attributes
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "$id" => Some(Value::String(self.id.clone())),
            "$createdAt" => Some(Value::String(timestamp(&self.created_at))),
            "$updatedAt" => self.updated_at.as_ref().map(|t| Value::String(timestamp(t))),
            _ => self.data.get(name).cloned(),
        }
    }

    /// Decode into a domain record
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let value = serde_json::to_value(self)?;
        let record = serde_json::from_value(value).map_err(SharedError::from)?;
        Ok(record)
    }
}

/// Fixed-width RFC 3339 so timestamps also sort as strings
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Envelope returned by document listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    /// Matches before `limit`/`offset` were applied
    pub total: u64,
    pub documents: Vec<Document>,
}

/// Binary payload for an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Image preview transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
    pub gravity: &'static str,
    pub quality: u8,
}

/// The remote backend-as-a-service
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Create an auth account. Does not start a session.
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError>;

    /// Account owning the active session
    async fn get_account(&self) -> Result<Account, BackendError>;

    /// Remove an auth account and its sessions
    async fn delete_account(&self, account_id: &str) -> Result<(), BackendError>;

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Delete a session; [`CURRENT_SESSION`] addresses the active one
    async fn delete_session(&self, session_id: &str) -> Result<(), BackendError>;

    /// Default avatar URL for a display name. Pure: equal names give equal URLs.
    fn avatar_initials_url(&self, name: &str) -> String;

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError>;

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document, BackendError>;

    async fn list_documents(&self, collection_id: &str, queries: &[Query]) -> Result<DocumentList, BackendError>;

    /// Patch the given attributes, leaving the others untouched
    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError>;

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<(), BackendError>;

    async fn create_file(&self, bucket_id: &str, file_id: &str, file: FileUpload) -> Result<UploadedFile, BackendError>;

    /// Preview URL for a stored image
    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<String, BackendError>;

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Post;
    use serde_json::json;

    fn post_document() -> Document {
        serde_json::from_value(json!({
            "$id": "p1",
            "$createdAt": "2024-05-01T10:00:00.000+00:00",
            "$updatedAt": "2024-05-01T10:00:00.000+00:00",
            "$collectionId": "posts",
            "creator": "u1",
            "caption": "hi",
            "imageUrl": "https://x/preview",
            "imageId": "f1",
            "tags": [],
            "likes": ["u2"]
        }))
        .unwrap()
    }

    #[test]
    fn test_document_flattens_attributes() {
        let doc = post_document();
        assert_eq!(doc.id, "p1");
        assert_eq!(doc.data["caption"], "hi");
        assert_eq!(doc.data["$collectionId"], "posts");
        assert!(!doc.data.contains_key("$id"));
    }

    #[test]
    fn test_document_system_attributes() {
        let doc = post_document();
        assert_eq!(doc.attribute("$id"), Some(json!("p1")));
        assert_eq!(doc.attribute("$createdAt"), Some(json!("2024-05-01T10:00:00.000000Z")));
        assert_eq!(doc.attribute("missing"), None);
    }

    #[test]
    fn test_document_decode() {
        let post: Post = post_document().decode().unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.likes, vec!["u2".to_string()]);
    }

    #[test]
    fn test_document_decode_failure() {
        let mut doc = post_document();
        doc.data.remove("caption");
        let err = doc.decode::<Post>().unwrap_err();
        assert!(matches!(err, BackendError::SharedError(SharedError::SerializationError { .. })));
    }
}
