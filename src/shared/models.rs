//! Domain records
//!
//! Read-only projections of documents owned by the remote backend. Field
//! names follow the backend's attribute names (`$id`, `$createdAt`,
//! camelCase attributes) so records decode straight from a
//! [`Document`](crate::backend::Document).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Generate a backend-compatible unique id (32 lowercase hex chars)
pub fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Raw backend account, distinct from the application [`Identity`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Opaque authenticated-access handle issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
}

/// Application-level user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(rename = "$id")]
    pub id: String,
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    pub image_url: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// A published post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "$id")]
    pub id: String,
    /// Identity id of the author
    #[serde(deserialize_with = "reference")]
    pub creator: String,
    pub caption: String,
    pub image_url: String,
    /// Storage id of the linked upload
    pub image_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tags: Vec<String>,
    /// Identity ids of users who liked the post
    #[serde(default, deserialize_with = "references")]
    pub likes: Vec<String>,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Join record between a user and a post they saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(deserialize_with = "reference")]
    pub user: String,
    #[serde(deserialize_with = "reference")]
    pub post: String,
}

/// A binary object held in backend storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub bucket_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_original: Option<u64>,
}

/// Input for account creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

/// Relationship attributes arrive either as a bare id or as the expanded
/// related document.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reference {
    Id(String),
    Document {
        #[serde(rename = "$id")]
        id: String,
    },
}

impl Reference {
    fn into_id(self) -> String {
        match self {
            Reference::Id(id) | Reference::Document { id } => id,
        }
    }
}

fn reference<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Reference::deserialize(deserializer).map(Reference::into_id)
}

fn references<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<Reference>> = Option::deserialize(deserializer)?;
    Ok(list
        .unwrap_or_default()
        .into_iter()
        .map(Reference::into_id)
        .collect())
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}
