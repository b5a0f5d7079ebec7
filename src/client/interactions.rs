//! Likes and saved posts
//!
//! `like_post` overwrites the likes array with what the caller sends; the
//! caller computes it (usually with [`toggle_like`]). Two clients liking the
//! same post at once can lose one of the updates: the last write wins.

use serde_json::{Map, Value};

use crate::backend::{BackendError, Query, RemoteBackend};
use crate::client::error::{Operation, OperationError};
use crate::client::Client;
use crate::shared::models::unique_id;
use crate::shared::{Post, SavePolicy, SavedRecord};

/// Likes array after `user_id` toggles their like
pub fn toggle_like(likes: &[String], user_id: &str) -> Vec<String> {
    if has_liked(likes, user_id) {
        likes.iter().filter(|id| *id != user_id).cloned().collect()
    } else {
        let mut next = likes.to_vec();
        next.push(user_id.to_string());
        next
    }
}

pub fn has_liked(likes: &[String], user_id: &str) -> bool {
    likes.iter().any(|id| id == user_id)
}

/// The user's saved record for a post, if any
pub fn find_saved<'a>(records: &'a [SavedRecord], post_id: &str) -> Option<&'a SavedRecord> {
    records.iter().find(|record| record.post == post_id)
}

impl<B: RemoteBackend> Client<B> {
    /// Replace the post's likes with `likes`
    pub async fn like_post(&self, post_id: &str, likes: Vec<String>) -> Result<Post, OperationError> {
        let mut data = Map::new();
        data.insert(
            "likes".into(),
            Value::Array(likes.into_iter().map(Value::String).collect()),
        );

        self.backend
            .update_document(&self.config.post_collection_id, post_id, data)
            .await
            .and_then(|document| document.decode::<Post>())
            .map_err(|source| {
                tracing::warn!(post_id, error = %source, "like post failed");
                OperationError::backend(Operation::LikePost, source)
            })
    }

    /// Record that `user_id` saved `post_id`
    pub async fn save_post(&self, user_id: &str, post_id: &str) -> Result<SavedRecord, OperationError> {
        let fail = |source: BackendError| {
            tracing::warn!(user_id, post_id, error = %source, "save post failed");
            OperationError::backend(Operation::SavePost, source)
        };

        if self.config.save_policy == SavePolicy::ReuseExisting {
            let existing = self
                .backend
                .list_documents(
                    &self.config.saves_collection_id,
                    &[
                        Query::equal("user", user_id),
                        Query::equal("post", post_id),
                        Query::limit(1),
                    ],
                )
                .await
                .map_err(fail)?;
            if let Some(document) = existing.documents.into_iter().next() {
                tracing::debug!(user_id, post_id, "save post: already saved");
                return document.decode::<SavedRecord>().map_err(fail);
            }
        }

        let mut data = Map::new();
        data.insert("user".into(), Value::String(user_id.to_string()));
        data.insert("post".into(), Value::String(post_id.to_string()));

        self.backend
            .create_document(&self.config.saves_collection_id, &unique_id(), data)
            .await
            .and_then(|document| document.decode::<SavedRecord>())
            .map_err(fail)
    }

    /// Remove a saved record by id
    pub async fn delete_saved_post(&self, saved_record_id: &str) -> Result<(), OperationError> {
        self.backend
            .delete_document(&self.config.saves_collection_id, saved_record_id)
            .await
            .map_err(|source| {
                tracing::warn!(saved_record_id, error = %source, "delete saved post failed");
                OperationError::backend(Operation::DeleteSavedPost, source)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_toggle_like_adds_and_removes() {
        let likes = ids(&["u1"]);
        let added = toggle_like(&likes, "u2");
        assert_eq!(added, ids(&["u1", "u2"]));
        assert_eq!(toggle_like(&added, "u1"), ids(&["u2"]));
        assert!(has_liked(&added, "u2"));
        assert!(!has_liked(&likes, "u2"));
    }

    #[test]
    fn test_find_saved() {
        let records = vec![
            SavedRecord {
                id: "s1".into(),
                user: "u1".into(),
                post: "p1".into(),
            },
            SavedRecord {
                id: "s2".into(),
                user: "u1".into(),
                post: "p2".into(),
            },
        ];
        assert_eq!(find_saved(&records, "p2").map(|r| r.id.as_str()), Some("s2"));
        assert!(find_saved(&records, "p3").is_none());
    }
}
