//! Feed and search reads

use crate::backend::{Document, Query, RemoteBackend};
use crate::client::error::{Operation, OperationError};
use crate::client::Client;
use crate::shared::Post;

/// Page size of the recent-posts feed
pub const RECENT_POSTS_LIMIT: u32 = 20;

/// Attribute searched by `search_posts`
const SEARCH_ATTRIBUTE: &str = "caption";

impl<B: RemoteBackend> Client<B> {
    /// Newest posts first, at most [`RECENT_POSTS_LIMIT`]
    pub async fn get_recent_posts(&self) -> Result<Vec<Post>, OperationError> {
        let queries = [Query::order_desc("$createdAt"), Query::limit(RECENT_POSTS_LIMIT)];
        self.list_posts(Operation::RecentPosts, &queries).await
    }

    /// Posts whose caption matches `term`. No match is an empty list, not an
    /// error; a blank term matches nothing and skips the backend.
    pub async fn search_posts(&self, term: &str) -> Result<Vec<Post>, OperationError> {
        let term = term.trim();
        if term.is_empty() {
            tracing::debug!("search posts: blank term");
            return Ok(Vec::new());
        }
        let queries = [Query::search(SEARCH_ATTRIBUTE, term)];
        self.list_posts(Operation::SearchPosts, &queries).await
    }

    async fn list_posts(&self, operation: Operation, queries: &[Query]) -> Result<Vec<Post>, OperationError> {
        let list = self
            .backend
            .list_documents(&self.config.post_collection_id, queries)
            .await
            .map_err(|source| {
                tracing::warn!(%operation, error = %source, "listing posts failed");
                OperationError::backend(operation, source)
            })?;

        list.documents
            .into_iter()
            .map(Document::decode::<Post>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| {
                tracing::warn!(%operation, error = %source, "post document did not decode");
                OperationError::backend(operation, source)
            })
    }
}
