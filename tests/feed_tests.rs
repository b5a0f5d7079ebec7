//! Recent-posts feed and caption search

mod common;

use common::*;
use pretty_assertions::assert_eq;
use snapfeed::client::{ErrorKind, OperationError, RECENT_POSTS_LIMIT};

#[tokio::test]
async fn test_recent_posts_newest_first_and_capped() {
    let (client, _backend) = test_client();
    let mut created = Vec::new();
    for n in 0..25 {
        let post = assert_ok!(client.create_post(new_post("i1", &format!("post {}", n), None)).await);
        created.push(post.id);
    }

    let feed = assert_ok!(client.get_recent_posts().await);

    assert_eq!(feed.len(), RECENT_POSTS_LIMIT as usize);
    let expected: Vec<String> = created.iter().rev().take(20).cloned().collect();
    let actual: Vec<String> = feed.iter().map(|post| post.id.clone()).collect();
    assert_eq!(actual, expected);
    assert!(feed.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn test_recent_posts_empty_feed() {
    let (client, _backend) = test_client();
    let feed = assert_ok!(client.get_recent_posts().await);
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_recent_posts_backend_failure() {
    let (client, backend) = test_client();
    backend.fail(Fail::ListDocuments);

    let err = assert_err_kind!(client.get_recent_posts().await, ErrorKind::BackendUnavailable);
    assert!(err.user_notice().is_none());
}

#[tokio::test]
async fn test_search_matches_caption() {
    let (client, _backend) = test_client();
    let sunset = assert_ok!(client.create_post(new_post("i1", "Sunset over Lisbon", None)).await);
    assert_ok!(client.create_post(new_post("i1", "Morning coffee", None)).await);

    let found = assert_ok!(client.search_posts("sunset").await);
    assert_eq!(found, vec![sunset]);
}

#[tokio::test]
async fn test_search_without_matches_is_empty_not_error() {
    let (client, backend) = test_client();
    assert_ok!(client.create_post(new_post("i1", "Morning coffee", None)).await);

    let found = assert_ok!(client.search_posts("volcano").await);
    assert!(found.is_empty());

    backend.fail(Fail::ListDocuments);
    let err = assert_err_kind!(client.search_posts("volcano").await, ErrorKind::BackendUnavailable);
    assert!(matches!(err, OperationError::BackendUnavailable { .. }));
}

#[tokio::test]
async fn test_blank_search_skips_backend() {
    let (client, backend) = test_client();
    assert_ok!(client.create_post(new_post("i1", "Morning coffee", None)).await);

    assert!(assert_ok!(client.search_posts("").await).is_empty());
    assert!(assert_ok!(client.search_posts("  \t ").await).is_empty());
    assert_eq!(backend.count("list_documents"), 0);
}
