//! Property tests for tag normalization and the like toggle

mod common;

use common::*;
use proptest::prelude::*;
use snapfeed::backend::RemoteBackend;
use snapfeed::client::{has_liked, normalize_tags, toggle_like};

proptest! {
    #[test]
    fn prop_tags_have_no_whitespace_commas_or_empties(raw in "[a-z ,\t]{0,40}") {
        let tags = normalize_tags(Some(&raw));
        for tag in &tags {
            prop_assert!(!tag.is_empty());
            prop_assert!(!tag.contains(','));
            prop_assert!(!tag.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn prop_tags_keep_every_letter(raw in "[a-z ,]{0,40}") {
        let tags = normalize_tags(Some(&raw));
        let expected: String = raw.chars().filter(|c| c.is_ascii_lowercase()).collect();
        prop_assert_eq!(tags.concat(), expected);
    }

    #[test]
    fn prop_toggle_twice_restores_likes(
        likes in proptest::collection::hash_set("u[0-9]{1,3}", 0..8),
        user in "u[0-9]{1,3}",
    ) {
        let likes: Vec<String> = likes.into_iter().collect();
        let once = toggle_like(&likes, &user);
        prop_assert_eq!(has_liked(&once, &user), !has_liked(&likes, &user));

        let twice = toggle_like(&once, &user);
        let mut restored = twice.clone();
        let mut original = likes.clone();
        restored.sort();
        original.sort();
        prop_assert_eq!(restored, original);
    }

    #[test]
    fn prop_like_stores_exactly_the_last_write(
        writes in proptest::collection::vec(proptest::collection::vec("u[0-9]", 0..4), 1..5),
    ) {
        let stored = tokio_test::block_on(async {
            let (client, backend) = test_client();
            let post = client.create_post(new_post("i1", "sunset", None)).await.unwrap();
            for likes in &writes {
                client.like_post(&post.id, likes.clone()).await.unwrap();
            }
            let document = backend.inner.get_document(POSTS, &post.id).await.unwrap();
            serde_json::from_value::<Vec<String>>(document.attribute("likes").unwrap()).unwrap()
        });
        prop_assert_eq!(&stored, writes.last().unwrap());
    }
}
