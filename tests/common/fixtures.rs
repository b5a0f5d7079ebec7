//! Client fixtures

use std::sync::Arc;

use snapfeed::backend::FileUpload;
use snapfeed::client::{Client, NewPost};
use snapfeed::shared::{BackendConfig, BackendConfigBuilder, Identity, NewUser};

use super::fake_backend::FakeBackend;

pub const BUCKET: &str = "media";
pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const SAVES: &str = "saves";

pub fn config_builder() -> BackendConfigBuilder {
    BackendConfig::builder()
        .endpoint("memory://backend")
        .project_id("test-project")
        .database_id("main")
        .user_collection_id(USERS)
        .post_collection_id(POSTS)
        .saves_collection_id(SAVES)
        .storage_id(BUCKET)
}

pub fn test_config() -> BackendConfig {
    config_builder().build().expect("test config is complete")
}

/// Client over a fresh fake backend; the backend handle is returned for
/// inspection
pub fn test_client() -> (Client<FakeBackend>, Arc<FakeBackend>) {
    client_with(test_config())
}

pub fn client_with(config: BackendConfig) -> (Client<FakeBackend>, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::new());
    (Client::with_backend(Arc::clone(&backend), config), backend)
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        username: Some(name.to_lowercase().replace(' ', "")),
        email: email.to_string(),
        password: "correct-horse".to_string(),
    }
}

/// Create an account, sign in, and load the identity into the session
pub async fn signed_in(client: &Client<FakeBackend>, name: &str, email: &str) -> Identity {
    let user = new_user(name, email);
    client
        .create_account(user.clone())
        .await
        .expect("account creation succeeds");
    client
        .sign_in(&user.email, &user.password)
        .await
        .expect("sign in succeeds");
    client
        .check_current_user()
        .await
        .expect("identity is loaded after sign in")
}

pub fn new_post(creator_id: &str, caption: &str, tags: Option<&str>) -> NewPost {
    NewPost {
        creator_id: creator_id.to_string(),
        caption: caption.to_string(),
        file: FileUpload::new("photo.png", "image/png", vec![0x89u8, b'P', b'N', b'G']),
        location: Some("Lisbon".to_string()),
        tags: tags.map(str::to_string),
    }
}
