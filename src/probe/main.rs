/**
 * snapfeed probe
 *
 * Connects to the configured backend, optionally signs in with
 * `SNAPFEED_PROBE_EMAIL`/`SNAPFEED_PROBE_PASSWORD`, then reports the
 * signed-in identity and the size of the recent-posts feed.
 *
 * Configuration: a TOML file given as the first argument, the default
 * config file, or `SNAPFEED_*` environment variables (a `.env` file is
 * loaded first).
 */

use snapfeed::backend::{HttpBackend, RemoteBackend};
use snapfeed::client::{Client, OperationError};
use snapfeed::shared::config::{default_config_path, BackendConfig};

fn load_config() -> Result<BackendConfig, Box<dyn std::error::Error>> {
    if let Some(path) = std::env::args().nth(1) {
        return Ok(BackendConfig::load(path)?);
    }
    if let Some(path) = default_config_path().filter(|p| p.exists()) {
        tracing::info!("Using config file {}", path.display());
        return Ok(BackendConfig::load(path)?);
    }
    Ok(BackendConfig::from_env()?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = load_config()?;
    tracing::info!("Probing {}", config.endpoint);

    let backend = HttpBackend::new(&config)?;
    let client = Client::new(backend, config);

    let credentials = match (
        std::env::var("SNAPFEED_PROBE_EMAIL"),
        std::env::var("SNAPFEED_PROBE_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => Some((email, password)),
        _ => None,
    };

    if let Err(e) = probe(&client, credentials).await {
        eprintln!("feed unavailable: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Sign in if credentials are given, report identity and feed size, then
/// end any session this run started. Returns the number of recent posts.
async fn probe<B: RemoteBackend>(
    client: &Client<B>,
    credentials: Option<(String, String)>,
) -> Result<usize, OperationError> {
    let mut signed_in = false;
    if let Some((email, password)) = credentials {
        match client.sign_in(&email, &password).await {
            Ok(session) => {
                tracing::info!("Signed in, session {}", session.id);
                signed_in = true;
            }
            Err(e) => tracing::warn!("Sign in failed: {}", e),
        }
    }

    match client.check_current_user().await {
        Some(identity) => println!("signed in as {} <{}>", identity.name, identity.email),
        None => println!("not signed in"),
    }

    let feed = client.get_recent_posts().await;
    if let Ok(posts) = &feed {
        println!("{} recent posts", posts.len());
    }

    // The session may exist without an identity document, so this does not
    // look at the session manager.
    if signed_in {
        if let Err(e) = client.sign_out().await {
            tracing::warn!("Sign out failed: {}", e);
        }
    }

    feed.map(|posts| posts.len())
}
