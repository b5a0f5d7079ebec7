//! Backend configuration
//!
//! Endpoint, project and collection identifiers consumed by the domain
//! operations. Values are opaque: only their presence is checked.
//!
//! Configuration can come from three places:
//! - [`BackendConfig::builder`] for programmatic setup
//! - a TOML file ([`BackendConfig::load`], default [`default_config_path`])
//! - `SNAPFEED_*` environment variables ([`BackendConfig::from_env`])

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable names, in the order they are documented.
pub const ENV_ENDPOINT: &str = "SNAPFEED_ENDPOINT";
pub const ENV_PROJECT_ID: &str = "SNAPFEED_PROJECT_ID";
pub const ENV_DATABASE_ID: &str = "SNAPFEED_DATABASE_ID";
pub const ENV_USER_COLLECTION_ID: &str = "SNAPFEED_USER_COLLECTION_ID";
pub const ENV_POST_COLLECTION_ID: &str = "SNAPFEED_POST_COLLECTION_ID";
pub const ENV_SAVES_COLLECTION_ID: &str = "SNAPFEED_SAVES_COLLECTION_ID";
pub const ENV_STORAGE_ID: &str = "SNAPFEED_STORAGE_ID";
pub const ENV_API_KEY: &str = "SNAPFEED_API_KEY";
pub const ENV_ACCOUNT_ROLLBACK: &str = "SNAPFEED_ACCOUNT_ROLLBACK";
pub const ENV_SAVE_POLICY: &str = "SNAPFEED_SAVE_POLICY";

/// What `create_account` does when the auth account exists but the
/// identity document could not be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRollback {
    /// Keep the auth account and report it as orphaned.
    #[default]
    LeaveOrphan,
    /// Delete the auth account that was just created.
    DeleteAccount,
}

impl FromStr for AccountRollback {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "leave_orphan" => Ok(Self::LeaveOrphan),
            "delete_account" => Ok(Self::DeleteAccount),
            other => Err(ConfigError::InvalidValue {
                key: "account_rollback",
                value: other.to_string(),
            }),
        }
    }
}

/// How `save_post` treats an existing (user, post) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Always create a new record; duplicates are possible.
    #[default]
    AlwaysCreate,
    /// Return the existing record for the pair when there is one.
    ReuseExisting,
}

impl FromStr for SavePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "always_create" => Ok(Self::AlwaysCreate),
            "reuse_existing" => Ok(Self::ReuseExisting),
            other => Err(ConfigError::InvalidValue {
                key: "save_policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Remote backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    /// API endpoint, including the version prefix (e.g. `https://host/v1`)
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub user_collection_id: String,
    pub post_collection_id: String,
    pub saves_collection_id: String,
    /// Storage bucket holding post images
    pub storage_id: String,
    /// Server key, only needed for account rollback
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub account_rollback: AccountRollback,
    #[serde(default)]
    pub save_policy: SavePolicy,
}

impl BackendConfig {
    /// Create a new BackendConfigBuilder
    pub fn builder() -> BackendConfigBuilder {
        BackendConfigBuilder::default()
    }

    /// Read configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        Ok(config)
    }

    /// Read configuration from `SNAPFEED_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(v) = lookup(ENV_ENDPOINT) {
            builder = builder.endpoint(v);
        }
        if let Some(v) = lookup(ENV_PROJECT_ID) {
            builder = builder.project_id(v);
        }
        if let Some(v) = lookup(ENV_DATABASE_ID) {
            builder = builder.database_id(v);
        }
        if let Some(v) = lookup(ENV_USER_COLLECTION_ID) {
            builder = builder.user_collection_id(v);
        }
        if let Some(v) = lookup(ENV_POST_COLLECTION_ID) {
            builder = builder.post_collection_id(v);
        }
        if let Some(v) = lookup(ENV_SAVES_COLLECTION_ID) {
            builder = builder.saves_collection_id(v);
        }
        if let Some(v) = lookup(ENV_STORAGE_ID) {
            builder = builder.storage_id(v);
        }
        if let Some(v) = lookup(ENV_API_KEY) {
            builder = builder.api_key(v);
        }
        if let Some(v) = lookup(ENV_ACCOUNT_ROLLBACK) {
            builder = builder.account_rollback(v.parse()?);
        }
        if let Some(v) = lookup(ENV_SAVE_POLICY) {
            builder = builder.save_policy(v.parse()?);
        }
        builder.build()
    }
}

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("snapfeed").join("config.toml"))
}

/// Builder for BackendConfig
#[derive(Debug, Default)]
pub struct BackendConfigBuilder {
    endpoint: Option<String>,
    project_id: Option<String>,
    database_id: Option<String>,
    user_collection_id: Option<String>,
    post_collection_id: Option<String>,
    saves_collection_id: Option<String>,
    storage_id: Option<String>,
    api_key: Option<String>,
    account_rollback: AccountRollback,
    save_policy: SavePolicy,
}

impl BackendConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    pub fn database_id(mut self, id: impl Into<String>) -> Self {
        self.database_id = Some(id.into());
        self
    }

    pub fn user_collection_id(mut self, id: impl Into<String>) -> Self {
        self.user_collection_id = Some(id.into());
        self
    }

    pub fn post_collection_id(mut self, id: impl Into<String>) -> Self {
        self.post_collection_id = Some(id.into());
        self
    }

    pub fn saves_collection_id(mut self, id: impl Into<String>) -> Self {
        self.saves_collection_id = Some(id.into());
        self
    }

    pub fn storage_id(mut self, id: impl Into<String>) -> Self {
        self.storage_id = Some(id.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn account_rollback(mut self, policy: AccountRollback) -> Self {
        self.account_rollback = policy;
        self
    }

    pub fn save_policy(mut self, policy: SavePolicy) -> Self {
        self.save_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BackendConfig, ConfigError> {
        Ok(BackendConfig {
            endpoint: self.endpoint.ok_or(ConfigError::MissingValue("endpoint"))?,
            project_id: self.project_id.ok_or(ConfigError::MissingValue("project_id"))?,
            database_id: self.database_id.ok_or(ConfigError::MissingValue("database_id"))?,
            user_collection_id: self
                .user_collection_id
                .ok_or(ConfigError::MissingValue("user_collection_id"))?,
            post_collection_id: self
                .post_collection_id
                .ok_or(ConfigError::MissingValue("post_collection_id"))?,
            saves_collection_id: self
                .saves_collection_id
                .ok_or(ConfigError::MissingValue("saves_collection_id"))?,
            storage_id: self.storage_id.ok_or(ConfigError::MissingValue("storage_id"))?,
            api_key: self.api_key,
            account_rollback: self.account_rollback,
            save_policy: self.save_policy,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
