//! Configuration for the database plugin

use std::path::{Path, PathBuf};

use opsdeck_resource::{AccessKeys, S3Settings};
use serde::Deserialize;
use thiserror::Error;

use crate::runner::DEFAULT_CLIENT;
use crate::validate::DEFAULT_PORT;

/// Errors raised while loading [`DatabaseConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// File that was attempted
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The TOML document is malformed or has wrong types.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override has an unusable value.
    #[error("invalid value for {var}: {reason}")]
    Env {
        /// Variable name
        var: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Object storage connection and credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Region, endpoint and addressing style.
    #[serde(flatten)]
    pub settings: S3Settings,
    /// Access keys presented on every fetch.
    #[serde(flatten)]
    pub keys: AccessKeys,
}

/// Settings of the `runScript` action.
///
/// ```toml
/// client_command = ["/usr/bin/mysql"]
/// default_port = 3306
/// scratch_dir = "/var/tmp/opsdeck"
///
/// [storage]
/// region = "eu-west-1"
/// endpoint_url = "http://minio:9000"
/// force_path_style = true
/// access_key = "AKIA..."
/// secret_key = "..."
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Client program followed by fixed leading arguments.
    pub client_command: Vec<String>,
    /// Port for records that carry none.
    pub default_port: u16,
    /// Where fetched scripts are written; system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Object storage access.
    pub storage: StorageConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            client_command: vec![DEFAULT_CLIENT.to_owned()],
            default_port: DEFAULT_PORT,
            scratch_dir: None,
            storage: StorageConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `OPSDECK_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// `OPSDECK_MYSQL_COMMAND` is split on whitespace.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(command) = lookup("OPSDECK_MYSQL_COMMAND") {
            let command: Vec<String> = command.split_whitespace().map(str::to_owned).collect();
            if command.is_empty() {
                return Err(ConfigError::Env {
                    var: "OPSDECK_MYSQL_COMMAND",
                    reason: "empty command".into(),
                });
            }
            self.client_command = command;
        }
        if let Some(port) = lookup("OPSDECK_DEFAULT_PORT") {
            self.default_port = port
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| ConfigError::Env {
                    var: "OPSDECK_DEFAULT_PORT",
                    reason: format!("'{port}' is not a port number"),
                })?;
        }
        if let Some(dir) = lookup("OPSDECK_SCRATCH_DIR") {
            self.scratch_dir = Some(PathBuf::from(dir));
        }
        if let Some(region) = lookup("OPSDECK_S3_REGION") {
            self.storage.settings.region = region;
        }
        if let Some(url) = lookup("OPSDECK_S3_ENDPOINT") {
            self.storage.settings.endpoint_url = Some(url);
        }
        if let Some(access_key) = lookup("OPSDECK_S3_ACCESS_KEY") {
            self.storage.keys.access_key = access_key;
        }
        if let Some(secret_key) = lookup("OPSDECK_S3_SECRET_KEY") {
            self.storage.keys.secret_key = secret_key.into();
        }
        Ok(self)
    }
}
