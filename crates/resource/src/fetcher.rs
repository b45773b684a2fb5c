use std::path::{Path, PathBuf};

use async_trait::async_trait;
use opsdeck_credential::SecureString;
use serde::Deserialize;

use crate::endpoint::Endpoint;
use crate::error::Result;
#[cfg(test)]
use crate::error::FetchError;
use crate::handle::ArtifactHandle;
use crate::local::LocalFetcher;
use crate::s3::{S3Fetcher, S3Settings};

/// Object-store credentials used to authenticate a fetch.
#[derive(Clone, Default, Deserialize)]
pub struct AccessKeys {
    /// Access key id.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: SecureString,
}

impl AccessKeys {
    /// Build a key pair.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecureString::new(secret_key),
        }
    }
}

impl std::fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeys")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key)
            .finish()
    }
}

/// Retrieves a named remote artifact into a local, exclusively-owned copy.
///
/// Implementations never retry. The returned handle is owned by the caller,
/// whose scope decides when the local copy is released.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the artifact at `endpoint`.
    async fn fetch(&self, endpoint: &str, keys: &AccessKeys) -> Result<ArtifactHandle>;
}

/// Reserve a uniquely named empty file for an artifact copy.
///
/// The returned handle removes the file when released, so a failed download
/// leaves nothing behind.
pub(crate) fn reserve_scratch(
    scratch_dir: Option<&Path>,
    extension: Option<&str>,
) -> Result<ArtifactHandle> {
    let suffix = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
    let mut builder = tempfile::Builder::new();
    builder.prefix("opsdeck-artifact-").suffix(&suffix);

    let file = match scratch_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let path = file.into_temp_path().keep()?;
    Ok(ArtifactHandle::temporary(path))
}

/// Routes each endpoint to the fetcher for its scheme.
#[derive(Debug, Clone)]
pub struct EndpointFetcher {
    s3: S3Fetcher,
    local: LocalFetcher,
}

impl EndpointFetcher {
    /// Build a router writing local copies under `scratch_dir` (the system
    /// temp dir when `None`).
    pub fn new(s3: S3Settings, scratch_dir: Option<PathBuf>) -> Self {
        Self {
            s3: S3Fetcher::new(s3, scratch_dir.clone()),
            local: LocalFetcher::new(scratch_dir),
        }
    }
}

#[async_trait]
impl ResourceFetcher for EndpointFetcher {
    async fn fetch(&self, endpoint: &str, keys: &AccessKeys) -> Result<ArtifactHandle> {
        match Endpoint::parse(endpoint)? {
            Endpoint::S3 { bucket, key } => self.s3.download(endpoint, &bucket, &key, keys).await,
            Endpoint::File(path) => self.local.copy(endpoint, &path).await,
        }
    }
}
