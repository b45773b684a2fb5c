//! Local filesystem fetcher

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::{FetchError, Result};
use crate::fetcher::{AccessKeys, ResourceFetcher, reserve_scratch};
use crate::handle::ArtifactHandle;

/// Copies artifacts that already live on the local filesystem.
///
/// The source file is never handed out directly; every fetch produces a
/// private copy so that releasing the handle cannot remove the original.
#[derive(Debug, Clone, Default)]
pub struct LocalFetcher {
    scratch_dir: Option<PathBuf>,
}

impl LocalFetcher {
    /// Create a fetcher placing copies under `scratch_dir`.
    pub fn new(scratch_dir: Option<PathBuf>) -> Self {
        Self { scratch_dir }
    }

    /// Copy `src` into a fresh scratch file.
    pub async fn copy(&self, endpoint: &str, src: &Path) -> Result<ArtifactHandle> {
        let extension = src.extension().and_then(|ext| ext.to_str());
        let handle = reserve_scratch(self.scratch_dir.as_deref(), extension)?;

        match tokio::fs::copy(src, handle.path()).await {
            Ok(bytes) => {
                tracing::debug!(
                    endpoint,
                    bytes,
                    path = %handle.path().display(),
                    "copied local artifact"
                );
                Ok(handle)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound {
                endpoint: endpoint.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ResourceFetcher for LocalFetcher {
    async fn fetch(&self, endpoint: &str, _keys: &AccessKeys) -> Result<ArtifactHandle> {
        match Endpoint::parse(endpoint)? {
            Endpoint::File(path) => self.copy(endpoint, &path).await,
            Endpoint::S3 { .. } => Err(FetchError::unsupported(endpoint, "not a local path")),
        }
    }
}
