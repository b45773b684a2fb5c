//! S3-compatible object store fetcher

use std::path::{Path, PathBuf};

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::fetcher::{AccessKeys, reserve_scratch};
use crate::handle::ArtifactHandle;

const DEFAULT_REGION: &str = "us-east-1";
const CREDENTIALS_SOURCE: &str = "opsdeck-static";

/// Connection settings for the object store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct S3Settings {
    /// Signing region.
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, Ceph, ...).
    pub endpoint_url: Option<String>,
    /// Address buckets as `host/bucket` instead of `bucket.host`.
    pub force_path_style: bool,
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            endpoint_url: None,
            force_path_style: false,
        }
    }
}

/// Downloads objects with static access keys supplied per call.
#[derive(Debug, Clone)]
pub struct S3Fetcher {
    settings: S3Settings,
    scratch_dir: Option<PathBuf>,
}

impl S3Fetcher {
    /// Create a fetcher with the given store settings.
    pub fn new(settings: S3Settings, scratch_dir: Option<PathBuf>) -> Self {
        Self {
            settings,
            scratch_dir,
        }
    }

    fn client(&self, keys: &AccessKeys) -> Client {
        let credentials = Credentials::new(
            keys.access_key.clone(),
            keys.secret_key.expose().to_owned(),
            None,
            None,
            CREDENTIALS_SOURCE,
        );
        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(self.settings.force_path_style);
        if let Some(url) = &self.settings.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        Client::from_conf(builder.build())
    }

    /// Download `bucket/key` into a scratch file.
    pub async fn download(
        &self,
        endpoint: &str,
        bucket: &str,
        key: &str,
        keys: &AccessKeys,
    ) -> Result<ArtifactHandle> {
        let response = self
            .client(keys)
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    FetchError::NotFound {
                        endpoint: endpoint.to_owned(),
                    }
                } else {
                    FetchError::Storage {
                        endpoint: endpoint.to_owned(),
                        reason: DisplayErrorContext(&err).to_string(),
                    }
                }
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|err| FetchError::Storage {
                endpoint: endpoint.to_owned(),
                reason: err.to_string(),
            })?
            .into_bytes();

        let extension = Path::new(key).extension().and_then(|ext| ext.to_str());
        let handle = reserve_scratch(self.scratch_dir.as_deref(), extension)?;
        tokio::fs::write(handle.path(), &body).await?;

        tracing::debug!(
            endpoint,
            bytes = body.len(),
            path = %handle.path().display(),
            "downloaded artifact"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = S3Settings::default();
        assert_eq!(settings.region, "us-east-1");
        assert!(settings.endpoint_url.is_none());
        assert!(!settings.force_path_style);
    }

    #[test]
    fn settings_deserialize_partial() {
        let raw = "endpoint_url = \"http://localhost:9000\"\nforce_path_style = true";
        let settings: S3Settings = toml::from_str(raw).unwrap();
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(settings.force_path_style);
    }

    #[tokio::test]
    async fn unreachable_store_is_storage_error() {
        let settings = S3Settings {
            endpoint_url: Some("http://127.0.0.1:1".into()),
            force_path_style: true,
            ..S3Settings::default()
        };
        let scratch = tempfile::tempdir().unwrap();
        let fetcher = S3Fetcher::new(settings, Some(scratch.path().to_path_buf()));

        let err = fetcher
            .download("s3://b/k.sql", "b", "k.sql", &AccessKeys::new("id", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Storage { .. }));
        assert!(!err.to_string().contains("secret"));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}
