//! Endpoint reference parsing

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{FetchError, Result};

/// A parsed artifact location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Object in an S3-compatible bucket (`s3://bucket/key`).
    S3 {
        /// Bucket name.
        bucket: String,
        /// Object key, without a leading slash.
        key: String,
    },
    /// File on the local filesystem (`file:///path` or an absolute path).
    File(PathBuf),
}

impl Endpoint {
    /// Parse an endpoint reference.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FetchError::unsupported(raw, "empty endpoint"));
        }
        if Path::new(raw).is_absolute() {
            return Ok(Self::File(PathBuf::from(raw)));
        }

        let url = Url::parse(raw).map_err(|_| FetchError::unsupported(raw, "not a url"))?;
        match url.scheme() {
            "s3" => {
                let bucket = url
                    .host_str()
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| FetchError::unsupported(raw, "missing bucket"))?;
                let key = url.path().trim_start_matches('/');
                if key.is_empty() {
                    return Err(FetchError::unsupported(raw, "missing object key"));
                }
                Ok(Self::S3 {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                })
            }
            "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|()| FetchError::unsupported(raw, "invalid file path")),
            _ => Err(FetchError::unsupported(raw, "unknown scheme")),
        }
    }
}
