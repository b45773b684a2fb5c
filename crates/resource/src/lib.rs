//! # opsdeck Resource
//!
//! Fetches remote artifacts (scripts, dumps) into exclusively-owned local
//! copies. Every copy is wrapped in an [`ArtifactHandle`] whose release hook
//! removes the file when the owner's scope ends, whatever the exit path.
//!
//! Supported endpoint references:
//!
//! - `s3://bucket/key` via [`S3Fetcher`]
//! - `file:///abs/path` or a bare absolute path via [`LocalFetcher`]
//!
//! [`EndpointFetcher`] routes between them and is what callers normally hold,
//! behind the [`ResourceFetcher`] trait.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod handle;
pub mod local;
pub mod s3;

pub use endpoint::Endpoint;
pub use error::{FetchError, Result};
pub use fetcher::{AccessKeys, EndpointFetcher, ResourceFetcher};
pub use handle::ArtifactHandle;
pub use local::LocalFetcher;
pub use s3::{S3Fetcher, S3Settings};
