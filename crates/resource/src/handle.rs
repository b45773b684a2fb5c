//! Scoped handle for a locally materialized artifact

use std::path::{Path, PathBuf};

type ReleaseHook = Box<dyn FnOnce(&Path) + Send>;

/// Exclusive, scoped reference to a local copy of a remote artifact.
///
/// The release hook runs exactly once, when the handle is dropped or
/// [`release`](Self::release)d, on every exit path of the owner. Use
/// [`into_path`](Self::into_path) to keep the file and skip the hook.
pub struct ArtifactHandle {
    path: PathBuf,
    on_release: Option<ReleaseHook>,
}

impl ArtifactHandle {
    /// Create a handle for `path` with a custom release hook.
    pub fn new<F>(path: impl Into<PathBuf>, on_release: F) -> Self
    where
        F: FnOnce(&Path) + Send + 'static,
    {
        Self {
            path: path.into(),
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Create a handle whose release removes the file (best-effort).
    pub fn temporary(path: impl Into<PathBuf>) -> Self {
        Self::new(path, remove_best_effort)
    }

    /// Local path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release now rather than at end of scope.
    pub fn release(self) {
        drop(self);
    }

    /// Take the path and cancel the release hook; the caller now owns the file.
    #[must_use]
    pub fn into_path(mut self) -> PathBuf {
        self.on_release.take();
        std::mem::take(&mut self.path)
    }
}

impl Drop for ArtifactHandle {
    fn drop(&mut self) {
        if let Some(on_release) = self.on_release.take() {
            on_release(&self.path);
        }
    }
}

impl std::fmt::Debug for ArtifactHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactHandle")
            .field("path", &self.path)
            .field("armed", &self.on_release.is_some())
            .finish()
    }
}

fn remove_best_effort(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove artifact"),
    }
}
