/// Best-effort removal of photo files referenced by details
///
/// Uploading is done elsewhere; the journal only stores the path string.
/// When a detail goes away the file should go too, but a file that cannot be
/// removed never blocks or undoes the row deletion.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Photo files on local disk, addressed by the path strings stored in details
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Relative photo paths are resolved against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a stored photo path to a file on disk
    ///
    /// Returns `None` for blank paths, for paths that climb out of their
    /// directory with `..`, and for absolute paths outside the root.
    pub fn resolve(&self, photo_path: &str) -> Option<PathBuf> {
        let trimmed = photo_path.trim();
        if trimmed.is_empty() {
            return None;
        }

        let path = Path::new(trimmed);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }

        if path.is_absolute() {
            path.starts_with(&self.root).then(|| path.to_path_buf())
        } else {
            Some(self.root.join(path))
        }
    }

    /// Delete the file behind `photo_path`, logging instead of failing
    ///
    /// Returns whether a file was actually removed.
    pub fn remove(&self, photo_path: &str) -> bool {
        let Some(path) = self.resolve(photo_path) else {
            tracing::warn!("Refusing to delete photo with unusable path: {:?}", photo_path);
            return false;
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted photo file: {}", path.display());
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Photo file already gone: {}", path.display());
                false
            }
            Err(e) => {
                tracing::warn!("Failed to delete photo file {}: {}", path.display(), e);
                false
            }
        }
    }
}
