//! Path guard: confines requested paths to the configured root directory

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::file_access::{confine, is_confined};
use crate::domain::DomainError;

/// Resolves untrusted request paths to files under a fixed root
///
/// Holds no per-request state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for `root`, canonicalizing it once
    ///
    /// Fails if the root does not exist or is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, DomainError> {
        let root = root.as_ref();

        let canonical = std::fs::canonicalize(root).map_err(|e| {
            DomainError::internal(format!(
                "cannot canonicalize root directory '{}': {}",
                root.display(),
                e
            ))
        })?;

        if !canonical.is_dir() {
            return Err(DomainError::internal(format!(
                "root '{}' is not a directory",
                canonical.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `requested` to a readable regular file under the root
    ///
    /// The lexical screen and confinement check run before any filesystem
    /// call. Symlinks are then resolved and the canonical target must still be
    /// under the root.
    pub async fn resolve(&self, requested: &str) -> Result<PathBuf, DomainError> {
        let candidate = confine(&self.root, requested)?;

        let canonical = tokio::fs::canonicalize(&candidate)
            .await
            .map_err(|e| classify_io_error(e, &candidate))?;

        if !is_confined(&self.root, &canonical) {
            return Err(DomainError::directory_traversal(format!(
                "'{}' links outside the root to '{}'",
                requested,
                canonical.display()
            )));
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|e| classify_io_error(e, &canonical))?;

        if !metadata.is_file() {
            return Err(DomainError::file_not_found(format!(
                "'{}' is not a regular file",
                canonical.display()
            )));
        }

        // Readability check; the streaming layer reopens the file.
        tokio::fs::File::open(&canonical)
            .await
            .map_err(|e| classify_io_error(e, &canonical))?;

        debug!(path = %canonical.display(), "Resolved requested path");
        Ok(canonical)
    }
}

/// Map a filesystem lookup failure onto the error taxonomy
pub fn classify_io_error(err: io::Error, path: &Path) -> DomainError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
            DomainError::file_not_found(format!("'{}' does not exist", path.display()))
        }
        io::ErrorKind::PermissionDenied => {
            DomainError::permission_denied(format!("'{}' is not readable", path.display()))
        }
        _ => DomainError::internal(format!("probing '{}' failed: {}", path.display(), err)),
    }
}
