use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;

use crate::errors::{Error, Result};

/// A working copy in a scratch directory.
///
/// The directory is removed when this value drops, whether the run
/// finished, failed or returned early.
pub struct ClonedRepository {
    _scratch: TempDir,
    root: PathBuf,
}

impl ClonedRepository {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory to analyse: the root, or the named subdirectory inside it.
    pub fn scan_root(&self, subdirectory: &str) -> Result<PathBuf> {
        if subdirectory.is_empty() {
            return Ok(self.root.clone());
        }
        let path = self.root.join(subdirectory);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(Error::SubdirectoryNotFound {
                subdirectory: subdirectory.to_string(),
            })
        }
    }
}

/// Clone `url` into a fresh scratch directory under the system temp dir.
pub fn clone_repository(url: &str) -> Result<ClonedRepository> {
    clone_repository_in(url, &std::env::temp_dir())
}

/// Clone `url` into a fresh scratch directory created inside `parent`.
pub fn clone_repository_in(url: &str, parent: &Path) -> Result<ClonedRepository> {
    let scratch = tempfile::Builder::new()
        .prefix("repo-analyzer-")
        .tempdir_in(parent)?;
    let root = scratch.path().join("repo");

    tracing::info!(url, "Cloning repository");
    Repository::clone(url, &root).map_err(|source| Error::Clone {
        url: url.to_string(),
        source,
    })?;
    tracing::debug!(path = %root.display(), "Clone complete");

    Ok(ClonedRepository {
        _scratch: scratch,
        root,
    })
}
