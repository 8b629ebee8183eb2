//! Cache directory layout.
//!
//! Everything the server persists lives under one cache directory:
//!
//! ```text
//! <cache>/
//! ├── inventory.json   # snapshot of the item collection
//! └── photos/          # one file per bound photo
//! ```

mod ensure;
mod error;

use std::path::{Path, PathBuf};

pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};
pub use error::PathError;

/// File name of the snapshot inside the cache directory.
pub const SNAPSHOT_FILE_NAME: &str = "inventory.json";

/// Name of the asset directory inside the cache directory.
pub const ASSET_DIR_NAME: &str = "photos";

/// Resolved locations inside a cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Resolve `root` to an absolute path. Relative paths are taken from the
    /// current working directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathError> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(PathError::EmptyPath);
        }
        let root =
            std::path::absolute(root).map_err(|e| PathError::CurrentDirError(e.to_string()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE_NAME)
    }

    pub fn asset_dir(&self) -> PathBuf {
        self.root.join(ASSET_DIR_NAME)
    }

    /// Create the cache and asset directories if needed and check that both
    /// are writable.
    pub fn ensure(&self, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
        ensure_directory(&self.root, strategy)?;
        ensure_directory(&self.asset_dir(), DirectoryCreationStrategy::AutoCreate)
    }
}
