//! Photo asset references.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Extension given to every generated asset name. Assets are served as JPEG
/// regardless of what was actually uploaded.
pub const ASSET_EXTENSION: &str = "jpg";

/// Rejected asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid asset reference: {0:?}")]
pub struct InvalidAssetRef(pub String);

/// Name of a photo file inside the asset directory.
///
/// A reference is a bare file name: never empty, never `.` or `..`, and
/// free of path separators. This keeps every reference resolvable only
/// inside the asset directory, including references read back from a
/// snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetRef(String);

impl AssetRef {
    /// Validate a file name as an asset reference.
    pub fn parse(name: impl Into<String>) -> Result<Self, InvalidAssetRef> {
        let name = name.into();
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if valid {
            Ok(Self(name))
        } else {
            Err(InvalidAssetRef(name))
        }
    }

    /// Generate a fresh, unique reference: `<unix millis>-<uuid v4>.jpg`.
    pub fn generate() -> Self {
        Self(format!(
            "{}-{}.{ASSET_EXTENSION}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetRef {
    type Error = InvalidAssetRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AssetRef> for String {
    fn from(value: AssetRef) -> Self {
        value.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file deposited in the asset directory by the upload mechanism, not yet
/// bound to any record.
///
/// Until it is bound and the owning record is committed, the file is a
/// transient orphan and whoever holds the `StagedAsset` is responsible for
/// either committing or deleting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAsset {
    path: PathBuf,
}

impl StagedAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
