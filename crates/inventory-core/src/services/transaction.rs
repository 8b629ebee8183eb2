//! Per-request asset bookkeeping.
//!
//! Every mutation that touches an asset file follows the same order:
//!
//! 1. the new file is written (`AssetStaged`)
//! 2. the record store is mutated and the snapshot persisted (`RecordCommitted`)
//! 3. the file it replaced, if any, is deleted (`SupersededPendingDelete`)
//! 4. `Done`
//!
//! A failure before step 2 completes rolls back by deleting the staged file.
//! A failure in step 3 is only logged: the record already points at the new
//! file, and the leftover is picked up by the orphan sweep.

use tracing::{debug, warn};

use crate::domain::AssetRef;
use crate::ports::AssetStore;

/// Where a request currently is in the asset protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AssetStaged,
    RecordCommitted,
    SupersededPendingDelete,
    Done,
}

/// Tracks the staged and superseded files of one mutating request.
pub struct AssetTransaction<'a> {
    assets: &'a dyn AssetStore,
    stage: Stage,
    staged: Option<AssetRef>,
    superseded: Option<AssetRef>,
}

impl<'a> AssetTransaction<'a> {
    /// Start tracking a request. `staged` is the freshly written file, if any.
    pub fn begin(assets: &'a dyn AssetStore, staged: Option<AssetRef>) -> Self {
        Self {
            assets,
            stage: Stage::AssetStaged,
            staged,
            superseded: None,
        }
    }

    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Record that the store mutation and snapshot write succeeded.
    ///
    /// `superseded` is the file the mutation made unreachable (replaced or
    /// released photo). It is ignored when it equals the staged file.
    #[must_use]
    pub fn commit(mut self, superseded: Option<AssetRef>) -> Self {
        self.superseded = superseded.filter(|old| Some(old) != self.staged.as_ref());
        self.stage = if self.superseded.is_some() {
            Stage::SupersededPendingDelete
        } else {
            Stage::RecordCommitted
        };
        debug!(target: "inventory.assets", stage = ?self.stage, "record committed");
        self
    }

    /// Delete the superseded file, if any, and finish.
    pub async fn finish(mut self) -> Stage {
        if let Some(old) = self.superseded.take() {
            match self.assets.remove(&old).await {
                Ok(true) => debug!(target: "inventory.assets", asset = %old, "superseded asset deleted"),
                Ok(false) => debug!(target: "inventory.assets", asset = %old, "superseded asset already gone"),
                Err(e) => warn!(
                    target: "inventory.assets",
                    asset = %old,
                    error = %e,
                    "failed to delete superseded asset; leaving it for the orphan sweep"
                ),
            }
        }
        self.stage = Stage::Done;
        self.stage
    }

    /// Undo the request's file side effects: delete the staged file.
    ///
    /// Only meaningful before `commit`; after it this is a no-op.
    pub async fn rollback(self) {
        if self.stage != Stage::AssetStaged {
            return;
        }
        let Some(staged) = self.staged else {
            return;
        };
        match self.assets.remove(&staged).await {
            Ok(_) => debug!(target: "inventory.assets", asset = %staged, "staged asset rolled back"),
            Err(e) => warn!(
                target: "inventory.assets",
                asset = %staged,
                error = %e,
                "failed to delete staged asset during rollback"
            ),
        }
    }
}
