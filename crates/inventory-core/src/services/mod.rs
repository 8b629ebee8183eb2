//! Application services.
//!
//! Services orchestrate the record store and the storage ports. They
//! depend only on port traits, never on concrete adapters.

mod inventory;
pub mod transaction;

pub use inventory::{CorruptSnapshotPolicy, InventoryService, SweepReport};
pub use transaction::{AssetTransaction, Stage};
