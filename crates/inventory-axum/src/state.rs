//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// This is an Arc-wrapped `AxumContext` holding the inventory service and
/// the asset store uploads are staged through.
pub type AppState = Arc<AxumContext>;
