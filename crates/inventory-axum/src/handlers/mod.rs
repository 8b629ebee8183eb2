//! HTTP handlers.
//!
//! Handlers are thin: they extract the request, delegate to the inventory
//! service and shape the response.

pub mod forms;
pub mod items;
pub mod photos;
pub mod search;
