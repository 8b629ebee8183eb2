//! Command-line entry point for the inventory server.
//!
//! The binary parses [`Cli`], installs logging and hands the resulting
//! [`inventory_axum::ServerConfig`] to the Axum adapter.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing as _;
use tracing_subscriber as _;

pub mod parser;

pub use parser::Cli;
