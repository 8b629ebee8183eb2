//! Command-line arguments.
//!
//! `-h` is taken by `--host`, so help is only available as `--help`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use inventory_axum::ServerConfig;
use inventory_axum::bootstrap::DEFAULT_MAX_UPLOAD_BYTES;

/// Inventory server: item records with photos, persisted to a cache
/// directory.
#[derive(Debug, Parser)]
#[command(name = "inventory")]
#[command(about = "Serve an inventory of items with photos over HTTP")]
#[command(version)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Address to listen on
    #[arg(short = 'h', long, env = "INVENTORY_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short = 'p', long, env = "INVENTORY_PORT")]
    pub port: u16,

    /// Cache directory holding inventory.json and photos/
    #[arg(short = 'c', long, env = "INVENTORY_CACHE")]
    pub cache: PathBuf,

    /// Refuse to start if inventory.json cannot be read, instead of
    /// backing it up and starting empty
    #[arg(long = "strict-snapshot")]
    pub strict_snapshot: bool,

    /// Largest accepted request body in bytes
    #[arg(long = "max-upload-bytes", env = "INVENTORY_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Allowed CORS origin (repeatable); all origins are allowed if omitted
    #[arg(long = "allow-origin")]
    pub allow_origins: Vec<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Resolve the arguments into a server configuration.
    pub fn server_config(&self) -> ServerConfig {
        let config = ServerConfig::new(self.host.clone(), self.port, self.cache.clone())
            .with_strict_snapshot(self.strict_snapshot)
            .with_max_upload_bytes(self.max_upload_bytes);

        if self.allow_origins.is_empty() {
            config
        } else {
            config.with_allowed_origins(self.allow_origins.clone())
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub const fn default_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
