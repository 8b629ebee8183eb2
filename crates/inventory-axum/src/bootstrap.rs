//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use inventory_core::{AssetStore, CacheLayout, CorruptSnapshotPolicy, InventoryService};
use inventory_fs::StoreFactory;
use tokio::net::TcpListener;
use tracing::info;

/// Default cap on a request body, which bounds photo uploads.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Root of the cache directory (snapshot plus photo directory).
    pub cache_dir: PathBuf,
    /// What to do if the snapshot cannot be read at startup.
    pub snapshot_policy: CorruptSnapshotPolicy,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            cache_dir: cache_dir.into(),
            snapshot_policy: CorruptSnapshotPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors: CorsConfig::default(),
        }
    }

    /// Refuse to start on an unreadable snapshot instead of resetting it.
    #[must_use]
    pub const fn with_strict_snapshot(mut self, strict: bool) -> Self {
        self.snapshot_policy = if strict {
            CorruptSnapshotPolicy::Fail
        } else {
            CorruptSnapshotPolicy::Reset
        };
        self
    }

    #[must_use]
    pub const fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// `host:port` as passed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The inventory service.
    pub inventory: Arc<InventoryService>,
    /// Asset store used to stage uploads before they reach the service.
    pub assets: Arc<dyn AssetStore>,
    /// Body limit applied to every route.
    pub max_upload_bytes: usize,
}

/// Prepare the cache directory, load the inventory and sweep orphaned
/// photos.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let layout = CacheLayout::new(&config.cache_dir)
        .with_context(|| format!("invalid cache directory {}", config.cache_dir.display()))?;

    info!(
        target: "inventory.paths",
        cache_dir = %layout.root().display(),
        snapshot = %layout.snapshot_path().display(),
        photos = %layout.asset_dir().display(),
        policy = ?config.snapshot_policy,
        "Axum bootstrap resolved paths"
    );

    let stores = StoreFactory::open_inventory(&layout, config.snapshot_policy).await?;

    Ok(AxumContext {
        inventory: stores.inventory,
        assets: stores.assets,
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Start the web server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("inventory server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("inventory server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
