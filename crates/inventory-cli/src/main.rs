//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use inventory_cli::Cli;

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads INVENTORY_*
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.default_log_level());

    let config = cli.server_config();
    tracing::debug!(?config, "starting inventory server");

    inventory_axum::start_server(config).await
}
