use std::sync::Arc;

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use frontrun_monitor::config::load_config;
use frontrun_monitor::mempool::monitor;

#[derive(Parser, Debug)]
#[command(name = "frontrun-monitor", about = "Mempool front-run opportunity monitor")]
struct Args {
    /// Path to the environment file with RPC and exchange settings.
    #[arg(long, default_value = ".env", env = "ENV_FILE")]
    env_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(&args.env_file)?;

    let provider = ProviderBuilder::new()
        .connect(&config.rpc_url)
        .await
        .context("failed to connect to RPC endpoint")?
        .erased();

    // Fail fast on a dead endpoint instead of looping on filter errors.
    let block = provider
        .get_block_number()
        .await
        .context("RPC endpoint is not responding")?;

    info!(
        chain_id = config.chain_id,
        block,
        exchanges = config.exchanges.len(),
        base_tokens = config.base_tokens.len(),
        "connected, watching pending transactions"
    );

    monitor::run(provider, Arc::new(config)).await
}
