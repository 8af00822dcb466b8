//! Crowdfund chain replayer — entry point.
//!
//! Reads a JSON file of blocks, applies every transaction in order against
//! a fresh in-memory ledger, and prints the resulting fundraiser accounts.
//! Useful for auditing a recorded history and for reproducing the exact
//! ledger state at a given block height.

mod config;
mod errors;
mod replay;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let file = replay::load_blocks(&config.replay_file)?;
    info!(blocks = file.blocks.len(), file = %config.replay_file, "replaying");

    let (processor, summary) = replay::run(&config, &file.blocks)?;

    let mut fundraisers: Vec<_> = processor
        .backend()
        .iter()
        .filter(|account| account.fundraiser.is_some())
        .collect();
    fundraisers.sort_by(|a, b| a.address.cmp(&b.address));
    println!("{}", serde_json::to_string_pretty(&fundraisers)?);

    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        "replay finished"
    );

    Ok(())
}
