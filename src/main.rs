use std::sync::Arc;
use tracing::info;
use utxo_validator::{api::Server, config::Config, pool::TransactionPool, utxo::UtxoCache};

/// The main entry point for the validator service.
///
/// Initializes logging, loads the configuration, seeds the UTXO set with the
/// configured genesis outputs and serves the JSON-RPC API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging using tracing_subscriber's default stdout formatter.
    tracing_subscriber::fmt::init();

    // Load the service configuration; a missing or invalid file aborts startup.
    let config = Config::load("config/default.toml")?;
    info!("Validator starting with config: {:?}", config);

    // Seed the shared UTXO set. This is the "real" pool every validation
    // snapshots and that only accepted transactions mutate.
    let utxo_cache = UtxoCache::with_utxos(config.genesis.iter().map(|g| g.to_entry()));
    info!("UTXO set seeded with {} genesis outputs", utxo_cache.len().await);

    // Accepted transactions wait here until drained via getPendingTransactions.
    let tx_pool = Arc::new(TransactionPool::new());

    // Build the API server over the shared set and pool, then serve until shutdown.
    let server = Server::new(config, utxo_cache, tx_pool);
    server.start().await?;

    Ok(())
}
