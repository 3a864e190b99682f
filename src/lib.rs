//! This crate validates proposed transactions against an unspent-output (UTXO) set
//! before they are admitted to a pending pool. It includes modules for data types,
//! the UTXO set, signature handling, validation, the pending pool, the JSON-RPC API
//! and configuration.

pub mod types; // Transactions, UTXOs and validation results.
pub mod utxo; // The shared UTXO set and independent snapshots of it.
pub mod signature; // Signing and verifying inputs over the canonical payload.
pub mod validation; // The validation pass and its canonical signing payload.
pub mod pool; // Pending pool of accepted transactions.
pub mod api; // JSON-RPC endpoint for validating and submitting transactions.
pub mod config; // Defines and loads service configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use utxo::{UtxoCache, UtxoPool, UtxoSnapshot};
pub use validation::Validator;
