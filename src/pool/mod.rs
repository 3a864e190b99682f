//! Transaction Pool Module
//!
//! This module holds transactions that passed validation and were applied to
//! the UTXO set, waiting to be picked up for inclusion in the ledger.

mod tx_pool;

pub use tx_pool::TransactionPool;
