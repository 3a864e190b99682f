//! UTXO Set Module
//!
//! This module holds the unspent outputs transactions are validated against:
//! - `UtxoPool`: the narrow interface the validator reads and simulates spends on
//! - `UtxoSnapshot`: a plain, independently owned copy of the set
//! - `UtxoCache`: the shared, lock-protected set mutated only after acceptance

mod cache;
mod pool;

pub use cache::{ApplyError, UtxoCache};
pub use pool::{UtxoPool, UtxoSnapshot};
