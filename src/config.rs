//! Configuration Module
//!
//! This module defines all configuration structures for the validator service.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::{Utxo, UtxoId};
use ethers::types::{Address, H256};
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// [validation]
/// duplicate_accounting = "first_occurrence"
///
/// [api]
/// host = "127.0.0.1"
/// port = 8545
///
/// [[genesis]]
/// tx_id = "0x0000000000000000000000000000000000000000000000000000000000000001"
/// output_index = 0
/// amount = 50.0
/// recipient = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub genesis: Vec<GenesisUtxo>,
}

/// How input amounts are accumulated when one UTXO is referenced more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAccounting {
    /// Only the occurrence that actually consumed the UTXO from the temp pool counts
    #[default]
    FirstOccurrence,
    /// Every occurrence present in the real pool counts, duplicates included.
    /// Kept for compatibility with transactions judged by the older rule.
    EveryOccurrence,
}

/// Transaction validation configuration
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub duplicate_accounting: DuplicateAccounting,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 8545)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// An unspent output seeded into the pool at startup
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisUtxo {
    pub tx_id: H256,
    pub output_index: u32,
    pub amount: f64,
    pub recipient: Address,
}

impl GenesisUtxo {
    pub fn to_entry(&self) -> (UtxoId, Utxo) {
        (
            UtxoId::new(self.tx_id, self.output_index),
            Utxo {
                amount: self.amount,
                recipient: self.recipient,
            },
        )
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
