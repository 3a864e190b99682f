use super::UtxoSnapshot;
use crate::{Transaction, Utxo, UtxoId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Failure to apply an accepted transaction to the shared set
#[derive(Debug, Error, PartialEq)]
pub enum ApplyError {
    #[error("input UTXO {0} is no longer unspent")]
    MissingInput(UtxoId),
    #[error("output UTXO {0} already exists")]
    OutputExists(UtxoId),
}

/// Shared UTXO set
///
/// Cloning the handle shares the underlying map. Readers get consistent
/// snapshots; writes happen only through `apply_transaction` and `insert`.
#[derive(Clone, Default)]
pub struct UtxoCache {
    utxos: Arc<RwLock<HashMap<UtxoId, Utxo>>>,
}

impl UtxoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_utxos(utxos: impl IntoIterator<Item = (UtxoId, Utxo)>) -> Self {
        Self {
            utxos: Arc::new(RwLock::new(utxos.into_iter().collect())),
        }
    }

    pub async fn insert(&self, id: UtxoId, utxo: Utxo) -> Option<Utxo> {
        let mut utxos = self.utxos.write().await;
        utxos.insert(id, utxo)
    }

    pub async fn get_utxo(&self, id: &UtxoId) -> Option<Utxo> {
        let utxos = self.utxos.read().await;
        utxos.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.utxos.read().await.len()
    }

    /// Copy the whole set under a single read lock
    pub async fn snapshot(&self) -> UtxoSnapshot {
        let utxos = self.utxos.read().await;
        UtxoSnapshot::from(utxos.clone())
    }

    /// Spend a validated transaction's inputs and create its outputs
    ///
    /// Everything is checked before anything is mutated, under one write lock,
    /// so a transaction that lost a race against a concurrent spend leaves the
    /// set untouched.
    pub async fn apply_transaction(&self, tx: &Transaction) -> Result<(), ApplyError> {
        let mut utxos = self.utxos.write().await;

        for input in &tx.inputs {
            if !utxos.contains_key(&input.utxo_id) {
                return Err(ApplyError::MissingInput(input.utxo_id));
            }
        }

        let created: Vec<(UtxoId, Utxo)> = tx
            .outputs
            .iter()
            .enumerate()
            .map(|(index, output)| (UtxoId::new(tx.id, index as u32), Utxo::from(output)))
            .collect();
        for (id, _) in &created {
            let spent_here = tx.inputs.iter().any(|input| input.utxo_id == *id);
            if utxos.contains_key(id) && !spent_here {
                return Err(ApplyError::OutputExists(*id));
            }
        }

        for input in &tx.inputs {
            utxos.remove(&input.utxo_id);
        }
        utxos.extend(created);

        debug!(
            "Applied transaction {:?}: spent {}, created {}",
            tx.id,
            tx.inputs.len(),
            tx.outputs.len()
        );
        Ok(())
    }
}
