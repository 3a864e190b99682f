//! Pending transaction pool
//!
//! Accepted transactions are stored in a FIFO queue and drained in arrival order.

use crate::Transaction;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Pool for accepted transactions
///
/// Uses VecDeque for insertion at the back and removal from the front.
/// Protected by RwLock for concurrent access.
#[derive(Default)]
pub struct TransactionPool {
    transactions: RwLock<VecDeque<Transaction>>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted transaction to the back of the queue
    ///
    /// Called by the API server once the transaction has been validated and
    /// applied to the UTXO set.
    pub async fn add(&self, tx: Transaction) {
        let mut txs = self.transactions.write().await;
        txs.push_back(tx);
    }

    /// Remove and return up to `max` transactions from the front of the queue
    pub async fn get_pending(&self, max: usize) -> Vec<Transaction> {
        let mut txs = self.transactions.write().await;
        let len = txs.len();
        txs.drain(..max.min(len)).collect()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }
}
