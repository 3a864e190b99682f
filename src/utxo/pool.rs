use crate::{Utxo, UtxoId};
use std::collections::HashMap;

/// Queryable, cloneable UTXO set
///
/// The validator looks entries up on the real set and removes them only from a
/// clone, so a clone must never share storage with its original.
pub trait UtxoPool: Clone {
    fn get_utxo(&self, id: &UtxoId) -> Option<&Utxo>;

    /// Returns true if the entry existed and was removed
    fn remove_utxo(&mut self, id: &UtxoId) -> bool;
}

/// In-memory UTXO set owned by a single caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtxoSnapshot {
    utxos: HashMap<UtxoId, Utxo>,
}

impl From<HashMap<UtxoId, Utxo>> for UtxoSnapshot {
    fn from(utxos: HashMap<UtxoId, Utxo>) -> Self {
        Self { utxos }
    }
}

impl FromIterator<(UtxoId, Utxo)> for UtxoSnapshot {
    fn from_iter<I: IntoIterator<Item = (UtxoId, Utxo)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}

impl UtxoPool for UtxoSnapshot {
    fn get_utxo(&self, id: &UtxoId) -> Option<&Utxo> {
        self.utxos.get(id)
    }

    fn remove_utxo(&mut self, id: &UtxoId) -> bool {
        self.utxos.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Address, H256};

    fn utxo(amount: f64) -> Utxo {
        Utxo {
            amount,
            recipient: Address::repeat_byte(0x11),
        }
    }

    #[test]
    fn test_remove_reports_whether_entry_existed() {
        let id = UtxoId::new(H256::repeat_byte(1), 0);
        let mut pool: UtxoSnapshot = [(id, utxo(10.0))].into_iter().collect();

        assert!(pool.remove_utxo(&id));
        assert!(!pool.remove_utxo(&id));
        assert!(pool.get_utxo(&id).is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let id = UtxoId::new(H256::repeat_byte(1), 0);
        let original: UtxoSnapshot = [(id, utxo(10.0))].into_iter().collect();

        let mut temp = original.clone();
        temp.remove_utxo(&id);

        assert!(temp.get_utxo(&id).is_none());
        assert_eq!(original.get_utxo(&id), Some(&utxo(10.0)));
    }
}
