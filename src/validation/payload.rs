//! Canonical signing payload
//!
//! Signers and verifiers must produce identical bytes for a transaction, so the
//! encoding is fixed here rather than derived from `Transaction`'s serde shape:
//! compact JSON, object keys in lexicographic order at every level (struct
//! fields below are declared in that order), hashes and addresses as lowercase
//! 0x-hex, amounts as shortest round-trip decimals with non-finite values as
//! `null`. Signatures are excluded. Changing any of this requires bumping
//! `FORMAT_VERSION`.

use crate::{Transaction, UtxoId};
use ethers::types::{Address, H256};
use ethers::utils::keccak256;
use serde::Serialize;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct PayloadRef<'a> {
    format: u32,
    id: &'a H256,
    inputs: Vec<InputRef<'a>>,
    outputs: Vec<OutputRef<'a>>,
    timestamp: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InputRef<'a> {
    owner: &'a Address,
    utxo_id: UtxoIdRef<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UtxoIdRef<'a> {
    output_index: u32,
    tx_id: &'a H256,
}

#[derive(Serialize)]
struct OutputRef<'a> {
    amount: f64,
    recipient: &'a Address,
}

impl<'a> From<&'a UtxoId> for UtxoIdRef<'a> {
    fn from(id: &'a UtxoId) -> Self {
        Self {
            output_index: id.output_index,
            tx_id: &id.tx_id,
        }
    }
}

/// Encoded message every input of a transaction signs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPayload {
    bytes: Vec<u8>,
}

impl CanonicalPayload {
    pub fn build(tx: &Transaction) -> Result<Self, serde_json::Error> {
        let payload = PayloadRef {
            format: FORMAT_VERSION,
            id: &tx.id,
            inputs: tx
                .inputs
                .iter()
                .map(|input| InputRef {
                    owner: &input.owner,
                    utxo_id: UtxoIdRef::from(&input.utxo_id),
                })
                .collect(),
            outputs: tx
                .outputs
                .iter()
                .map(|output| OutputRef {
                    amount: output.amount,
                    recipient: &output.recipient,
                })
                .collect(),
            timestamp: tx.timestamp,
        };

        Ok(Self {
            bytes: serde_json::to_vec(&payload)?,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Keccak-256 of the payload, the hash actually signed
    pub fn digest(&self) -> H256 {
        H256::from(keccak256(&self.bytes))
    }
}
