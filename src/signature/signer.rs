use crate::Transaction;
use crate::validation::CanonicalPayload;
use ethers::signers::{LocalWallet, WalletError};
use ethers::types::{Bytes, H256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("transaction has no input at index {0}")]
    InputOutOfRange(usize),
    #[error("failed to encode signing payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("wallet failed to sign: {0}")]
    Wallet(#[from] WalletError),
    #[error("expected {expected} wallets, got {got}")]
    WalletCount { expected: usize, got: usize },
}

fn payload_digest(tx: &Transaction) -> Result<H256, SigningError> {
    Ok(CanonicalPayload::build(tx)?.digest())
}

/// Sign one input over the transaction's canonical payload
///
/// Signatures are not part of the payload, so inputs may be signed in any order.
pub fn sign_input(
    tx: &mut Transaction,
    index: usize,
    wallet: &LocalWallet,
) -> Result<(), SigningError> {
    if index >= tx.inputs.len() {
        return Err(SigningError::InputOutOfRange(index));
    }
    let signature = wallet.sign_hash(payload_digest(tx)?)?;
    tx.inputs[index].signature = Bytes::from(signature.to_vec());
    Ok(())
}

/// Sign every input, `wallets[i]` signing input `i`
pub fn sign_transaction(
    tx: &mut Transaction,
    wallets: &[&LocalWallet],
) -> Result<(), SigningError> {
    if wallets.len() != tx.inputs.len() {
        return Err(SigningError::WalletCount {
            expected: tx.inputs.len(),
            got: wallets.len(),
        });
    }

    let digest = payload_digest(tx)?;
    for (input, wallet) in tx.inputs.iter_mut().zip(wallets) {
        input.signature = Bytes::from(wallet.sign_hash(digest)?.to_vec());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{EcdsaVerifier, SignatureVerifier};
    use crate::{TransactionInput, TransactionOutput, UtxoId};
    use ethers::signers::Signer;
    use ethers::types::Address;

    fn wallet() -> LocalWallet {
        "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
            .parse()
            .unwrap()
    }

    fn unsigned(inputs: usize) -> Transaction {
        Transaction {
            id: H256::repeat_byte(7),
            inputs: (0..inputs)
                .map(|i| TransactionInput {
                    utxo_id: UtxoId::new(H256::repeat_byte(1), i as u32),
                    owner: Address::repeat_byte(0xaa),
                    signature: Bytes::default(),
                })
                .collect(),
            outputs: vec![TransactionOutput {
                amount: 3.0,
                recipient: Address::repeat_byte(0xbb),
            }],
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_signed_input_verifies_over_canonical_payload() {
        let wallet = wallet();
        let mut tx = unsigned(1);

        sign_input(&mut tx, 0, &wallet).unwrap();

        let payload = CanonicalPayload::build(&tx).unwrap();
        let verified = EcdsaVerifier
            .verify(payload.as_bytes(), &tx.inputs[0].signature, &wallet.address())
            .unwrap();
        assert!(verified);
        assert_eq!(tx.inputs[0].signature.len(), 65);
    }

    #[test]
    fn test_signing_one_input_does_not_invalidate_another() {
        let wallet = wallet();
        let mut tx = unsigned(2);

        sign_input(&mut tx, 0, &wallet).unwrap();
        let first = tx.inputs[0].signature.clone();
        sign_input(&mut tx, 1, &wallet).unwrap();

        let payload = CanonicalPayload::build(&tx).unwrap();
        assert!(
            EcdsaVerifier
                .verify(payload.as_bytes(), &first, &wallet.address())
                .unwrap()
        );
    }

    #[test]
    fn test_index_and_wallet_count_are_checked() {
        let wallet = wallet();
        let mut tx = unsigned(2);

        assert!(matches!(
            sign_input(&mut tx, 5, &wallet),
            Err(SigningError::InputOutOfRange(5))
        ));
        assert!(matches!(
            sign_transaction(&mut tx, &[&wallet]),
            Err(SigningError::WalletCount { expected: 2, got: 1 })
        ));
    }
}
