use ethers::types::{Address, H256, Signature, SignatureError};
use ethers::utils::keccak256;
use thiserror::Error;

/// Exceptional failure of the verification primitive
///
/// A signature that simply does not match is `Ok(false)`, not an error.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("malformed signature: {0}")]
    Malformed(#[source] SignatureError),
    #[error("signer recovery failed: {0}")]
    Recovery(#[source] SignatureError),
}

/// Predicate over a message, a signature and the expected signer
pub trait SignatureVerifier: Send + Sync {
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        public_key: &Address,
    ) -> Result<bool, VerifierError>;
}

/// secp256k1 recoverable-signature verifier
///
/// The message is the Keccak-256 digest of the payload. The signer is recovered
/// from the 65-byte signature and compared with the expected address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl SignatureVerifier for EcdsaVerifier {
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        public_key: &Address,
    ) -> Result<bool, VerifierError> {
        let signature = Signature::try_from(signature).map_err(VerifierError::Malformed)?;
        let digest = H256::from(keccak256(payload));

        match signature.verify(digest, *public_key) {
            Ok(()) => Ok(true),
            Err(SignatureError::VerificationError(_, _)) => Ok(false),
            Err(e) => Err(VerifierError::Recovery(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::signers::{LocalWallet, Signer};

    fn wallet() -> LocalWallet {
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            .parse()
            .unwrap()
    }

    fn sign(wallet: &LocalWallet, payload: &[u8]) -> Vec<u8> {
        wallet
            .sign_hash(H256::from(keccak256(payload)))
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_accepts_signature_from_expected_signer() {
        let wallet = wallet();
        let signature = sign(&wallet, b"payload");

        let verified = EcdsaVerifier
            .verify(b"payload", &signature, &wallet.address())
            .unwrap();

        assert!(verified);
    }

    #[test]
    fn test_rejects_other_signer_and_other_payload() {
        let wallet = wallet();
        let signature = sign(&wallet, b"payload");

        assert!(
            !EcdsaVerifier
                .verify(b"payload", &signature, &Address::repeat_byte(0x42))
                .unwrap()
        );
        assert!(
            !EcdsaVerifier
                .verify(b"other payload", &signature, &wallet.address())
                .unwrap()
        );
    }

    #[test]
    fn test_wrong_length_is_a_fault() {
        let result = EcdsaVerifier.verify(b"payload", &[0u8; 12], &Address::zero());

        assert!(matches!(result, Err(VerifierError::Malformed(_))));
    }
}
