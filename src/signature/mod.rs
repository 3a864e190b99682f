//! Signature Module
//!
//! Both sides of the per-input signature contract:
//! - `SignatureVerifier` / `EcdsaVerifier`: checks an input signature against a UTXO recipient
//! - `sign_input` / `sign_transaction`: produces signatures the verifier accepts

mod signer;
mod verifier;

pub use signer::{SigningError, sign_input, sign_transaction};
pub use verifier::{EcdsaVerifier, SignatureVerifier, VerifierError};
