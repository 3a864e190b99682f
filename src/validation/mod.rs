//! Transaction Validation Module
//!
//! This module validates transactions against the UTXO set before admission.
//! Performs existence, double-spend, amount, signature and balance checks,
//! collecting every failure instead of stopping at the first.

mod payload;
mod validator;


pub use payload::{CanonicalPayload, FORMAT_VERSION};
pub use validator::{Validator, validate_against};
