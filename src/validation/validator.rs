use super::CanonicalPayload;
use crate::config::{DuplicateAccounting, ValidationConfig};
use crate::signature::{EcdsaVerifier, SignatureVerifier};
use crate::utxo::{UtxoCache, UtxoPool};
use crate::{
    Transaction, TransactionInput, Utxo, ValidationError, ValidationErrorKind, ValidationResult,
};
use tracing::{debug, warn};

/// Validates transactions against the shared UTXO set
///
/// Holds no state between calls besides its collaborators. Each call works on
/// its own snapshot of the set and never writes to the cache.
pub struct Validator<V = EcdsaVerifier> {
    utxo_cache: UtxoCache,
    verifier: V,
    config: ValidationConfig,
}

impl Validator<EcdsaVerifier> {
    pub fn new(utxo_cache: UtxoCache, config: ValidationConfig) -> Self {
        Self::with_verifier(utxo_cache, EcdsaVerifier, config)
    }
}

impl<V: SignatureVerifier> Validator<V> {
    pub fn with_verifier(utxo_cache: UtxoCache, verifier: V, config: ValidationConfig) -> Self {
        Self {
            utxo_cache,
            verifier,
            config,
        }
    }

    /// Validate a transaction against a consistent snapshot of the UTXO set
    pub async fn validate_transaction(&self, tx: &Transaction) -> ValidationResult {
        let snapshot = self.utxo_cache.snapshot().await;
        validate_against(&snapshot, &self.verifier, tx, &self.config)
    }
}

/// Run every check on `tx` and collect all failures
///
/// `pool` is only read. Spends are simulated on a clone of it, which is what
/// detects an input referencing a UTXO an earlier input already consumed.
pub fn validate_against<P, V>(
    pool: &P,
    verifier: &V,
    tx: &Transaction,
    config: &ValidationConfig,
) -> ValidationResult
where
    P: UtxoPool,
    V: SignatureVerifier + ?Sized,
{
    debug!(
        "Validating transaction {:?} ({} inputs, {} outputs)",
        tx.id,
        tx.inputs.len(),
        tx.outputs.len()
    );

    let mut temp_pool = pool.clone();
    let payload = CanonicalPayload::build(tx);
    // `None` once a running total is no longer exactly representable.
    let mut total_inputs = Some(0.0_f64);
    let mut total_outputs = Some(0.0_f64);
    let mut errors = Vec::new();

    for (index, input) in tx.inputs.iter().enumerate() {
        // Nothing else can be checked without the referenced output.
        let Some(utxo) = pool.get_utxo(&input.utxo_id) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UtxoNotFound,
                format!("input {}: UTXO {} not found", index, input.utxo_id),
            ));
            continue;
        };

        let consumed = temp_pool.remove_utxo(&input.utxo_id);
        if !consumed {
            errors.push(ValidationError::new(
                ValidationErrorKind::DoubleSpending,
                format!(
                    "input {}: UTXO {} is already spent by an earlier input",
                    index, input.utxo_id
                ),
            ));
        }

        if !is_positive_finite(utxo.amount) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeAmount,
                format!(
                    "input {}: UTXO {} has invalid amount {}",
                    index, input.utxo_id, utxo.amount
                ),
            ));
        } else if consumed || config.duplicate_accounting == DuplicateAccounting::EveryOccurrence {
            total_inputs = total_inputs.and_then(|total| checked_add(total, utxo.amount));
        }

        let checked = match &payload {
            Ok(payload) => verify_signature(verifier, payload, input, utxo),
            Err(e) => Err(format!("signing payload unavailable: {}", e)),
        };
        match checked {
            Ok(true) => {}
            Ok(false) => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSignature,
                format!(
                    "input {}: signature does not match recipient {:?}",
                    index, utxo.recipient
                ),
            )),
            Err(reason) => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSignature,
                format!("input {}: signature could not be verified: {}", index, reason),
            )),
        }
    }

    for (index, output) in tx.outputs.iter().enumerate() {
        if !is_positive_finite(output.amount) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeAmount,
                format!("output {}: invalid amount {}", index, output.amount),
            ));
        } else {
            total_outputs = total_outputs.and_then(|total| checked_add(total, output.amount));
        }
    }

    match (total_inputs, total_outputs) {
        (Some(inputs), Some(outputs)) if inputs == outputs => {}
        (Some(inputs), Some(outputs)) => errors.push(ValidationError::new(
            ValidationErrorKind::AmountMismatch,
            format!("inputs total {} but outputs total {}", inputs, outputs),
        )),
        (inputs, outputs) => errors.push(ValidationError::new(
            ValidationErrorKind::AmountMismatch,
            format!(
                "totals cannot be compared exactly: inputs {}, outputs {}",
                describe_total(inputs),
                describe_total(outputs)
            ),
        )),
    }

    let result = ValidationResult::from_errors(errors);
    debug!(
        "Transaction {:?} validated: valid={}, errors={}",
        tx.id,
        result.valid,
        result.errors.len()
    );
    result
}

/// Verifier faults come back as `Err` carrying the reason
fn verify_signature<V>(
    verifier: &V,
    payload: &CanonicalPayload,
    input: &TransactionInput,
    utxo: &Utxo,
) -> Result<bool, String>
where
    V: SignatureVerifier + ?Sized,
{
    verifier
        .verify(payload.as_bytes(), &input.signature, &utxo.recipient)
        .map_err(|e| {
            warn!("Signature verifier fault for UTXO {}: {}", input.utxo_id, e);
            e.to_string()
        })
}

fn is_positive_finite(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// Add two amounts, or `None` if the sum overflows or had to be rounded
///
/// The rounding error of `a + b` is recovered exactly with Knuth's two-sum.
pub(crate) fn checked_add(a: f64, b: f64) -> Option<f64> {
    let sum = a + b;
    if !sum.is_finite() {
        return None;
    }
    let b_part = sum - a;
    let a_part = sum - b_part;
    let error = (a - a_part) + (b - b_part);
    (error == 0.0).then_some(sum)
}

fn describe_total(total: Option<f64>) -> String {
    match total {
        Some(total) => total.to_string(),
        None => "inexact".to_string(),
    }
}
