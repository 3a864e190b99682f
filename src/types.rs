use ethers::types::{Address, Bytes, H256};
use serde::{Deserialize, Serialize};

/// Identifies one unspent output: the transaction that produced it and its index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoId {
    pub tx_id: H256,
    pub output_index: u32,
}

impl UtxoId {
    pub fn new(tx_id: H256, output_index: u32) -> Self {
        Self { tx_id, output_index }
    }
}

impl std::fmt::Display for UtxoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{}", self.tx_id, self.output_index)
    }
}

/// Unspent output held by the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utxo {
    pub amount: f64,
    pub recipient: Address,
}

/// Transaction submitted for admission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: H256,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub timestamp: u64,
}

/// Claim on an existing UTXO
///
/// `owner` is the identifier the producer claims owns the UTXO. The signature is
/// checked against the recipient recorded in the pool, not against `owner`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub utxo_id: UtxoId,
    pub owner: Address,
    #[serde(default)]
    pub signature: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub amount: f64,
    pub recipient: Address,
}

impl From<&TransactionOutput> for Utxo {
    fn from(output: &TransactionOutput) -> Self {
        Utxo {
            amount: output.amount,
            recipient: output.recipient,
        }
    }
}

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    UtxoNotFound,
    DoubleSpending,
    NegativeAmount,
    InvalidSignature,
    AmountMismatch,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::UtxoNotFound => "UTXO_NOT_FOUND",
            ValidationErrorKind::DoubleSpending => "DOUBLE_SPENDING",
            ValidationErrorKind::NegativeAmount => "NEGATIVE_AMOUNT",
            ValidationErrorKind::InvalidSignature => "INVALID_SIGNATURE",
            ValidationErrorKind::AmountMismatch => "AMOUNT_MISMATCH",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure with a human-readable detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of validating one transaction
///
/// `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Error kinds in the order they were recorded
    pub fn kinds(&self) -> Vec<ValidationErrorKind> {
        self.errors.iter().map(|e| e.kind).collect()
    }
}

/// Soft confirmation sent to clients after admission is attempted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftConfirmation {
    pub tx_id: H256,
    pub status: ConfirmationStatus,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    Accepted,
    Rejected { reason: String, errors: Vec<ValidationError> },
}
