//! Error types for the Gate.

use thiserror::Error;
use txgate_validation::ValidationError;

/// Errors that can occur during Gate operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The message failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The TxId was already admitted earlier in the same batch.
    #[error("duplicate tx id {tx_id}: first seen at index {first_index}")]
    DuplicateTxId { tx_id: String, first_index: usize },

    /// A validation worker panicked or was cancelled.
    #[error("validation worker failed: {0}")]
    Join(String),
}

/// Result type for Gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
