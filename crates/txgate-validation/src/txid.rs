//! Transaction identifier check.

use txgate_core::TxId;

use crate::error::{Result, ValidationError};

/// Check that `declared` is the identifier derived from `nonce` and
/// `creator`, and return the derived [`TxId`].
pub fn check_tx_id(declared: &str, nonce: &[u8], creator: &[u8]) -> Result<TxId> {
    let expected = TxId::derive(nonce, creator);
    if !expected.matches(declared) {
        return Err(ValidationError::TxIdMismatch {
            declared: declared.to_string(),
            expected,
        });
    }
    Ok(expected)
}
