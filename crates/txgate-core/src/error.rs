//! Error types for txgate core.

use thiserror::Error;

/// Errors produced while decoding a message from its canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("cbor decoding error: {0}")]
    Cbor(String),

    #[error("{message}: expected {expected}")]
    UnexpectedType {
        message: &'static str,
        expected: &'static str,
    },

    #[error("{message}: missing field {field}")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },

    #[error("{message}: unknown field key {key}")]
    UnknownField { message: &'static str, key: u64 },

    #[error("{message}: field {field} out of range")]
    OutOfRange {
        message: &'static str,
        field: &'static str,
    },

    #[error("{message}: bytes are not in canonical form")]
    NonCanonical { message: &'static str },
}

/// Errors produced by the client and endorser side builders.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("proposal header could not be decoded: {0}")]
    Header(#[from] CodecError),

    #[error("proposal header is missing its {0}")]
    IncompleteHeader(&'static str),

    #[error("at least one endorsement is required")]
    NoEndorsements,

    #[error("endorsement {index} carries a different proposal response payload")]
    ResponseMismatch { index: usize },
}
