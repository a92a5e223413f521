//! Error types for the validation pipeline.

use thiserror::Error;
use txgate_core::{Blake3Hash, CodecError, HeaderType, TxId};
use txgate_msp::MspError;

/// Why a proposal or transaction was rejected.
///
/// Every variant is terminal for the message under validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required input was empty.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] CodecError),

    #[error("malformed proposal: {0}")]
    MalformedProposal(#[source] CodecError),

    #[error("malformed transaction: {0}")]
    MalformedTransaction(#[source] CodecError),

    #[error("action {index}: malformed signature header: {source}")]
    MalformedActionHeader {
        index: usize,
        #[source]
        source: CodecError,
    },

    #[error("action {index}: malformed chaincode action payload: {source}")]
    MalformedActionPayload {
        index: usize,
        #[source]
        source: CodecError,
    },

    #[error("action {index}: malformed proposal response payload: {source}")]
    MalformedResponsePayload {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// A required header part is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid epoch {epoch}, expected 0")]
    InvalidEpoch { epoch: u64 },

    /// A signature header is missing its nonce or creator. `action` is set
    /// when the header belongs to a transaction action.
    #[error("invalid signature header{}: {defect}", action_suffix(.action))]
    InvalidSignatureHeader {
        defect: &'static str,
        action: Option<usize>,
    },

    /// The header type is not accepted where it appeared.
    #[error("unsupported header type {header_type} in {context}")]
    UnsupportedType {
        header_type: HeaderType,
        context: &'static str,
    },

    /// A payload visibility mode other than full visibility was requested.
    #[error("unsupported payload visibility")]
    UnsupportedVisibility,

    #[error("invalid header extension: {0}")]
    InvalidHeaderExtension(#[source] CodecError),

    /// No identity provider is registered for the channel.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("invalid identity encoding: {0}")]
    InvalidIdentityEncoding(#[source] MspError),

    #[error("untrusted identity {identity}: {source}")]
    UntrustedIdentity {
        identity: String,
        #[source]
        source: MspError,
    },

    #[error("invalid signature by {identity}: {source}")]
    InvalidSignature {
        identity: String,
        #[source]
        source: MspError,
    },

    #[error("declared tx id {declared} does not match derived {expected}")]
    TxIdMismatch { declared: String, expected: TxId },

    #[error("transaction has no actions")]
    NoActions,

    /// The proposal hash recomputed at validation time differs from the one
    /// recorded at endorsement. `recorded` is hex.
    #[error("action {index}: proposal hash mismatch: expected {expected}, recorded {recorded}")]
    ProposalHashMismatch {
        index: usize,
        expected: Blake3Hash,
        recorded: String,
    },

    /// The config-transaction processor refused the update.
    #[error("config transaction rejected: {0}")]
    ConfigRejected(String),
}

fn action_suffix(action: &Option<usize>) -> String {
    match action {
        Some(index) => format!(" in action {}", index),
        None => String::new(),
    }
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
