//! Error types for the membership service.

use thiserror::Error;

/// Errors raised while resolving, validating or checking an identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MspError {
    /// The identity bytes are not a serialized identity.
    #[error("identity decoding failed: {0}")]
    Decode(#[from] txgate_core::CodecError),

    /// The identity belongs to a different membership service.
    #[error("identity belongs to msp {found}, expected {expected}")]
    ForeignMsp { expected: String, found: String },

    /// No service of this channel issues identities for the named msp.
    #[error("msp {0} is unknown on this channel")]
    UnknownMsp(String),

    /// The identity's key is not enrolled.
    #[error("identity {0} is not enrolled")]
    NotEnrolled(String),

    /// The identity's key has been revoked.
    #[error("identity {0} has been revoked")]
    Revoked(String),

    /// The signature is not well-formed for this identity's scheme.
    #[error("malformed signature of {len} bytes")]
    MalformedSignature { len: usize },

    /// The signature does not verify.
    #[error("signature verification failed")]
    BadSignature,
}

/// Result type for membership operations.
pub type Result<T> = std::result::Result<T, MspError>;
