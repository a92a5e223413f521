//! Creator resolution and signature verification.

use txgate_msp::{Identity, IdentityProvider};

use crate::error::{Result, ValidationError};

/// Verify that `creator` is a trusted member of `channel_id` and that it
/// signed `message`.
///
/// Checks run in a fixed order and each failure has its own kind:
/// empty inputs, unknown channel, undecodable identity, untrusted identity,
/// bad signature. Returns the verified identity.
pub fn verify_creator(
    identities: &dyn IdentityProvider,
    creator: &[u8],
    signature: &[u8],
    message: &[u8],
    channel_id: &str,
) -> Result<Box<dyn Identity>> {
    if creator.is_empty() {
        return Err(ValidationError::MissingInput("creator"));
    }
    if signature.is_empty() {
        return Err(ValidationError::MissingInput("signature"));
    }
    if message.is_empty() {
        return Err(ValidationError::MissingInput("signed message"));
    }

    let deserializer = identities
        .deserializer(channel_id)
        .ok_or_else(|| ValidationError::UnknownChannel(channel_id.to_string()))?;

    let identity = deserializer
        .deserialize_identity(creator)
        .map_err(ValidationError::InvalidIdentityEncoding)?;
    tracing::debug!(creator = %identity.identifier(), "resolved creator");

    identity
        .validate()
        .map_err(|source| ValidationError::UntrustedIdentity {
            identity: identity.identifier(),
            source,
        })?;

    identity
        .verify(message, signature)
        .map_err(|source| ValidationError::InvalidSignature {
            identity: identity.identifier(),
            source,
        })?;

    Ok(identity)
}
