//! Identity traits and the serialized identity format.
//!
//! The validation pipeline only sees these traits. An [`IdentityProvider`]
//! resolves a channel to its [`IdentityDeserializer`], which turns creator
//! bytes into an [`Identity`] that can be validated and can check
//! signatures.

use std::fmt;
use std::sync::Arc;

use txgate_core::canonical::{MapBuilder, MapReader, Value};
use txgate_core::{Canonical, CodecError, Ed25519PublicKey};

use crate::error::Result;

/// A resolved signer.
pub trait Identity: Send + Sync + fmt::Debug {
    /// Human-readable label, for logs only.
    fn identifier(&self) -> String;

    /// The membership service this identity belongs to.
    fn msp_id(&self) -> &str;

    /// Check that the identity is currently trusted.
    fn validate(&self) -> Result<()>;

    /// Verify `signature` over `message`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()>;
}

/// Turns serialized creator bytes into identities.
pub trait IdentityDeserializer: Send + Sync {
    fn deserialize_identity(&self, bytes: &[u8]) -> Result<Box<dyn Identity>>;
}

/// Resolves the identity deserializer of a channel.
///
/// Implementations must be safe to call from many threads at once and
/// should not block.
pub trait IdentityProvider: Send + Sync {
    fn deserializer(&self, channel_id: &str) -> Option<Arc<dyn IdentityDeserializer>>;
}

impl<P: IdentityProvider + ?Sized> IdentityProvider for Arc<P> {
    fn deserializer(&self, channel_id: &str) -> Option<Arc<dyn IdentityDeserializer>> {
        (**self).deserializer(channel_id)
    }
}

/// The on-wire form of an identity: the `creator` of every header.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SerializedIdentity {
    pub msp_id: String,
    pub public_key: Ed25519PublicKey,
}

impl SerializedIdentity {
    pub fn new(msp_id: impl Into<String>, public_key: Ed25519PublicKey) -> Self {
        Self {
            msp_id: msp_id.into(),
            public_key,
        }
    }

    /// Label of the form `msp_id:key-prefix`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.msp_id, &self.public_key.to_hex()[..16])
    }
}

impl fmt::Debug for SerializedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerializedIdentity({})", self.label())
    }
}

impl Canonical for SerializedIdentity {
    const MESSAGE: &'static str = "SerializedIdentity";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .text(0, &self.msp_id)
            .bytes(1, self.public_key.as_bytes())
            .build()
    }

    fn from_value(value: &Value) -> std::result::Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        let key = map.bytes(1, "public_key")?;
        let key: [u8; 32] = key.as_ref().try_into().map_err(|_| CodecError::OutOfRange {
            message: Self::MESSAGE,
            field: "public_key",
        })?;

        Ok(Self {
            msp_id: map.text(0, "msp_id")?,
            public_key: Ed25519PublicKey::from_bytes(key),
        })
    }
}
