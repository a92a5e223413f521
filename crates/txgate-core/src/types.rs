//! Strong type definitions for txgate.

use std::fmt;

/// A 32-byte transaction identifier, computed as Blake3(nonce || creator).
///
/// Channel headers carry the identifier as lowercase hex. Binding it to the
/// nonce and creator stops a submitter from picking an identifier of their
/// own, which would defeat duplicate detection keyed on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(pub [u8; 32]);

impl TxId {
    /// Derive the identifier for a nonce and serialized creator.
    pub fn derive(nonce: &[u8], creator: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(nonce);
        hasher.update(creator);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create a new TxId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string (the on-wire form).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    /// Whether a declared on-wire identifier names this TxId.
    pub fn matches(&self, declared: &str) -> bool {
        self.to_hex() == declared
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for TxId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for TxId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
