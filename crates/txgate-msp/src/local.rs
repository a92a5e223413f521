//! A local membership service backed by Ed25519 keys.
//!
//! Membership is an enrollment set plus a revocation list, fixed when the
//! service is built. Changing membership means building a new service, so
//! lookups never take locks.

use std::collections::HashSet;
use std::sync::Arc;

use txgate_core::{decode, encode, Ed25519PublicKey, Ed25519Signature, Keypair};

use crate::error::{MspError, Result};
use crate::identity::{Identity, IdentityDeserializer, SerializedIdentity};

#[derive(Debug, Default)]
struct Membership {
    enrolled: HashSet<Ed25519PublicKey>,
    revoked: HashSet<Ed25519PublicKey>,
}

/// One membership service provider.
#[derive(Debug, Clone)]
pub struct LocalMsp {
    msp_id: String,
    membership: Arc<Membership>,
}

impl LocalMsp {
    /// Start building a membership service.
    pub fn builder(msp_id: impl Into<String>) -> LocalMspBuilder {
        LocalMspBuilder {
            msp_id: msp_id.into(),
            membership: Membership::default(),
        }
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Whether a key is enrolled and not revoked.
    pub fn is_trusted(&self, key: &Ed25519PublicKey) -> bool {
        self.membership.enrolled.contains(key) && !self.membership.revoked.contains(key)
    }

    /// Resolve an already decoded identity against this service.
    pub(crate) fn resolve(&self, identity: SerializedIdentity) -> Result<Box<dyn Identity>> {
        if identity.msp_id != self.msp_id {
            return Err(MspError::ForeignMsp {
                expected: self.msp_id.clone(),
                found: identity.msp_id,
            });
        }

        Ok(Box::new(MspIdentity {
            identity,
            membership: Arc::clone(&self.membership),
        }))
    }
}

impl IdentityDeserializer for LocalMsp {
    fn deserialize_identity(&self, bytes: &[u8]) -> Result<Box<dyn Identity>> {
        let identity: SerializedIdentity = decode(bytes)?;
        self.resolve(identity)
    }
}

/// Builder for [`LocalMsp`].
pub struct LocalMspBuilder {
    msp_id: String,
    membership: Membership,
}

impl LocalMspBuilder {
    /// Enroll a member key.
    pub fn enroll(mut self, key: Ed25519PublicKey) -> Self {
        self.membership.enrolled.insert(key);
        self
    }

    /// Put a key on the revocation list.
    pub fn revoke(mut self, key: Ed25519PublicKey) -> Self {
        self.membership.revoked.insert(key);
        self
    }

    pub fn build(self) -> LocalMsp {
        LocalMsp {
            msp_id: self.msp_id,
            membership: Arc::new(self.membership),
        }
    }
}

#[derive(Debug)]
struct MspIdentity {
    identity: SerializedIdentity,
    membership: Arc<Membership>,
}

impl Identity for MspIdentity {
    fn identifier(&self) -> String {
        self.identity.label()
    }

    fn msp_id(&self) -> &str {
        &self.identity.msp_id
    }

    fn validate(&self) -> Result<()> {
        let key = &self.identity.public_key;
        if self.membership.revoked.contains(key) {
            return Err(MspError::Revoked(self.identity.label()));
        }
        if !self.membership.enrolled.contains(key) {
            return Err(MspError::NotEnrolled(self.identity.label()));
        }
        Ok(())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let signature = Ed25519Signature::from_slice(signature).ok_or(
            MspError::MalformedSignature {
                len: signature.len(),
            },
        )?;

        self.identity
            .public_key
            .verify(message, &signature)
            .map_err(|_| MspError::BadSignature)
    }
}

/// A keypair bound to a membership service: what a client or endorser
/// signs with.
#[derive(Debug, Clone)]
pub struct SigningIdentity {
    msp_id: String,
    keypair: Keypair,
}

impl SigningIdentity {
    pub fn new(msp_id: impl Into<String>, keypair: Keypair) -> Self {
        Self {
            msp_id: msp_id.into(),
            keypair,
        }
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// The serialized identity, used as `creator` or `endorser` bytes.
    pub fn serialize(&self) -> Vec<u8> {
        encode(&SerializedIdentity::new(
            self.msp_id.clone(),
            self.keypair.public_key(),
        ))
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.keypair.sign(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(seed: u8) -> SigningIdentity {
        SigningIdentity::new("Org1MSP", Keypair::from_seed(&[seed; 32]))
    }

    fn msp_with(members: &[&SigningIdentity]) -> LocalMspBuilder {
        members
            .iter()
            .fold(LocalMsp::builder("Org1MSP"), |b, m| b.enroll(m.public_key()))
    }

    #[test]
    fn test_enrolled_member_validates_and_verifies() {
        let alice = member(1);
        let msp = msp_with(&[&alice]).build();

        let identity = msp.deserialize_identity(&alice.serialize()).unwrap();
        identity.validate().unwrap();

        let sig = alice.sign(b"message");
        identity.verify(b"message", sig.as_bytes()).unwrap();
        assert_eq!(
            identity.verify(b"other", sig.as_bytes()),
            Err(MspError::BadSignature)
        );
        assert_eq!(identity.msp_id(), "Org1MSP");
    }

    #[test]
    fn test_unenrolled_member_fails_validation() {
        let msp = msp_with(&[&member(1)]).build();
        let stranger = member(2);

        let identity = msp.deserialize_identity(&stranger.serialize()).unwrap();
        assert!(matches!(identity.validate(), Err(MspError::NotEnrolled(_))));
    }

    #[test]
    fn test_revoked_member_fails_validation() {
        let alice = member(1);
        let msp = msp_with(&[&alice]).revoke(alice.public_key()).build();

        assert!(!msp.is_trusted(&alice.public_key()));
        let identity = msp.deserialize_identity(&alice.serialize()).unwrap();
        assert!(matches!(identity.validate(), Err(MspError::Revoked(_))));
    }

    #[test]
    fn test_foreign_msp_rejected() {
        let msp = LocalMsp::builder("Org1MSP").build();
        let other = SigningIdentity::new("Org2MSP", Keypair::from_seed(&[3; 32]));

        let err = msp.deserialize_identity(&other.serialize()).unwrap_err();
        assert!(matches!(err, MspError::ForeignMsp { .. }));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let msp = LocalMsp::builder("Org1MSP").build();
        let err = msp.deserialize_identity(b"not an identity").unwrap_err();
        assert!(matches!(err, MspError::Decode(_)));
    }

    #[test]
    fn test_short_signature_is_malformed() {
        let alice = member(1);
        let msp = msp_with(&[&alice]).build();
        let identity = msp.deserialize_identity(&alice.serialize()).unwrap();

        assert_eq!(
            identity.verify(b"message", &[0u8; 10]),
            Err(MspError::MalformedSignature { len: 10 })
        );
    }
}
