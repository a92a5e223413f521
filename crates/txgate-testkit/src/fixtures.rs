//! Test fixtures and helpers.
//!
//! A [`TestNetwork`] is one channel with two organizations: a client, two
//! endorsing peers, plus an unenrolled outsider and a revoked member.
//! Key seeds are fixed, so every run sees the same identities.

use std::sync::Arc;

use bytes::Bytes;
use txgate_core::{
    assemble_transaction, endorse, ChaincodeId, EndorsedProposal, Envelope, HeaderType,
    Keypair, Payload, Proposal, ProposalBuilder, SignedProposal,
};
use txgate_msp::{ChannelRegistry, LocalMsp, MspSet, SigningIdentity};

/// Channel every fixture message is addressed to.
pub const CHANNEL_ID: &str = "trade";

/// Chaincode every fixture proposal targets.
pub const CHAINCODE: &str = "asset-transfer";

/// Fixed timestamp for fixture headers.
pub const TIMESTAMP: i64 = 1736870400000;

fn identity(msp_id: &str, seed: u8) -> SigningIdentity {
    SigningIdentity::new(msp_id, Keypair::from_seed(&[seed; 32]))
}

/// A channel with enrolled, unenrolled and revoked identities.
pub struct TestNetwork {
    pub client: SigningIdentity,
    pub endorsers: Vec<SigningIdentity>,
    pub outsider: SigningIdentity,
    pub revoked: SigningIdentity,
    registry: Arc<ChannelRegistry>,
}

impl TestNetwork {
    pub fn new() -> Self {
        let client = identity("Org1MSP", 0x01);
        let peer0 = identity("Org1MSP", 0x02);
        let peer1 = identity("Org2MSP", 0x03);
        let outsider = identity("Org1MSP", 0x04);
        let revoked = identity("Org2MSP", 0x05);

        let org1 = LocalMsp::builder("Org1MSP")
            .enroll(client.public_key())
            .enroll(peer0.public_key())
            .build();
        let org2 = LocalMsp::builder("Org2MSP")
            .enroll(peer1.public_key())
            .enroll(revoked.public_key())
            .revoke(revoked.public_key())
            .build();

        let registry = ChannelRegistry::builder()
            .channel(CHANNEL_ID, MspSet::new().with(org1).with(org2))
            .build();

        Self {
            client,
            endorsers: vec![peer0, peer1],
            outsider,
            revoked,
            registry: Arc::new(registry),
        }
    }

    /// The channel registry resolving this network's identities.
    pub fn registry(&self) -> Arc<ChannelRegistry> {
        Arc::clone(&self.registry)
    }

    /// A proposal builder for the client, on [`CHANNEL_ID`].
    pub fn proposal_builder(&self) -> ProposalBuilder {
        self.proposal_builder_for(&self.client)
    }

    /// A proposal builder for an arbitrary creator.
    pub fn proposal_builder_for(&self, creator: &SigningIdentity) -> ProposalBuilder {
        ProposalBuilder::new(
            CHANNEL_ID,
            ChaincodeId::new(CHAINCODE, "1.0"),
            creator.serialize(),
        )
        .timestamp(TIMESTAMP)
    }

    /// A well-formed endorser-transaction proposal from the client.
    pub fn proposal(&self, payload: &[u8]) -> Proposal {
        self.proposal_builder().payload(payload.to_vec()).build()
    }

    /// A proposal of the given type from the client.
    pub fn proposal_of_type(&self, header_type: HeaderType, payload: &[u8]) -> Proposal {
        self.proposal_builder()
            .header_type(header_type)
            .payload(payload.to_vec())
            .build()
    }

    /// Sign a proposal as the client.
    pub fn sign_proposal(&self, proposal: &Proposal) -> SignedProposal {
        proposal.sign(self.client.keypair())
    }

    /// Every endorser's answer to a proposal.
    pub fn endorse(&self, proposal: &Proposal) -> Vec<EndorsedProposal> {
        self.endorsers
            .iter()
            .map(|peer| endorse(proposal, b"simulated".to_vec(), peer.serialize(), peer.keypair()))
            .collect()
    }

    /// The transaction payload assembled from a fully endorsed proposal.
    pub fn endorsed_payload(&self, proposal: &Proposal) -> Payload {
        assemble_transaction(proposal, &self.endorse(proposal))
            .expect("fixture proposals always assemble")
    }

    /// Sign a payload as the client.
    pub fn sign_payload(&self, payload: &Payload) -> Envelope {
        payload.sign(self.client.keypair())
    }

    /// Propose, endorse, assemble and sign in one step.
    pub fn transaction_envelope(&self, payload: &[u8]) -> Envelope {
        let proposal = self.proposal(payload);
        self.sign_payload(&self.endorsed_payload(&proposal))
    }

    /// A signed CONFIG envelope carrying `data`.
    pub fn config_envelope(&self, data: &[u8]) -> Envelope {
        let proposal = self.proposal_of_type(HeaderType::Config, b"");
        let payload = Payload {
            header: Some(proposal.decode_header().expect("fixture headers decode")),
            data: Bytes::copy_from_slice(data),
        };
        self.sign_payload(&payload)
    }
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txgate_core::{decode, Transaction, TxId};
    use txgate_msp::IdentityProvider;

    #[test]
    fn test_network_identities_resolve() {
        let net = TestNetwork::new();
        let deserializer = net.registry().deserializer(CHANNEL_ID).unwrap();

        for member in std::iter::once(&net.client).chain(&net.endorsers) {
            let identity = deserializer.deserialize_identity(&member.serialize()).unwrap();
            identity.validate().unwrap();
        }

        let outsider = deserializer.deserialize_identity(&net.outsider.serialize()).unwrap();
        assert!(outsider.validate().is_err());
        let revoked = deserializer.deserialize_identity(&net.revoked.serialize()).unwrap();
        assert!(revoked.validate().is_err());
    }

    #[test]
    fn test_fixture_proposal_tx_id() {
        let net = TestNetwork::new();
        let header = net.proposal(b"move").decode_header().unwrap();
        let ch = header.channel_header.unwrap();
        let sh = header.signature_header.unwrap();
        assert_eq!(ch.tx_id, TxId::derive(&sh.nonce, &sh.creator).to_hex());
        assert_eq!(ch.channel_id, CHANNEL_ID);
    }

    #[test]
    fn test_endorsed_payload_carries_all_endorsements() {
        let net = TestNetwork::new();
        let payload = net.endorsed_payload(&net.proposal(b"move"));
        let tx: Transaction = decode(&payload.data).unwrap();
        let action: txgate_core::ChaincodeActionPayload = decode(&tx.actions[0].payload).unwrap();
        assert_eq!(action.action.endorsements.len(), net.endorsers.len());
        assert_eq!(action.chaincode_proposal_payload.as_ref(), b"move");
    }
}
