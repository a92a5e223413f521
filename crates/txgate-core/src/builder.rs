//! Builders for the client and endorser side of the flow.
//!
//! A client builds and signs a [`Proposal`]; endorsers answer it with a
//! [`ProposalResponsePayload`] committing to the proposal hash; the client
//! then assembles the endorsements into a transaction [`Payload`] and
//! signs it into an [`Envelope`].

use bytes::Bytes;

use crate::canonical::{decode, encode};
use crate::crypto::{new_nonce, proposal_hash, Keypair};
use crate::error::BuildError;
use crate::message::{
    ChaincodeActionPayload, ChaincodeEndorsedAction, ChaincodeHeaderExtension, ChaincodeId,
    ChannelHeader, Endorsement, Envelope, Header, HeaderType, Payload, Proposal,
    ProposalResponsePayload, SignatureHeader, SignedProposal, Transaction, TransactionAction,
};
use crate::types::TxId;

/// The current channel header version.
pub const CHANNEL_HEADER_VERSION: i32 = 0;

/// Builder for chaincode proposals.
pub struct ProposalBuilder {
    channel_id: String,
    header_type: HeaderType,
    chaincode_id: ChaincodeId,
    creator: Bytes,
    nonce: Option<Bytes>,
    payload: Bytes,
    epoch: u64,
    timestamp: i64,
    payload_visibility: Option<Bytes>,
}

impl ProposalBuilder {
    /// Start building an endorser-transaction proposal.
    pub fn new(channel_id: impl Into<String>, chaincode_id: ChaincodeId, creator: impl Into<Bytes>) -> Self {
        Self {
            channel_id: channel_id.into(),
            header_type: HeaderType::EndorserTransaction,
            chaincode_id,
            creator: creator.into(),
            nonce: None,
            payload: Bytes::new(),
            epoch: 0,
            timestamp: 0,
            payload_visibility: None,
        }
    }

    /// Set the header type.
    pub fn header_type(mut self, header_type: HeaderType) -> Self {
        self.header_type = header_type.normalized();
        self
    }

    /// Use a fixed nonce instead of a random one.
    pub fn nonce(mut self, nonce: impl Into<Bytes>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Set the chaincode proposal payload.
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Set the epoch.
    pub fn epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Set the timestamp.
    pub fn timestamp(mut self, ts: i64) -> Self {
        self.timestamp = ts;
        self
    }

    /// Request a payload visibility mode.
    pub fn payload_visibility(mut self, visibility: impl Into<Bytes>) -> Self {
        self.payload_visibility = Some(visibility.into());
        self
    }

    /// Build the proposal, deriving its TxId from the nonce and creator.
    pub fn build(self) -> Proposal {
        let nonce = self.nonce.unwrap_or_else(|| new_nonce().into());
        let tx_id = TxId::derive(&nonce, &self.creator);

        let header = Header::new(
            ChannelHeader {
                header_type: self.header_type,
                version: CHANNEL_HEADER_VERSION,
                timestamp: self.timestamp,
                channel_id: self.channel_id,
                tx_id: tx_id.to_hex(),
                epoch: self.epoch,
            },
            SignatureHeader {
                creator: self.creator,
                nonce,
            },
        );

        let extension = ChaincodeHeaderExtension {
            chaincode_id: Some(self.chaincode_id),
            payload_visibility: self.payload_visibility,
        };

        Proposal {
            header: encode(&header).into(),
            payload: self.payload,
            extension: encode(&extension).into(),
        }
    }
}

impl Proposal {
    /// Decode the proposal's header.
    pub fn decode_header(&self) -> Result<Header, crate::CodecError> {
        decode(&self.header)
    }

    /// Sign the canonical proposal bytes.
    pub fn sign(&self, keypair: &Keypair) -> SignedProposal {
        let proposal_bytes = encode(self);
        let signature = keypair.sign(&proposal_bytes);
        SignedProposal {
            proposal_bytes: proposal_bytes.into(),
            signature: Bytes::copy_from_slice(signature.as_bytes()),
        }
    }
}

impl Payload {
    /// Sign the canonical payload bytes into an envelope.
    pub fn sign(&self, keypair: &Keypair) -> Envelope {
        let payload = encode(self);
        let signature = keypair.sign(&payload);
        Envelope {
            payload: payload.into(),
            signature: Bytes::copy_from_slice(signature.as_bytes()),
        }
    }
}

/// One endorser's answer to a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndorsedProposal {
    /// Canonical bytes of the [`ProposalResponsePayload`].
    pub proposal_response_payload: Bytes,
    pub endorsement: Endorsement,
}

/// Endorse a proposal: commit to its hash and sign the response.
///
/// `endorser` is the endorser's serialized identity.
pub fn endorse(
    proposal: &Proposal,
    response: impl Into<Bytes>,
    endorser: impl Into<Bytes>,
    keypair: &Keypair,
) -> EndorsedProposal {
    let hash = proposal_hash(&proposal.header, &proposal.payload);
    let prp = ProposalResponsePayload {
        proposal_hash: Bytes::copy_from_slice(hash.as_bytes()),
        extension: response.into(),
    };
    let prp_bytes = Bytes::from(encode(&prp));
    let endorser = endorser.into();

    let mut message = prp_bytes.to_vec();
    message.extend_from_slice(&endorser);
    let signature = keypair.sign(&message);

    EndorsedProposal {
        proposal_response_payload: prp_bytes,
        endorsement: Endorsement {
            endorser,
            signature: Bytes::copy_from_slice(signature.as_bytes()),
        },
    }
}

/// Turn a proposal and its endorsements into a transaction action.
pub fn transaction_action(
    proposal: &Proposal,
    endorsed: &[EndorsedProposal],
) -> Result<TransactionAction, BuildError> {
    let first = endorsed.first().ok_or(BuildError::NoEndorsements)?;
    if let Some(index) = endorsed
        .iter()
        .position(|e| e.proposal_response_payload != first.proposal_response_payload)
    {
        return Err(BuildError::ResponseMismatch { index });
    }

    let header = proposal.decode_header()?;
    let signature_header = header
        .signature_header
        .ok_or(BuildError::IncompleteHeader("signature header"))?;

    let action_payload = ChaincodeActionPayload {
        chaincode_proposal_payload: proposal.payload.clone(),
        action: ChaincodeEndorsedAction {
            proposal_response_payload: first.proposal_response_payload.clone(),
            endorsements: endorsed.iter().map(|e| e.endorsement.clone()).collect(),
        },
    };

    Ok(TransactionAction {
        header: encode(&signature_header).into(),
        payload: encode(&action_payload).into(),
    })
}

/// Assemble an endorsed proposal into a transaction payload.
///
/// The payload reuses the proposal's header, so the transaction carries
/// the same channel header, TxId and creator as the proposal.
pub fn assemble_transaction(
    proposal: &Proposal,
    endorsed: &[EndorsedProposal],
) -> Result<Payload, BuildError> {
    let action = transaction_action(proposal, endorsed)?;

    let header = proposal.decode_header()?;
    if header.channel_header.is_none() {
        return Err(BuildError::IncompleteHeader("channel header"));
    }

    let tx = Transaction {
        actions: vec![action],
    };

    Ok(Payload {
        header: Some(header),
        data: encode(&tx).into(),
    })
}
