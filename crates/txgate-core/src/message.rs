//! The message model: envelopes, headers, proposals and transactions.
//!
//! Every value here is an immutable snapshot decoded from untrusted bytes.
//! Fields a sender may leave out are `Option`s; "absent" is always a
//! representable state, distinct from "present but empty".

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator declaring how a payload is to be interpreted.
///
/// Carried on the wire as an integer. Codes this node does not process
/// decode to [`HeaderType::Unsupported`], which keeps the original code so
/// it re-encodes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderType {
    /// Configuration transaction or proposal.
    Config,
    /// Proposed configuration delta.
    ConfigUpdate,
    /// Chaincode invocation proposal or transaction.
    EndorserTransaction,
    /// Any other code. Never holds a code of the named variants; build it
    /// with [`HeaderType::from_code`] or pass it through
    /// [`HeaderType::normalized`].
    Unsupported(i32),
}

impl HeaderType {
    pub const CONFIG_CODE: i32 = 1;
    pub const CONFIG_UPDATE_CODE: i32 = 2;
    pub const ENDORSER_TRANSACTION_CODE: i32 = 3;

    /// Convert to the wire code.
    pub fn code(self) -> i32 {
        match self {
            Self::Config => Self::CONFIG_CODE,
            Self::ConfigUpdate => Self::CONFIG_UPDATE_CODE,
            Self::EndorserTransaction => Self::ENDORSER_TRANSACTION_CODE,
            Self::Unsupported(code) => code,
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::CONFIG_CODE => Self::Config,
            Self::CONFIG_UPDATE_CODE => Self::ConfigUpdate,
            Self::ENDORSER_TRANSACTION_CODE => Self::EndorserTransaction,
            other => Self::Unsupported(other),
        }
    }

    /// Map an `Unsupported` value that carries a known code to its named
    /// variant.
    pub fn normalized(self) -> Self {
        Self::from_code(self.code())
    }
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("CONFIG"),
            Self::ConfigUpdate => f.write_str("CONFIG_UPDATE"),
            Self::EndorserTransaction => f.write_str("ENDORSER_TRANSACTION"),
            Self::Unsupported(code) => write!(f, "UNSUPPORTED({})", code),
        }
    }
}

/// Channel-scoped half of a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    /// Declared payload type.
    pub header_type: HeaderType,

    /// Message format version.
    pub version: i32,

    /// Sender-claimed creation time (Unix milliseconds). Untrusted.
    pub timestamp: i64,

    /// Channel the message is addressed to.
    pub channel_id: String,

    /// Declared transaction identifier (lowercase hex).
    pub tx_id: String,

    /// Protocol generation. Currently always 0.
    pub epoch: u64,
}

/// Signer-scoped half of a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeader {
    /// Serialized identity of the signer.
    pub creator: Bytes,

    /// Per-message random value.
    pub nonce: Bytes,
}

/// A channel header paired with a signature header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub channel_header: Option<ChannelHeader>,
    pub signature_header: Option<SignatureHeader>,
}

impl Header {
    /// Build a header with both halves present.
    pub fn new(channel_header: ChannelHeader, signature_header: SignatureHeader) -> Self {
        Self {
            channel_header: Some(channel_header),
            signature_header: Some(signature_header),
        }
    }
}

/// Header plus type-dependent data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub header: Option<Header>,

    /// Interpreted according to `header.channel_header.header_type`.
    pub data: Bytes,
}

/// Outermost signed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Canonical bytes of a [`Payload`].
    pub payload: Bytes,

    /// Creator's signature over `payload`.
    pub signature: Bytes,
}

/// A proposal body, as signed by its submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Canonical bytes of a [`Header`].
    pub header: Bytes,

    /// Chaincode proposal payload (the invocation input).
    pub payload: Bytes,

    /// Canonical bytes of a type-dependent header extension.
    pub extension: Bytes,
}

/// A proposal plus its submitter's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedProposal {
    /// Canonical bytes of a [`Proposal`].
    pub proposal_bytes: Bytes,

    /// Creator's signature over `proposal_bytes`.
    pub signature: Bytes,
}

/// Names a chaincode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeId {
    pub name: String,
    pub version: String,
    pub path: String,
}

impl ChaincodeId {
    /// A chaincode id with only a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path: String::new(),
        }
    }
}

impl fmt::Display for ChaincodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Header extension of chaincode proposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeHeaderExtension {
    pub chaincode_id: Option<ChaincodeId>,

    /// Visibility policy for the proposal payload. Only full visibility
    /// (absent) is supported.
    pub payload_visibility: Option<Bytes>,
}

/// A committed transaction body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub actions: Vec<TransactionAction>,
}

/// One endorsed action inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAction {
    /// Canonical bytes of the proposal's [`SignatureHeader`].
    pub header: Bytes,

    /// Canonical bytes of a [`ChaincodeActionPayload`].
    pub payload: Bytes,
}

/// The endorsement result for one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeActionPayload {
    /// The proposal payload, exactly as it was endorsed.
    pub chaincode_proposal_payload: Bytes,

    pub action: ChaincodeEndorsedAction,
}

/// A proposal response and the endorsements over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEndorsedAction {
    /// Canonical bytes of a [`ProposalResponsePayload`].
    pub proposal_response_payload: Bytes,

    pub endorsements: Vec<Endorsement>,
}

/// A peer's signature over a proposal response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
    /// Serialized identity of the endorser.
    pub endorser: Bytes,

    /// Signature over `proposal_response_payload || endorser`.
    pub signature: Bytes,
}

/// What an endorser committed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResponsePayload {
    /// Proposal hash computed at endorsement time.
    pub proposal_hash: Bytes,

    /// Opaque simulation result.
    pub extension: Bytes,
}
