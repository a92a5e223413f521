//! # txgate Core
//!
//! The message model of a permissioned ledger node: envelopes, headers,
//! proposals and endorsed transactions, together with their canonical
//! encoding and the hashing and signing primitives they rely on.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Envelope`] / [`Payload`] - The signed container of every submitted message
//! - [`Header`] - A [`ChannelHeader`] paired with a [`SignatureHeader`]
//! - [`SignedProposal`] / [`Proposal`] - A request to invoke a chaincode
//! - [`Transaction`] - Endorsed actions assembled for commit
//! - [`TxId`] - Transaction identifier derived from nonce and creator
//!
//! ## Canonicalization
//!
//! All messages are encoded using deterministic CBOR. See [`canonical`] module.

pub mod builder;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod message;
pub mod types;

pub use builder::{
    assemble_transaction, endorse, transaction_action, EndorsedProposal, ProposalBuilder,
};
pub use canonical::{decode, encode, Canonical};
pub use crypto::{
    new_nonce, proposal_hash, Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair,
    SignatureError,
};
pub use error::{BuildError, CodecError};
pub use message::{
    ChaincodeActionPayload, ChaincodeEndorsedAction, ChaincodeHeaderExtension, ChaincodeId,
    ChannelHeader, Endorsement, Envelope, Header, HeaderType, Payload, Proposal,
    ProposalResponsePayload, SignatureHeader, SignedProposal, Transaction, TransactionAction,
};
pub use types::TxId;
