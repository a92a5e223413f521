//! # txgate
//!
//! Admission control for a permissioned ledger node: every proposal and
//! transaction is checked for structure, signer trust, TxId derivation and
//! endorsement integrity before it is endorsed or committed.
//!
//! ## Overview
//!
//! - **Proposals**: a signed request to invoke a chaincode, validated before
//!   endorsement
//! - **Transactions**: endorsed proposals assembled into an envelope,
//!   validated before commit, including the per-action proposal hash
//! - **Blocks**: many envelopes validated in parallel, with duplicate TxId
//!   detection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use txgate::msp::{ChannelRegistry, LocalMsp, SigningIdentity};
//! use txgate::{Gate, GateConfig, Keypair};
//!
//! async fn example(envelopes: Vec<txgate::Envelope>) {
//!     let org = SigningIdentity::new("Org1MSP", Keypair::generate());
//!     let msp = LocalMsp::builder("Org1MSP").enroll(org.public_key()).build();
//!     let registry = ChannelRegistry::builder().channel("trade", msp).build();
//!
//!     let gate = Gate::new(Arc::new(registry), GateConfig::default());
//!     for result in gate.validate_block(envelopes).await {
//!         match result {
//!             Ok(_payload) => { /* hand to commit */ }
//!             Err(e) => eprintln!("rejected: {}", e),
//!         }
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `txgate::core` - Message model, codec and primitives
//! - `txgate::msp` - Identity traits and membership services
//! - `txgate::validation` - The validation pipeline

pub mod error;
pub mod gate;

// Re-export component crates
pub use txgate_core as core;
pub use txgate_msp as msp;
pub use txgate_validation as validation;

// Re-export main types for convenience
pub use error::{GateError, Result};
pub use gate::{Gate, GateConfig};

// Re-export commonly used types
pub use txgate_core::{
    Envelope, Header, HeaderType, Keypair, Payload, Proposal, ProposalBuilder, SignedProposal,
    TxId,
};
pub use txgate_validation::{
    ConfigTxProcessor, ValidatedProposal, ValidationError, Validator, ValidatorOptions,
};
