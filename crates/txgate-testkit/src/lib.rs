//! # txgate Testkit
//!
//! Testing utilities for txgate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a [`TestNetwork`] with enrolled, unenrolled and revoked
//!   identities and one-call builders for valid proposals and transactions
//! - **Tampering**: helpers that change one field of an endorsed message
//!   while keeping it well-formed
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use txgate_testkit::TestNetwork;
//!
//! let net = TestNetwork::new();
//! let envelope = net.transaction_envelope(b"transfer 10");
//! assert!(!envelope.signature.is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use txgate_testkit::generators::{proposal_from_params, ProposalParams};
//!
//! proptest! {
//!     #[test]
//!     fn endorsed_proposals_validate(params: ProposalParams) {
//!         let net = TestNetwork::new();
//!         let proposal = proposal_from_params(&net, &params);
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod tamper;

pub use fixtures::{TestNetwork, CHAINCODE, CHANNEL_ID, TIMESTAMP};
pub use generators::{proposal_from_params, ProposalParams};
