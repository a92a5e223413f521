//! # txgate Validation
//!
//! The checks a node runs on untrusted proposals and transactions.
//!
//! ## Overview
//!
//! Two entry points share the same building blocks:
//!
//! - [`validate_proposal`]: a [`SignedProposal`](txgate_core::SignedProposal)
//!   before endorsement
//! - [`validate_envelope`]: an [`Envelope`](txgate_core::Envelope) before
//!   commit, including per-action proposal hash checks for endorser
//!   transactions
//!
//! Both decode the header, check its structure, verify the creator's
//! signature against the channel's identities and check the declared TxId.
//! Every check fails fast with its own [`ValidationError`] kind.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use txgate_validation::Validator;
//!
//! let validator = Validator::new(registry);
//! let payload = validator.validate_envelope(&envelope)?;
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod header;
pub mod proposal;
pub mod signature;
pub mod transaction;
pub mod txid;
pub mod validator;

pub use config::{AcceptAllConfig, ConfigTxProcessor};
pub use envelope::validate_envelope;
pub use error::{Result, ValidationError};
pub use header::{validate_channel_header, validate_header, validate_signature_header, CURRENT_EPOCH};
pub use proposal::{validate_proposal, ValidatedProposal};
pub use signature::verify_creator;
pub use transaction::validate_endorser_transaction;
pub use txid::check_tx_id;
pub use validator::{Validator, ValidatorOptions};
