//! The validation context handed to endorsement and commit logic.

use std::fmt;
use std::sync::Arc;

use tracing::field::Empty;
use txgate_core::{Envelope, Payload, SignedProposal};
use txgate_msp::IdentityProvider;

use crate::config::{AcceptAllConfig, ConfigTxProcessor};
use crate::envelope::validate_envelope;
use crate::error::Result;
use crate::proposal::{validate_proposal, ValidatedProposal};

/// Optional collaborators of a [`Validator`].
#[derive(Clone)]
pub struct ValidatorOptions {
    /// Semantic check for CONFIG envelopes.
    pub config_processor: Arc<dyn ConfigTxProcessor>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            config_processor: Arc::new(AcceptAllConfig),
        }
    }
}

impl fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorOptions").finish_non_exhaustive()
    }
}

/// Validates proposals and envelopes against a set of channel identities.
///
/// Holds no mutable state, so one validator can be cloned into any number
/// of worker threads.
#[derive(Clone)]
pub struct Validator {
    identities: Arc<dyn IdentityProvider>,
    config_processor: Arc<dyn ConfigTxProcessor>,
}

impl Validator {
    /// Create a validator with default options.
    pub fn new(identities: Arc<dyn IdentityProvider>) -> Self {
        Self::with_options(identities, ValidatorOptions::default())
    }

    pub fn with_options(identities: Arc<dyn IdentityProvider>, options: ValidatorOptions) -> Self {
        Self {
            identities,
            config_processor: options.config_processor,
        }
    }

    /// Replace the config-transaction processor.
    pub fn with_config_processor(mut self, processor: Arc<dyn ConfigTxProcessor>) -> Self {
        self.config_processor = processor;
        self
    }

    /// Validate a signed proposal before endorsement.
    pub fn validate_proposal(&self, signed: &SignedProposal) -> Result<ValidatedProposal> {
        let span = tracing::debug_span!("validate_proposal", channel = Empty, tx_id = Empty);
        let _guard = span.enter();
        validate_proposal(self.identities.as_ref(), signed)
    }

    /// Validate an envelope before commit.
    pub fn validate_envelope(&self, envelope: &Envelope) -> Result<Payload> {
        let span = tracing::debug_span!("validate_envelope", channel = Empty, tx_id = Empty);
        let _guard = span.enter();
        validate_envelope(
            self.identities.as_ref(),
            self.config_processor.as_ref(),
            envelope,
        )
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use txgate_core::Header;
    use txgate_testkit::TestNetwork;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_validator_runs_both_paths() {
        init_tracing();
        let net = TestNetwork::new();
        let validator = Validator::new(net.registry());

        let proposal = net.proposal(b"transfer 10");
        assert!(validator.validate_proposal(&net.sign_proposal(&proposal)).is_ok());

        let envelope = net.sign_payload(&net.endorsed_payload(&proposal));
        assert!(validator.validate_envelope(&envelope).is_ok());
    }

    #[test]
    fn test_options_config_processor() {
        let net = TestNetwork::new();
        let reject = |_: &[u8], _: &Header| -> std::result::Result<(), String> {
            Err("frozen".to_string())
        };
        let options = ValidatorOptions {
            config_processor: Arc::new(reject),
        };
        let validator = Validator::with_options(net.registry(), options);

        assert_eq!(
            validator.validate_envelope(&net.config_envelope(b"policy")),
            Err(ValidationError::ConfigRejected("frozen".into()))
        );
        let permissive = validator.with_config_processor(Arc::new(AcceptAllConfig));
        assert!(permissive
            .validate_envelope(&net.config_envelope(b"policy"))
            .is_ok());
    }

    #[test]
    fn test_validator_shared_across_threads() {
        let net = TestNetwork::new();
        let validator = Validator::new(net.registry());
        let envelopes: Vec<_> = (0..8)
            .map(|i| net.transaction_envelope(format!("transfer {}", i).as_bytes()))
            .collect();

        std::thread::scope(|s| {
            let handles: Vec<_> = envelopes
                .iter()
                .map(|envelope| {
                    let validator = validator.clone();
                    s.spawn(move || validator.validate_envelope(envelope))
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap().is_ok());
            }
        });
    }
}
