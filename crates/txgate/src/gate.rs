//! The Gate: admission of proposals and blocks of transactions.
//!
//! The Gate owns a [`Validator`] and runs it on behalf of endorsement and
//! commit logic. Single messages are validated inline; blocks are fanned
//! out over Tokio's blocking pool.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use txgate_core::{Envelope, Payload, SignedProposal};
use txgate_msp::IdentityProvider;
use txgate_validation::{ConfigTxProcessor, ValidatedProposal, Validator};

use crate::error::{GateError, Result};

/// Configuration for the Gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Maximum number of envelopes validated at once by `validate_block`.
    pub worker_threads: usize,
    /// Whether a TxId may appear only once per block.
    pub reject_duplicate_tx_ids: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            reject_duplicate_tx_ids: true,
        }
    }
}

/// The main Gate struct.
///
/// Provides:
/// - Proposal validation before endorsement
/// - Envelope validation before commit
/// - Parallel block validation with duplicate TxId detection
pub struct Gate {
    validator: Validator,
    config: GateConfig,
    /// Bounds concurrent block validation to `config.worker_threads`.
    permits: Arc<Semaphore>,
}

impl Gate {
    /// Create a gate over a set of channel identities.
    pub fn new(identities: Arc<dyn IdentityProvider>, config: GateConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.worker_threads.max(1)));
        Self {
            validator: Validator::new(identities),
            config,
            permits,
        }
    }

    /// Use `processor` for CONFIG envelopes.
    pub fn with_config_processor(mut self, processor: Arc<dyn ConfigTxProcessor>) -> Self {
        self.validator = self.validator.with_config_processor(processor);
        self
    }

    /// The configuration this gate was built with.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Validate a signed proposal before endorsement.
    pub fn validate_proposal(&self, signed: &SignedProposal) -> Result<ValidatedProposal> {
        self.validator.validate_proposal(signed).map_err(|e| {
            tracing::warn!(error = %e, "proposal rejected");
            GateError::from(e)
        })
    }

    /// Validate a single envelope before commit.
    pub fn validate_envelope(&self, envelope: &Envelope) -> Result<Payload> {
        self.validator.validate_envelope(envelope).map_err(|e| {
            tracing::warn!(error = %e, "envelope rejected");
            GateError::from(e)
        })
    }

    /// Validate a block of envelopes.
    ///
    /// Envelopes are independent and validated in parallel, at most
    /// `worker_threads` at a time. Results come back in input order. With
    /// `reject_duplicate_tx_ids` set, any valid envelope whose TxId was
    /// already admitted earlier in the block is rejected.
    pub async fn validate_block(&self, envelopes: Vec<Envelope>) -> Vec<Result<Payload>> {
        tracing::debug!(count = envelopes.len(), "validating block");

        let mut handles = Vec::with_capacity(envelopes.len());
        for envelope in envelopes {
            // The semaphore is never closed, so acquiring cannot fail.
            let permit = Arc::clone(&self.permits).acquire_owned().await.ok();
            let validator = self.validator.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                validator.validate_envelope(&envelope)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result.map_err(GateError::from),
                Err(e) => Err(GateError::Join(e.to_string())),
            };
            results.push(result);
        }

        if self.config.reject_duplicate_tx_ids {
            reject_duplicates(&mut results);
        }

        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                tracing::warn!(index, error = %e, "envelope rejected");
            }
        }

        results
    }
}

/// Replace every valid payload whose TxId was admitted earlier with
/// [`GateError::DuplicateTxId`].
fn reject_duplicates(results: &mut [Result<Payload>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, result) in results.iter_mut().enumerate() {
        let tx_id = match result {
            Ok(payload) => match payload.header.as_ref().and_then(|h| h.channel_header.as_ref()) {
                Some(ch) => ch.tx_id.clone(),
                None => continue,
            },
            Err(_) => continue,
        };

        match seen.get(&tx_id) {
            Some(&first_index) => {
                *result = Err(GateError::DuplicateTxId { tx_id, first_index });
            }
            None => {
                seen.insert(tx_id, index);
            }
        }
    }
}
