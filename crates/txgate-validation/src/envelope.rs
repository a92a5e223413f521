//! Top-level validation of committed envelopes.

use tracing::Span;
use txgate_core::{decode, Envelope, HeaderType, Payload};
use txgate_msp::IdentityProvider;

use crate::config::ConfigTxProcessor;
use crate::error::{Result, ValidationError};
use crate::header::validate_header;
use crate::signature::verify_creator;
use crate::transaction::validate_endorser_transaction;
use crate::txid::check_tx_id;

/// Validate an envelope and return its decoded payload.
///
/// This performs:
/// - Payload decoding
/// - Header structure checks
/// - Creator and signature verification over the raw payload bytes
/// - Type dispatch: endorser transactions get the TxId check and per-action
///   proposal hash checks, config transactions go to `config`
pub fn validate_envelope(
    identities: &dyn IdentityProvider,
    config: &dyn ConfigTxProcessor,
    envelope: &Envelope,
) -> Result<Payload> {
    if envelope.payload.is_empty() {
        return Err(ValidationError::MissingInput("envelope payload"));
    }

    let payload: Payload = decode(&envelope.payload).map_err(ValidationError::MalformedPayload)?;
    let header = payload
        .header
        .as_ref()
        .ok_or(ValidationError::MissingField("header"))?;

    let (ch, sh) = validate_header(header)?;
    Span::current()
        .record("channel", ch.channel_id.as_str())
        .record("tx_id", ch.tx_id.as_str());

    verify_creator(
        identities,
        &sh.creator,
        &envelope.signature,
        &envelope.payload,
        &ch.channel_id,
    )?;

    match ch.header_type {
        HeaderType::EndorserTransaction => {
            check_tx_id(&ch.tx_id, &sh.nonce, &sh.creator)?;
            validate_endorser_transaction(&payload.data, header)?;
        }
        HeaderType::Config => {
            if payload.data.is_empty() {
                return Err(ValidationError::MissingInput("config data"));
            }
            config
                .process(&payload.data, header)
                .map_err(ValidationError::ConfigRejected)?;
        }
        header_type @ (HeaderType::ConfigUpdate | HeaderType::Unsupported(_)) => {
            return Err(ValidationError::UnsupportedType {
                header_type,
                context: "envelope",
            });
        }
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcceptAllConfig;
    use bytes::Bytes;
    use proptest::prelude::*;
    use txgate_core::{encode, Header};
    use txgate_testkit::generators::nonzero_epoch;
    use txgate_testkit::tamper::{
        flip_bit, with_action_header, with_channel_header, with_signature_header, with_transaction,
    };
    use txgate_testkit::TestNetwork;

    fn validate(net: &TestNetwork, envelope: &Envelope) -> Result<Payload> {
        validate_envelope(&net.registry(), &AcceptAllConfig, envelope)
    }

    #[test]
    fn test_endorsed_envelope_validates() {
        let net = TestNetwork::new();
        let envelope = net.transaction_envelope(b"transfer 10");
        let payload = validate(&net, &envelope).unwrap();
        assert_eq!(encode(&payload), envelope.payload.to_vec());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let net = TestNetwork::new();
        let envelope = net.transaction_envelope(b"transfer 10");
        let first = validate(&net, &envelope);
        let second = validate(&net, &envelope);
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_envelope() {
        let net = TestNetwork::new();
        let envelope = Envelope {
            payload: Bytes::new(),
            signature: Bytes::new(),
        };
        assert_eq!(
            validate(&net, &envelope),
            Err(ValidationError::MissingInput("envelope payload"))
        );
    }

    #[test]
    fn test_malformed_payload() {
        let net = TestNetwork::new();
        let envelope = Envelope {
            payload: Bytes::from_static(b"\xa1\x00"),
            signature: Bytes::from_static(&[1u8; 64]),
        };
        assert!(matches!(
            validate(&net, &envelope),
            Err(ValidationError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_payload_without_header() {
        let net = TestNetwork::new();
        let payload = Payload {
            header: None,
            data: Bytes::from_static(b"data"),
        };
        let envelope = net.sign_payload(&payload);
        assert_eq!(
            validate(&net, &envelope),
            Err(ValidationError::MissingField("header"))
        );
    }

    #[test]
    fn test_signature_over_other_payload() {
        let net = TestNetwork::new();
        let mut envelope = net.transaction_envelope(b"transfer 10");
        envelope.signature = net.transaction_envelope(b"transfer 20").signature;
        assert!(matches!(
            validate(&net, &envelope),
            Err(ValidationError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_forged_tx_id() {
        let net = TestNetwork::new();
        let payload = with_channel_header(&net.endorsed_payload(&net.proposal(b"x")), |ch| {
            ch.tx_id = "00".repeat(32);
        });
        assert!(matches!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::TxIdMismatch { .. })
        ));
    }

    #[test]
    fn test_outer_nonce_rebinds_tx_id() {
        let net = TestNetwork::new();
        let payload = with_signature_header(&net.endorsed_payload(&net.proposal(b"x")), |sh| {
            sh.nonce = Bytes::from_static(b"replayed with a fresh nonce");
        });
        assert!(matches!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::TxIdMismatch { .. })
        ));
    }

    #[test]
    fn test_outer_empty_creator() {
        let net = TestNetwork::new();
        let payload = with_signature_header(&net.endorsed_payload(&net.proposal(b"x")), |sh| {
            sh.creator = Bytes::new();
        });
        assert_eq!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::InvalidSignatureHeader {
                defect: "empty creator",
                action: None,
            })
        );
    }

    #[test]
    fn test_epoch_rejected_before_hash_checks() {
        let net = TestNetwork::new();
        let proposal = net.proposal_builder().epoch(5).payload(b"x".to_vec()).build();
        let envelope = net.sign_payload(&net.endorsed_payload(&proposal));
        assert_eq!(
            validate(&net, &envelope),
            Err(ValidationError::InvalidEpoch { epoch: 5 })
        );
    }

    #[test]
    fn test_altered_action_nonce() {
        let net = TestNetwork::new();
        let payload = with_action_header(&net.endorsed_payload(&net.proposal(b"x")), 0, |sh| {
            sh.nonce = flip_bit(&sh.nonce, 0);
        });
        assert!(matches!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::ProposalHashMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_no_actions() {
        let net = TestNetwork::new();
        let payload = with_transaction(&net.endorsed_payload(&net.proposal(b"x")), |tx| {
            tx.actions.clear();
        });
        assert_eq!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::NoActions)
        );
    }

    #[test]
    fn test_config_envelope_delegates() {
        let net = TestNetwork::new();
        let envelope = net.config_envelope(b"new policy");
        assert!(validate(&net, &envelope).is_ok());

        let strict = |data: &[u8], _: &Header| -> std::result::Result<(), String> {
            if data.starts_with(b"new") {
                Err("policy changes are frozen".to_string())
            } else {
                Ok(())
            }
        };
        assert_eq!(
            validate_envelope(&net.registry(), &strict, &envelope),
            Err(ValidationError::ConfigRejected("policy changes are frozen".into()))
        );
    }

    #[test]
    fn test_config_envelope_requires_data() {
        let net = TestNetwork::new();
        let envelope = net.config_envelope(b"");
        assert_eq!(
            validate(&net, &envelope),
            Err(ValidationError::MissingInput("config data"))
        );
    }

    #[test]
    fn test_config_update_envelope_unsupported() {
        let net = TestNetwork::new();
        let payload = with_channel_header(&net.endorsed_payload(&net.proposal(b"x")), |ch| {
            ch.header_type = HeaderType::ConfigUpdate;
        });
        assert!(matches!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::UnsupportedType {
                header_type: HeaderType::ConfigUpdate,
                context: "envelope",
            })
        ));
    }

    #[test]
    fn test_unsupported_code_rejected_by_header_check() {
        let net = TestNetwork::new();
        let payload = with_channel_header(&net.endorsed_payload(&net.proposal(b"x")), |ch| {
            ch.header_type = HeaderType::Unsupported(99);
        });
        assert!(matches!(
            validate(&net, &net.sign_payload(&payload)),
            Err(ValidationError::UnsupportedType {
                header_type: HeaderType::Unsupported(99),
                context: "channel header",
            })
        ));
    }

    proptest! {
        #[test]
        fn test_nonzero_epoch_rejected_regardless_of_signature(
            epoch in nonzero_epoch(),
            signed in any::<bool>(),
        ) {
            let net = TestNetwork::new();
            let payload = with_channel_header(&net.endorsed_payload(&net.proposal(b"x")), |ch| {
                ch.epoch = epoch;
            });
            let mut envelope = net.sign_payload(&payload);
            if !signed {
                envelope.signature = Bytes::from_static(&[0u8; 64]);
            }
            prop_assert_eq!(
                validate(&net, &envelope),
                Err(ValidationError::InvalidEpoch { epoch })
            );
        }
    }
}
