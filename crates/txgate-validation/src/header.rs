//! Structural checks on channel and signature headers.

use txgate_core::{ChannelHeader, Header, HeaderType, SignatureHeader};

use crate::error::{Result, ValidationError};

/// The only epoch this node accepts.
pub const CURRENT_EPOCH: u64 = 0;

/// Check a channel header and return it.
///
/// This performs:
/// - Presence check
/// - Header type check (CONFIG, CONFIG_UPDATE or ENDORSER_TRANSACTION)
/// - Epoch check
pub fn validate_channel_header(ch: Option<&ChannelHeader>) -> Result<&ChannelHeader> {
    let ch = ch.ok_or(ValidationError::MissingField("channel_header"))?;

    match ch.header_type {
        HeaderType::Config | HeaderType::ConfigUpdate | HeaderType::EndorserTransaction => {}
        header_type @ HeaderType::Unsupported(_) => {
            return Err(ValidationError::UnsupportedType {
                header_type,
                context: "channel header",
            });
        }
    }

    if ch.epoch != CURRENT_EPOCH {
        return Err(ValidationError::InvalidEpoch { epoch: ch.epoch });
    }

    Ok(ch)
}

/// Check that a signature header is present with a non-empty nonce and
/// creator, and return it.
pub fn validate_signature_header(sh: Option<&SignatureHeader>) -> Result<&SignatureHeader> {
    let sh = sh.ok_or(ValidationError::MissingField("signature_header"))?;

    if sh.nonce.is_empty() {
        return Err(ValidationError::InvalidSignatureHeader {
            defect: "empty nonce",
            action: None,
        });
    }
    if sh.creator.is_empty() {
        return Err(ValidationError::InvalidSignatureHeader {
            defect: "empty creator",
            action: None,
        });
    }

    Ok(sh)
}

/// Check both halves of a header.
pub fn validate_header(header: &Header) -> Result<(&ChannelHeader, &SignatureHeader)> {
    let ch = validate_channel_header(header.channel_header.as_ref())?;
    let sh = validate_signature_header(header.signature_header.as_ref())?;
    Ok((ch, sh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use proptest::prelude::*;
    use txgate_testkit::generators::{header_type, nonzero_epoch};

    fn channel_header(header_type: HeaderType, epoch: u64) -> ChannelHeader {
        ChannelHeader {
            header_type,
            version: 0,
            timestamp: 1736870400000,
            channel_id: "trade".into(),
            tx_id: "00".into(),
            epoch,
        }
    }

    fn signature_header(creator: &'static [u8], nonce: &'static [u8]) -> SignatureHeader {
        SignatureHeader {
            creator: Bytes::from_static(creator),
            nonce: Bytes::from_static(nonce),
        }
    }

    #[test]
    fn test_recognized_types_accepted() {
        for ty in [
            HeaderType::Config,
            HeaderType::ConfigUpdate,
            HeaderType::EndorserTransaction,
        ] {
            let ch = channel_header(ty, 0);
            assert!(validate_channel_header(Some(&ch)).is_ok());
        }
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let ch = channel_header(HeaderType::Unsupported(42), 0);
        let result = validate_channel_header(Some(&ch));
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType {
                header_type: HeaderType::Unsupported(42),
                ..
            })
        ));
    }

    #[test]
    fn test_missing_parts() {
        assert_eq!(
            validate_channel_header(None),
            Err(ValidationError::MissingField("channel_header"))
        );
        assert_eq!(
            validate_signature_header(None),
            Err(ValidationError::MissingField("signature_header"))
        );

        let header = Header {
            channel_header: Some(channel_header(HeaderType::EndorserTransaction, 0)),
            signature_header: None,
        };
        assert_eq!(
            validate_header(&header),
            Err(ValidationError::MissingField("signature_header"))
        );
    }

    #[test]
    fn test_empty_nonce_or_creator() {
        let no_nonce = signature_header(b"alice", b"");
        let no_creator = signature_header(b"", b"nonce");

        assert!(matches!(
            validate_signature_header(Some(&no_nonce)),
            Err(ValidationError::InvalidSignatureHeader {
                defect: "empty nonce",
                action: None
            })
        ));
        assert!(matches!(
            validate_signature_header(Some(&no_creator)),
            Err(ValidationError::InvalidSignatureHeader {
                defect: "empty creator",
                action: None
            })
        ));
    }

    #[test]
    fn test_valid_header() {
        let header = Header::new(
            channel_header(HeaderType::EndorserTransaction, 0),
            signature_header(b"alice", b"nonce"),
        );
        let (ch, sh) = validate_header(&header).unwrap();
        assert_eq!(ch.channel_id, "trade");
        assert_eq!(sh.creator.as_ref(), b"alice");
    }

    proptest! {
        #[test]
        fn test_nonzero_epoch_rejected(epoch in nonzero_epoch()) {
            let ch = channel_header(HeaderType::EndorserTransaction, epoch);
            prop_assert_eq!(
                validate_channel_header(Some(&ch)),
                Err(ValidationError::InvalidEpoch { epoch })
            );
        }

        #[test]
        fn test_type_check_matches_enum(ty in header_type()) {
            let ch = channel_header(ty, 0);
            let accepted = validate_channel_header(Some(&ch)).is_ok();
            prop_assert_eq!(accepted, !matches!(ty, HeaderType::Unsupported(_)));
        }
    }
}
