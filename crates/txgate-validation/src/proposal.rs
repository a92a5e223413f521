//! Pre-endorsement validation of signed proposals.

use tracing::Span;
use txgate_core::{decode, ChaincodeHeaderExtension, Header, HeaderType, Proposal, SignedProposal};
use txgate_msp::{Identity, IdentityProvider};

use crate::error::{Result, ValidationError};
use crate::header::validate_header;
use crate::signature::verify_creator;
use crate::txid::check_tx_id;

/// A proposal that passed validation, decoded for the endorsement logic.
#[derive(Debug)]
pub struct ValidatedProposal {
    pub proposal: Proposal,
    pub header: Header,
    pub extension: ChaincodeHeaderExtension,

    /// The verified submitter.
    pub creator: Box<dyn Identity>,
}

/// Validate a signed proposal end to end.
///
/// This performs:
/// - Proposal and header decoding
/// - Header structure checks
/// - Creator and signature verification over `proposal_bytes`
/// - TxId check
/// - Header extension checks for the declared type
///
/// If the current span has `channel` and `tx_id` fields they are filled in
/// once the header is decoded.
pub fn validate_proposal(
    identities: &dyn IdentityProvider,
    signed: &SignedProposal,
) -> Result<ValidatedProposal> {
    let proposal: Proposal =
        decode(&signed.proposal_bytes).map_err(ValidationError::MalformedProposal)?;
    let header: Header = decode(&proposal.header).map_err(ValidationError::MalformedProposal)?;

    let (ch, sh) = validate_header(&header)?;
    Span::current()
        .record("channel", ch.channel_id.as_str())
        .record("tx_id", ch.tx_id.as_str());

    let creator = verify_creator(
        identities,
        &sh.creator,
        &signed.signature,
        &signed.proposal_bytes,
        &ch.channel_id,
    )?;

    check_tx_id(&ch.tx_id, &sh.nonce, &sh.creator)?;

    let extension = match ch.header_type {
        HeaderType::Config | HeaderType::EndorserTransaction => {
            let extension: ChaincodeHeaderExtension =
                decode(&proposal.extension).map_err(ValidationError::InvalidHeaderExtension)?;
            if extension.payload_visibility.is_some() {
                return Err(ValidationError::UnsupportedVisibility);
            }
            extension
        }
        header_type @ (HeaderType::ConfigUpdate | HeaderType::Unsupported(_)) => {
            return Err(ValidationError::UnsupportedType {
                header_type,
                context: "proposal",
            });
        }
    };

    Ok(ValidatedProposal {
        proposal,
        header,
        extension,
        creator,
    })
}
