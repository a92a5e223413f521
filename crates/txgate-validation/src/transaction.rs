//! Commit-time validation of endorsed transactions.
//!
//! Each action carries the signature header of the proposal it was endorsed
//! for. Combining it with the outer channel header gives back the proposal
//! header, whose canonical encoding must hash, together with the chaincode
//! proposal payload, to the proposal hash the endorsers signed.

use txgate_core::{
    decode, encode, proposal_hash, ChaincodeActionPayload, Header, ProposalResponsePayload,
    SignatureHeader, Transaction,
};

use crate::error::{Result, ValidationError};
use crate::header::validate_signature_header;

/// Validate the transaction carried by an endorser-transaction payload.
///
/// `header` is the payload's header. Actions are checked in order and the
/// first failing action rejects the whole transaction.
pub fn validate_endorser_transaction(data: &[u8], header: &Header) -> Result<()> {
    if data.is_empty() {
        return Err(ValidationError::MissingInput("transaction data"));
    }
    let channel_header = header
        .channel_header
        .as_ref()
        .ok_or(ValidationError::MissingField("channel_header"))?;

    let tx: Transaction = decode(data).map_err(ValidationError::MalformedTransaction)?;
    if tx.actions.is_empty() {
        return Err(ValidationError::NoActions);
    }

    for (index, action) in tx.actions.iter().enumerate() {
        let signature_header: SignatureHeader = decode(&action.header)
            .map_err(|source| ValidationError::MalformedActionHeader { index, source })?;
        validate_signature_header(Some(&signature_header)).map_err(|err| match err {
            ValidationError::InvalidSignatureHeader { defect, .. } => {
                ValidationError::InvalidSignatureHeader {
                    defect,
                    action: Some(index),
                }
            }
            other => other,
        })?;

        let cap: ChaincodeActionPayload = decode(&action.payload)
            .map_err(|source| ValidationError::MalformedActionPayload { index, source })?;
        let prp: ProposalResponsePayload = decode(&cap.action.proposal_response_payload)
            .map_err(|source| ValidationError::MalformedResponsePayload { index, source })?;

        // The creator is not re-verified here; the envelope signature
        // already covers it.
        let original = Header::new(channel_header.clone(), signature_header);
        let expected = proposal_hash(&encode(&original), &cap.chaincode_proposal_payload);

        if prp.proposal_hash.as_ref() != expected.as_bytes() {
            return Err(ValidationError::ProposalHashMismatch {
                index,
                expected,
                recorded: hex::encode(&prp.proposal_hash),
            });
        }
        tracing::trace!(index, "action proposal hash matches");
    }

    Ok(())
}
