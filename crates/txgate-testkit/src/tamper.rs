//! Helpers that alter already endorsed messages.
//!
//! Each helper decodes the relevant part, changes it and re-encodes it
//! canonically, so the result still parses and only the intended field
//! differs. Re-sign the returned payload to get past the envelope
//! signature check.

use bytes::Bytes;
use txgate_core::{
    decode, encode, ChaincodeActionPayload, ChannelHeader, Payload, SignatureHeader, Transaction,
};

/// Flip the lowest bit of `bytes[index]`.
pub fn flip_bit(bytes: &[u8], index: usize) -> Bytes {
    let mut out = bytes.to_vec();
    out[index] ^= 0x01;
    out.into()
}

/// Apply `f` to the payload's channel header.
pub fn with_channel_header(payload: &Payload, f: impl FnOnce(&mut ChannelHeader)) -> Payload {
    let mut payload = payload.clone();
    let header = payload.header.as_mut().expect("payload has a header");
    f(header.channel_header.as_mut().expect("header has a channel header"));
    payload
}

/// Apply `f` to the payload's outer signature header.
pub fn with_signature_header(payload: &Payload, f: impl FnOnce(&mut SignatureHeader)) -> Payload {
    let mut payload = payload.clone();
    let header = payload.header.as_mut().expect("payload has a header");
    f(header
        .signature_header
        .as_mut()
        .expect("header has a signature header"));
    payload
}

/// Apply `f` to the decoded transaction carried by the payload.
pub fn with_transaction(payload: &Payload, f: impl FnOnce(&mut Transaction)) -> Payload {
    let mut tx: Transaction = decode(&payload.data).expect("payload carries a transaction");
    f(&mut tx);
    Payload {
        header: payload.header.clone(),
        data: encode(&tx).into(),
    }
}

/// Apply `f` to the signature header of action `index`.
pub fn with_action_header(
    payload: &Payload,
    index: usize,
    f: impl FnOnce(&mut SignatureHeader),
) -> Payload {
    with_transaction(payload, |tx| {
        let action = &mut tx.actions[index];
        let mut header: SignatureHeader = decode(&action.header).expect("action header decodes");
        f(&mut header);
        action.header = encode(&header).into();
    })
}

/// Apply `f` to the chaincode action payload of action `index`.
pub fn with_action_payload(
    payload: &Payload,
    index: usize,
    f: impl FnOnce(&mut ChaincodeActionPayload),
) -> Payload {
    with_transaction(payload, |tx| {
        let action = &mut tx.actions[index];
        let mut cap: ChaincodeActionPayload =
            decode(&action.payload).expect("action payload decodes");
        f(&mut cap);
        action.payload = encode(&cap).into();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestNetwork;

    #[test]
    fn test_flip_bit_changes_one_bit() {
        let flipped = flip_bit(&[0b1010], 0);
        assert_eq!(flipped.as_ref(), &[0b1011]);
    }

    #[test]
    fn test_with_action_header_only_touches_nonce() {
        let net = TestNetwork::new();
        let payload = net.endorsed_payload(&net.proposal(b"move"));
        let tampered = with_action_header(&payload, 0, |sh| sh.nonce = flip_bit(&sh.nonce, 0));

        assert_eq!(tampered.header, payload.header);
        let before: Transaction = decode(&payload.data).unwrap();
        let after: Transaction = decode(&tampered.data).unwrap();
        assert_ne!(before.actions[0].header, after.actions[0].header);
        assert_eq!(before.actions[0].payload, after.actions[0].payload);
    }
}
