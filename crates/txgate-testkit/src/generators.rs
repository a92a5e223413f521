//! Proptest generators for property-based testing.

use proptest::prelude::*;

use txgate_core::{HeaderType, Proposal};

use crate::fixtures::TestNetwork;

/// Generate a non-empty nonce.
pub fn nonce() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=48)
}

/// Generate non-empty creator bytes.
pub fn creator() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=96)
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a non-zero epoch.
pub fn nonzero_epoch() -> impl Strategy<Value = u64> {
    1u64..=u64::MAX
}

/// Generate any header type, including unsupported codes.
pub fn header_type() -> impl Strategy<Value = HeaderType> {
    prop_oneof![
        Just(HeaderType::Config),
        Just(HeaderType::ConfigUpdate),
        Just(HeaderType::EndorserTransaction),
        any::<i32>().prop_map(HeaderType::from_code),
    ]
}

/// Generate a code outside the recognized header types.
pub fn unsupported_header_code() -> impl Strategy<Value = i32> {
    any::<i32>().prop_filter("recognized header type", |code| {
        matches!(HeaderType::from_code(*code), HeaderType::Unsupported(_))
    })
}

/// Parameters for generating a client proposal.
#[derive(Debug, Clone)]
pub struct ProposalParams {
    pub nonce: Vec<u8>,
    pub payload: Vec<u8>,
    pub timestamp: i64,
}

impl Arbitrary for ProposalParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (nonce(), payload(256), 0i64..=1_900_000_000_000i64)
            .prop_map(|(nonce, payload, timestamp)| ProposalParams {
                nonce,
                payload,
                timestamp,
            })
            .boxed()
    }
}

/// Build the client's proposal from parameters.
pub fn proposal_from_params(net: &TestNetwork, params: &ProposalParams) -> Proposal {
    net.proposal_builder()
        .nonce(params.nonce.clone())
        .payload(params.payload.clone())
        .timestamp(params.timestamp)
        .build()
}
