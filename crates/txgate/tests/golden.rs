//! Golden vectors for cross-implementation verification.
//!
//! Every implementation exchanging messages with txgate must produce
//! identical:
//! - header_bytes (canonical CBOR)
//! - tx_id
//! - proposal_bytes
//! - signature (deterministic Ed25519)
//! - proposal_hash

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use txgate::core::{encode, proposal_hash, ChaincodeId, ChannelHeader, Header, SignatureHeader};
use txgate::msp::{ChannelRegistry, LocalMsp, SigningIdentity};
use txgate::{Gate, GateConfig, HeaderType, Keypair, ProposalBuilder, SignedProposal, TxId};

const MSP_ID: &str = "Org1MSP";
const CHANNEL: &str = "golden";
const TIMESTAMP: i64 = 1736870400000;

/// A single golden vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub creator_seed: String, // 32 bytes hex
    pub header_type: i32,
    pub nonce: String,   // hex
    pub payload: String, // hex

    // Derived outputs (all hex except tx_id, which is already hex)
    pub creator: String,
    pub header_bytes: String,
    pub tx_id: String,
    pub proposal_bytes: String,
    pub signature: String, // 64 bytes
    pub proposal_hash: String,
}

fn signer(seed: [u8; 32]) -> SigningIdentity {
    SigningIdentity::new(MSP_ID, Keypair::from_seed(&seed))
}

fn generate_vector(
    name: &str,
    description: &str,
    seed: [u8; 32],
    header_type: HeaderType,
    nonce: &[u8],
    payload: &[u8],
) -> GoldenVector {
    let identity = signer(seed);
    let creator = identity.serialize();

    let proposal = ProposalBuilder::new(CHANNEL, ChaincodeId::new("golden-cc", "1.0"), creator.clone())
        .header_type(header_type)
        .nonce(nonce.to_vec())
        .payload(payload.to_vec())
        .timestamp(TIMESTAMP)
        .build();
    let signed = proposal.sign(identity.keypair());

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        creator_seed: hex::encode(seed),
        header_type: header_type.code(),
        nonce: hex::encode(nonce),
        payload: hex::encode(payload),
        creator: hex::encode(&creator),
        header_bytes: hex::encode(&proposal.header),
        tx_id: TxId::derive(nonce, &creator).to_hex(),
        proposal_bytes: hex::encode(&signed.proposal_bytes),
        signature: hex::encode(&signed.signature),
        proposal_hash: proposal_hash(&proposal.header, &proposal.payload).to_hex(),
    }
}

/// Generate all golden vectors.
pub fn generate_all_vectors() -> Vec<GoldenVector> {
    vec![
        generate_vector(
            "endorser_empty_payload",
            "Endorser proposal with no chaincode input",
            [0x01; 32],
            HeaderType::EndorserTransaction,
            b"nonce-0001",
            &[],
        ),
        generate_vector(
            "endorser_with_payload",
            "Endorser proposal with a chaincode input",
            [0x02; 32],
            HeaderType::EndorserTransaction,
            b"nonce-0002",
            b"transfer car1 alice bob",
        ),
        generate_vector(
            "config_proposal",
            "Config proposal sharing the chaincode extension",
            [0x03; 32],
            HeaderType::Config,
            b"nonce-0003",
            b"",
        ),
        generate_vector(
            "long_nonce_binary_payload",
            "48-byte nonce and a binary payload",
            [0x04; 32],
            HeaderType::EndorserTransaction,
            &[0xa5; 48],
            &[0x00, 0xff, 0x10, 0x80],
        ),
    ]
}

fn registry() -> Arc<ChannelRegistry> {
    let mut msp = LocalMsp::builder(MSP_ID);
    for seed in 1..=4u8 {
        msp = msp.enroll(signer([seed; 32]).public_key());
    }
    Arc::new(ChannelRegistry::builder().channel(CHANNEL, msp.build()).build())
}

#[test]
fn test_generate_vectors() {
    let vectors = generate_all_vectors();
    assert_eq!(vectors.len(), 4);

    for v in &vectors {
        assert!(!v.header_bytes.is_empty());
        assert_eq!(v.tx_id.len(), 64, "tx_id length for {}", v.name);
        assert_eq!(v.signature.len(), 128, "signature length for {}", v.name);
        assert_eq!(v.proposal_hash.len(), 64, "proposal_hash length for {}", v.name);
    }
}

#[test]
fn test_vectors_deterministic() {
    let a = generate_all_vectors();
    let b = generate_all_vectors();

    for (a, b) in a.iter().zip(b.iter()) {
        assert_eq!(a.header_bytes, b.header_bytes, "header_bytes mismatch for {}", a.name);
        assert_eq!(a.tx_id, b.tx_id, "tx_id mismatch for {}", a.name);
        assert_eq!(a.proposal_bytes, b.proposal_bytes, "proposal_bytes mismatch for {}", a.name);
        assert_eq!(a.signature, b.signature, "signature mismatch for {}", a.name);
        assert_eq!(a.proposal_hash, b.proposal_hash, "proposal_hash mismatch for {}", a.name);
    }
}

#[test]
fn test_vectors_validate() {
    let gate = Gate::new(registry(), GateConfig::default());

    for v in generate_all_vectors() {
        let signed = SignedProposal {
            proposal_bytes: hex::decode(&v.proposal_bytes).unwrap().into(),
            signature: hex::decode(&v.signature).unwrap().into(),
        };
        let validated = gate
            .validate_proposal(&signed)
            .unwrap_or_else(|e| panic!("{} rejected: {}", v.name, e));

        let ch = validated.header.channel_header.as_ref().unwrap();
        assert_eq!(ch.tx_id, v.tx_id, "tx_id mismatch for {}", v.name);
        assert_eq!(ch.header_type.code(), v.header_type, "type mismatch for {}", v.name);
    }
}

#[test]
fn test_channel_header_exact_bytes() {
    let ch = ChannelHeader {
        header_type: HeaderType::EndorserTransaction,
        version: 0,
        timestamp: TIMESTAMP,
        channel_id: "trade".into(),
        tx_id: "ab".into(),
        epoch: 0,
    };
    // map(6) {0: 3, 1: 0, 2: uint64, 3: "trade", 4: "ab", 5: 0}
    let expected = "a6\
                    0003\
                    0100\
                    021b00000194658b1000\
                    03657472616465\
                    04626162\
                    0500";
    assert_eq!(hex::encode(encode(&ch)), expected);
}

#[test]
fn test_signature_header_exact_bytes() {
    let sh = SignatureHeader {
        creator: Bytes::from_static(b"alice"),
        nonce: Bytes::from_static(b"n"),
    };
    // map(2) {0: h'616c696365', 1: h'6e'}
    assert_eq!(hex::encode(encode(&sh)), "a20045616c69636501416e");

    // A header with only the signature half omits key 0.
    let header = Header {
        channel_header: None,
        signature_header: Some(sh),
    };
    assert_eq!(hex::encode(encode(&header)), "a101a20045616c69636501416e");
}

#[test]
fn test_unsupported_type_code_preserved() {
    let ch = ChannelHeader {
        header_type: HeaderType::Unsupported(100),
        version: 0,
        timestamp: 0,
        channel_id: String::new(),
        tx_id: String::new(),
        epoch: 0,
    };
    // 100 needs a one-byte argument: 0x18 0x64.
    assert_eq!(hex::encode(encode(&ch)), "a600186401000200036004600500");
}

#[test]
fn print_golden_vectors_json() {
    #[derive(Serialize)]
    struct VectorFile {
        version: String,
        description: String,
        msp_id: String,
        channel_id: String,
        vectors: Vec<GoldenVector>,
    }

    let file = VectorFile {
        version: "0.1.0".to_string(),
        description: "Golden vectors for txgate proposals. Every implementation must produce identical outputs.".to_string(),
        msp_id: MSP_ID.to_string(),
        channel_id: CHANNEL.to_string(),
        vectors: generate_all_vectors(),
    };

    let json = serde_json::to_string_pretty(&file).unwrap();
    println!("{}", json);
}
