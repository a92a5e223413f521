//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats, no tags
//!
//! Every message is a map with small integer keys. Optional fields are
//! encoded by leaving their key out.
//!
//! Decoding is strict: bytes are accepted only if re-encoding the decoded
//! message reproduces them exactly. The commit path relies on this. It
//! rebuilds a proposal header from its two halves and hashes the rebuilt
//! bytes, which only matches the endorser's hash if there is exactly one
//! encoding per header.

use bytes::Bytes;
pub use ciborium::value::{Integer, Value};

use crate::error::CodecError;
use crate::message::{
    ChaincodeActionPayload, ChaincodeEndorsedAction, ChaincodeHeaderExtension, ChaincodeId,
    ChannelHeader, Endorsement, Envelope, Header, HeaderType, Payload, Proposal,
    ProposalResponsePayload, SignatureHeader, SignedProposal, Transaction, TransactionAction,
};

/// A message with a canonical CBOR representation.
pub trait Canonical: Sized {
    /// Message name used in error reports.
    const MESSAGE: &'static str;

    /// Convert to a CBOR value (map with integer keys).
    fn to_value(&self) -> Value;

    /// Convert a CBOR value back into the message.
    fn from_value(value: &Value) -> Result<Self, CodecError>;
}

/// Encode a message to canonical CBOR bytes.
pub fn encode<T: Canonical>(message: &T) -> Vec<u8> {
    encode_cbor_value_canonical(&message.to_value())
}

/// Decode a message, rejecting any encoding other than the canonical one.
pub fn decode<T: Canonical>(bytes: &[u8]) -> Result<T, CodecError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CodecError::Cbor(e.to_string()))?;

    let message = T::from_value(&value)?;

    // Also catches trailing bytes, which the reader leaves unread.
    if encode(&message) != bytes {
        return Err(CodecError::NonCanonical {
            message: T::MESSAGE,
        });
    }

    Ok(message)
}

/// Encode a CBOR Value to canonical bytes.
fn encode_cbor_value_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
///
/// Only values built by [`Canonical::to_value`] reach this function, and
/// those never contain floats or tags.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        _ => unreachable!("canonical messages contain no floats or tags"),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n = i128::from(i);

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);

    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Map helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulates the entries of a message map.
pub struct MapBuilder(Vec<(Value, Value)>);

impl MapBuilder {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn put(mut self, key: u64, value: Value) -> Self {
        self.0.push((Value::Integer(key.into()), value));
        self
    }

    pub fn bytes(self, key: u64, bytes: &[u8]) -> Self {
        self.put(key, Value::Bytes(bytes.to_vec()))
    }

    pub fn text(self, key: u64, s: &str) -> Self {
        self.put(key, Value::Text(s.to_owned()))
    }

    pub fn int(self, key: u64, n: impl Into<Integer>) -> Self {
        self.put(key, Value::Integer(n.into()))
    }

    /// Add the entry only when the value is present.
    pub fn opt(self, key: u64, value: Option<Value>) -> Self {
        match value {
            Some(v) => self.put(key, v),
            None => self,
        }
    }

    pub fn build(self) -> Value {
        Value::Map(self.0)
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed access to the entries of a decoded message map.
pub struct MapReader<'a> {
    message: &'static str,
    entries: &'a [(Value, Value)],
}

impl<'a> MapReader<'a> {
    /// Open a map, rejecting keys outside `known`.
    pub fn new(message: &'static str, value: &'a Value, known: &[u64]) -> Result<Self, CodecError> {
        let entries = match value {
            Value::Map(m) => m.as_slice(),
            _ => {
                return Err(CodecError::UnexpectedType {
                    message,
                    expected: "map",
                })
            }
        };

        for (k, _) in entries {
            let key = match k {
                Value::Integer(i) => u64::try_from(*i).ok(),
                _ => None,
            }
            .ok_or(CodecError::UnexpectedType {
                message,
                expected: "unsigned integer keys",
            })?;

            if !known.contains(&key) {
                return Err(CodecError::UnknownField { message, key });
            }
        }

        Ok(Self { message, entries })
    }

    pub fn get(&self, key: u64) -> Option<&'a Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
    }

    pub fn require(&self, key: u64, field: &'static str) -> Result<&'a Value, CodecError> {
        self.get(key).ok_or(CodecError::MissingField {
            message: self.message,
            field,
        })
    }

    fn unexpected(&self, expected: &'static str) -> CodecError {
        CodecError::UnexpectedType {
            message: self.message,
            expected,
        }
    }

    fn as_bytes(&self, value: &Value) -> Result<Bytes, CodecError> {
        match value {
            Value::Bytes(b) => Ok(Bytes::copy_from_slice(b)),
            _ => Err(self.unexpected("byte string")),
        }
    }

    pub fn bytes(&self, key: u64, field: &'static str) -> Result<Bytes, CodecError> {
        self.as_bytes(self.require(key, field)?)
    }

    pub fn opt_bytes(&self, key: u64) -> Result<Option<Bytes>, CodecError> {
        self.get(key).map(|v| self.as_bytes(v)).transpose()
    }

    pub fn text(&self, key: u64, field: &'static str) -> Result<String, CodecError> {
        match self.require(key, field)? {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(self.unexpected("text string")),
        }
    }

    pub fn integer<T: TryFrom<Integer>>(&self, key: u64, field: &'static str) -> Result<T, CodecError> {
        match self.require(key, field)? {
            Value::Integer(i) => T::try_from(*i).map_err(|_| CodecError::OutOfRange {
                message: self.message,
                field,
            }),
            _ => Err(self.unexpected("integer")),
        }
    }

    pub fn message<T: Canonical>(&self, key: u64, field: &'static str) -> Result<T, CodecError> {
        T::from_value(self.require(key, field)?)
    }

    pub fn opt_message<T: Canonical>(&self, key: u64) -> Result<Option<T>, CodecError> {
        self.get(key).map(T::from_value).transpose()
    }

    pub fn list<T: Canonical>(&self, key: u64, field: &'static str) -> Result<Vec<T>, CodecError> {
        match self.require(key, field)? {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            _ => Err(self.unexpected("array")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Message encodings
// ─────────────────────────────────────────────────────────────────────────────

impl Canonical for ChannelHeader {
    const MESSAGE: &'static str = "ChannelHeader";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .int(0, self.header_type.code())
            .int(1, self.version)
            .int(2, self.timestamp)
            .text(3, &self.channel_id)
            .text(4, &self.tx_id)
            .int(5, self.epoch)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1, 2, 3, 4, 5])?;
        Ok(Self {
            header_type: HeaderType::from_code(map.integer(0, "type")?),
            version: map.integer(1, "version")?,
            timestamp: map.integer(2, "timestamp")?,
            channel_id: map.text(3, "channel_id")?,
            tx_id: map.text(4, "tx_id")?,
            epoch: map.integer(5, "epoch")?,
        })
    }
}

impl Canonical for SignatureHeader {
    const MESSAGE: &'static str = "SignatureHeader";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.creator)
            .bytes(1, &self.nonce)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            creator: map.bytes(0, "creator")?,
            nonce: map.bytes(1, "nonce")?,
        })
    }
}

impl Canonical for Header {
    const MESSAGE: &'static str = "Header";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .opt(0, self.channel_header.as_ref().map(Canonical::to_value))
            .opt(1, self.signature_header.as_ref().map(Canonical::to_value))
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            channel_header: map.opt_message(0)?,
            signature_header: map.opt_message(1)?,
        })
    }
}

impl Canonical for Payload {
    const MESSAGE: &'static str = "Payload";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .opt(0, self.header.as_ref().map(Canonical::to_value))
            .bytes(1, &self.data)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            header: map.opt_message(0)?,
            data: map.bytes(1, "data")?,
        })
    }
}

impl Canonical for Envelope {
    const MESSAGE: &'static str = "Envelope";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.payload)
            .bytes(1, &self.signature)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            payload: map.bytes(0, "payload")?,
            signature: map.bytes(1, "signature")?,
        })
    }
}

impl Canonical for Proposal {
    const MESSAGE: &'static str = "Proposal";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.header)
            .bytes(1, &self.payload)
            .bytes(2, &self.extension)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1, 2])?;
        Ok(Self {
            header: map.bytes(0, "header")?,
            payload: map.bytes(1, "payload")?,
            extension: map.bytes(2, "extension")?,
        })
    }
}

impl Canonical for SignedProposal {
    const MESSAGE: &'static str = "SignedProposal";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.proposal_bytes)
            .bytes(1, &self.signature)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            proposal_bytes: map.bytes(0, "proposal_bytes")?,
            signature: map.bytes(1, "signature")?,
        })
    }
}

impl Canonical for ChaincodeId {
    const MESSAGE: &'static str = "ChaincodeId";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .text(0, &self.name)
            .text(1, &self.version)
            .text(2, &self.path)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1, 2])?;
        Ok(Self {
            name: map.text(0, "name")?,
            version: map.text(1, "version")?,
            path: map.text(2, "path")?,
        })
    }
}

impl Canonical for ChaincodeHeaderExtension {
    const MESSAGE: &'static str = "ChaincodeHeaderExtension";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .opt(0, self.chaincode_id.as_ref().map(Canonical::to_value))
            .opt(
                1,
                self.payload_visibility
                    .as_ref()
                    .map(|v| Value::Bytes(v.to_vec())),
            )
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            chaincode_id: map.opt_message(0)?,
            payload_visibility: map.opt_bytes(1)?,
        })
    }
}

impl Canonical for Transaction {
    const MESSAGE: &'static str = "Transaction";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .put(
                0,
                Value::Array(self.actions.iter().map(Canonical::to_value).collect()),
            )
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0])?;
        Ok(Self {
            actions: map.list(0, "actions")?,
        })
    }
}

impl Canonical for TransactionAction {
    const MESSAGE: &'static str = "TransactionAction";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.header)
            .bytes(1, &self.payload)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            header: map.bytes(0, "header")?,
            payload: map.bytes(1, "payload")?,
        })
    }
}

impl Canonical for ChaincodeActionPayload {
    const MESSAGE: &'static str = "ChaincodeActionPayload";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.chaincode_proposal_payload)
            .put(1, self.action.to_value())
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            chaincode_proposal_payload: map.bytes(0, "chaincode_proposal_payload")?,
            action: map.message(1, "action")?,
        })
    }
}

impl Canonical for ChaincodeEndorsedAction {
    const MESSAGE: &'static str = "ChaincodeEndorsedAction";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.proposal_response_payload)
            .put(
                1,
                Value::Array(self.endorsements.iter().map(Canonical::to_value).collect()),
            )
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            proposal_response_payload: map.bytes(0, "proposal_response_payload")?,
            endorsements: map.list(1, "endorsements")?,
        })
    }
}

impl Canonical for Endorsement {
    const MESSAGE: &'static str = "Endorsement";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.endorser)
            .bytes(1, &self.signature)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            endorser: map.bytes(0, "endorser")?,
            signature: map.bytes(1, "signature")?,
        })
    }
}

impl Canonical for ProposalResponsePayload {
    const MESSAGE: &'static str = "ProposalResponsePayload";

    fn to_value(&self) -> Value {
        MapBuilder::new()
            .bytes(0, &self.proposal_hash)
            .bytes(1, &self.extension)
            .build()
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = MapReader::new(Self::MESSAGE, value, &[0, 1])?;
        Ok(Self {
            proposal_hash: map.bytes(0, "proposal_hash")?,
            extension: map.bytes(1, "extension")?,
        })
    }
}
