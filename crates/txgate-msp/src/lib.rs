//! # txgate MSP
//!
//! Membership services: the trust boundary the validation pipeline relies on.
//!
//! ## Overview
//!
//! Every header names its signer as opaque `creator` bytes. Validators turn
//! those bytes into something they can trust through three traits:
//!
//! - [`IdentityProvider`]: channel id to that channel's deserializer
//! - [`IdentityDeserializer`]: creator bytes to an [`Identity`]
//! - [`Identity`]: validation (enrollment, revocation) and signature checks
//!
//! ## Provided Implementations
//!
//! - [`LocalMsp`]: one organization's Ed25519 membership (enrolled keys plus
//!   a revocation list)
//! - [`MspSet`]: several organizations sharing a channel
//! - [`ChannelRegistry`]: the immutable channel map handed to validators
//! - [`SigningIdentity`]: the client and endorser side, producing creator
//!   bytes and signatures
//!
//! ## Usage
//!
//! ```rust
//! use txgate_core::Keypair;
//! use txgate_msp::{ChannelRegistry, IdentityProvider, LocalMsp, SigningIdentity};
//!
//! let alice = SigningIdentity::new("Org1MSP", Keypair::generate());
//! let msp = LocalMsp::builder("Org1MSP").enroll(alice.public_key()).build();
//! let registry = ChannelRegistry::builder().channel("trade", msp).build();
//!
//! let identity = registry
//!     .deserializer("trade")
//!     .unwrap()
//!     .deserialize_identity(&alice.serialize())
//!     .unwrap();
//! assert!(identity.validate().is_ok());
//! ```

pub mod error;
pub mod identity;
pub mod local;
pub mod registry;

pub use error::{MspError, Result};
pub use identity::{Identity, IdentityDeserializer, IdentityProvider, SerializedIdentity};
pub use local::{LocalMsp, LocalMspBuilder, SigningIdentity};
pub use registry::{ChannelRegistry, ChannelRegistryBuilder, MspSet};
