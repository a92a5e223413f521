//! Channel-scoped identity resolution.

use std::collections::HashMap;
use std::sync::Arc;

use txgate_core::decode;

use crate::error::{MspError, Result};
use crate::identity::{Identity, IdentityDeserializer, IdentityProvider, SerializedIdentity};
use crate::local::LocalMsp;

/// The membership services of one channel's organizations.
///
/// Dispatches each identity to the service named by its `msp_id`.
#[derive(Debug, Clone, Default)]
pub struct MspSet {
    services: HashMap<String, LocalMsp>,
}

impl MspSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an organization's service, replacing any with the same id.
    pub fn with(mut self, msp: LocalMsp) -> Self {
        self.services.insert(msp.msp_id().to_owned(), msp);
        self
    }
}

impl IdentityDeserializer for MspSet {
    /// Fails with [`MspError::UnknownMsp`] when the named msp has no service
    /// here. Without a service there is no key material to build an identity
    /// from, so this is a deserialization failure rather than a failed
    /// validation.
    fn deserialize_identity(&self, bytes: &[u8]) -> Result<Box<dyn Identity>> {
        let identity: SerializedIdentity = decode(bytes)?;
        let msp = self
            .services
            .get(&identity.msp_id)
            .ok_or_else(|| MspError::UnknownMsp(identity.msp_id.clone()))?;
        msp.resolve(identity)
    }
}

/// Immutable `channel_id -> deserializer` map.
///
/// Passed explicitly to validators. Lookups take no locks.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, Arc<dyn IdentityDeserializer>>,
}

impl ChannelRegistry {
    pub fn builder() -> ChannelRegistryBuilder {
        ChannelRegistryBuilder {
            channels: HashMap::new(),
        }
    }

    /// Ids of all registered channels.
    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }
}

impl IdentityProvider for ChannelRegistry {
    fn deserializer(&self, channel_id: &str) -> Option<Arc<dyn IdentityDeserializer>> {
        self.channels.get(channel_id).cloned()
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`ChannelRegistry`].
pub struct ChannelRegistryBuilder {
    channels: HashMap<String, Arc<dyn IdentityDeserializer>>,
}

impl ChannelRegistryBuilder {
    /// Register a channel's deserializer.
    pub fn channel(
        mut self,
        channel_id: impl Into<String>,
        deserializer: impl IdentityDeserializer + 'static,
    ) -> Self {
        let channel_id = channel_id.into();
        tracing::debug!(channel = %channel_id, "registering channel identity deserializer");
        self.channels.insert(channel_id, Arc::new(deserializer));
        self
    }

    pub fn build(self) -> ChannelRegistry {
        ChannelRegistry {
            channels: self.channels,
        }
    }
}
