//! Hook for semantic validation of configuration transactions.

use txgate_core::Header;

/// Validates the content of a CONFIG envelope.
///
/// The pipeline only checks that a config envelope is well-formed and
/// signed; everything about the update itself is up to the processor.
pub trait ConfigTxProcessor: Send + Sync {
    /// Accept or reject `data`. The error is a human-readable reason.
    fn process(&self, data: &[u8], header: &Header) -> Result<(), String>;
}

/// Accepts every configuration transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllConfig;

impl ConfigTxProcessor for AcceptAllConfig {
    fn process(&self, _data: &[u8], _header: &Header) -> Result<(), String> {
        Ok(())
    }
}

impl<F> ConfigTxProcessor for F
where
    F: Fn(&[u8], &Header) -> Result<(), String> + Send + Sync,
{
    fn process(&self, data: &[u8], header: &Header) -> Result<(), String> {
        self(data, header)
    }
}
