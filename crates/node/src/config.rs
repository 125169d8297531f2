//! Static node configuration.

use std::time::Duration;

use tessera_vote_ext::validation::ValidationParams;

/// Vote-extension behavior for this chain, supplied once by the
/// embedding application when the shell is constructed. Immutable for
/// the lifetime of the node.
#[derive(Debug, Clone)]
pub struct VoteExtensionsConfig {
    /// Whether validated fee observations are carried into block
    /// proposals on this chain.
    pub enabled: bool,
    /// Upper bound on the wall time `extend_vote` may spend querying
    /// its collaborators, regardless of the deadline the consensus
    /// engine hands us.
    pub extend_timeout: Duration,
    /// Treat a zero block-gas observation as invalid.
    pub reject_zero_block_gas: bool,
}

impl Default for VoteExtensionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extend_timeout: Duration::from_millis(500),
            reject_zero_block_gas: false,
        }
    }
}

impl VoteExtensionsConfig {
    /// The per-field validation knobs derived from this configuration.
    pub fn validation_params(&self) -> ValidationParams {
        ValidationParams {
            reject_zero_block_gas: self.reject_zero_block_gas,
        }
    }
}
