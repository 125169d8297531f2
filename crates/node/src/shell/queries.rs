//! Read-only interfaces onto the shell's external collaborators.
//!
//! All chain state consumed by the vote-extension protocol arrives
//! through these traits, supplied per call. The shell never caches or
//! mutates any of it.

use async_trait::async_trait;
use tessera_core::chain::BlockHeight;
use tessera_core::ethereum::{Bloom, EthAddress, I256};
use thiserror::Error;

use crate::shims::abci_types::shim::TxBytes;

/// A failed or timed-out collaborator query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("chain state query failed: {0}")]
pub struct QueryError(pub String);

/// Queries answered by the execution layer. Each one may suspend, fail
/// or time out; callers bound them with a deadline.
#[async_trait]
pub trait ChainStateOracle: Send + Sync {
    /// The base fee observed for the block at the given height.
    async fn base_fee(&self, height: BlockHeight)
        -> Result<I256, QueryError>;

    /// The gas consumed by the last decided block.
    async fn block_gas_used(&self) -> Result<u64, QueryError>;

    /// The last decided block's log bloom filter, when available.
    async fn logs_bloom(&self) -> Result<Option<Bloom>, QueryError>;

    /// Resolve a consensus address to the corresponding chain address.
    async fn resolve_proposer(
        &self,
        consensus_addr: &[u8],
    ) -> Result<EthAddress, QueryError>;
}

/// A consensus validator and its weight at some height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedValidator {
    /// The validator's consensus address.
    pub address: Vec<u8>,
    /// The validator's voting power.
    pub power: u64,
}

/// Queries answered by the staking layer.
pub trait ValidatorSetQueries: Send + Sync {
    /// The consensus validator set active at the given height.
    fn active_validator_set(
        &self,
        height: BlockHeight,
    ) -> Vec<WeightedValidator>;
}

/// Queries answered by the mempool.
pub trait MempoolQueries: Send + Sync {
    /// Pending transactions eligible for the next proposal, bounded by
    /// a total byte budget.
    fn pending_txs(&self, max_bytes: u64) -> Vec<TxBytes>;
}
