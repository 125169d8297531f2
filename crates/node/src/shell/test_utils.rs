//! Test utilities for the shell.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tessera_core::chain::BlockHeight;
use tessera_core::ethereum::{Bloom, EthAddress, I256};
use tessera_vote_ext::codec::{BorshCodec, VoteExtensionCodec};
use tessera_vote_ext::commit::{
    BlockIdFlag, ExtendedCommitInfo, ValidatorInfo, VoteInfo,
};
use tessera_vote_ext::VoteExtension;

use super::queries::{
    ChainStateOracle, MempoolQueries, QueryError, ValidatorSetQueries,
    WeightedValidator,
};
use super::Shell;
use crate::config::VoteExtensionsConfig;
use crate::shims::abci_types::shim::TxBytes;

/// The base fee the mock oracle reports.
pub const ORACLE_BASE_FEE: u64 = 1_000_000_000;
/// The block gas the mock oracle reports.
pub const ORACLE_GAS_USED: u64 = 8_500_000;
/// The proposer address the mock oracle resolves to.
pub const ORACLE_MINER: [u8; 20] = [0xaa; 20];

/// An execution-layer oracle whose answers, failures and latency are
/// all scripted by the test.
pub struct MockOracle {
    /// The base fee to report.
    pub base_fee: I256,
    /// The block gas to report.
    pub block_gas_used: u64,
    /// The bloom filter to report.
    pub logs_bloom: Option<Bloom>,
    /// The resolved proposer address to report.
    pub miner: EthAddress,
    /// Fail every query.
    pub fail: bool,
    /// Stall every query for this long before answering.
    pub delay: Option<Duration>,
}

impl Default for MockOracle {
    fn default() -> Self {
        Self {
            base_fee: I256::from(ORACLE_BASE_FEE),
            block_gas_used: ORACLE_GAS_USED,
            logs_bloom: None,
            miner: EthAddress(ORACLE_MINER),
            fail: false,
            delay: None,
        }
    }
}

impl MockOracle {
    async fn answer<T>(&self, value: T) -> Result<T, QueryError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            Err(QueryError("the mock oracle was asked to fail".into()))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl ChainStateOracle for MockOracle {
    async fn base_fee(
        &self,
        _height: BlockHeight,
    ) -> Result<I256, QueryError> {
        self.answer(self.base_fee).await
    }

    async fn block_gas_used(&self) -> Result<u64, QueryError> {
        self.answer(self.block_gas_used).await
    }

    async fn logs_bloom(&self) -> Result<Option<Bloom>, QueryError> {
        self.answer(self.logs_bloom).await
    }

    async fn resolve_proposer(
        &self,
        _consensus_addr: &[u8],
    ) -> Result<EthAddress, QueryError> {
        self.answer(self.miner).await
    }
}

/// A fixed validator set for every height.
pub struct TestValidatorSet {
    /// The validators to report at every height.
    pub validators: Vec<WeightedValidator>,
}

impl ValidatorSetQueries for TestValidatorSet {
    fn active_validator_set(
        &self,
        _height: BlockHeight,
    ) -> Vec<WeightedValidator> {
        self.validators.clone()
    }
}

/// A mempool holding whatever the test puts in it.
pub struct TestMempool {
    /// The pending transactions to report.
    pub txs: Vec<TxBytes>,
}

impl MempoolQueries for TestMempool {
    fn pending_txs(&self, _max_bytes: u64) -> Vec<TxBytes> {
        self.txs.clone()
    }
}

/// A shell over scripted collaborators.
pub type TestShell = Shell<MockOracle, TestValidatorSet, TestMempool>;

/// A shell over four equal-power validators.
pub fn setup() -> TestShell {
    setup_with_powers(&[1, 1, 1, 1])
}

/// A shell whose validator set carries the given powers, one validator
/// per entry, addressed `[i; 20]`.
pub fn setup_with_powers(powers: &[u64]) -> TestShell {
    let validators = powers
        .iter()
        .enumerate()
        .map(|(i, &power)| WeightedValidator {
            address: vec![u8::try_from(i).expect("Test failed"); 20],
            power,
        })
        .collect();
    Shell::new(
        VoteExtensionsConfig::default(),
        MockOracle::default(),
        TestValidatorSet { validators },
        TestMempool { txs: vec![] },
        Box::new(BorshCodec),
        Box::new(BorshCodec),
    )
}

/// An engine deadline far enough away that only the configured timeout
/// binds.
pub fn engine_deadline() -> Instant {
    Instant::now() + Duration::from_secs(10)
}

/// A well-formed extension observed at the given height.
pub fn extension_at(height: BlockHeight) -> VoteExtension {
    VoteExtension {
        block_height: height,
        base_fee: I256::from(ORACLE_BASE_FEE),
        block_gas_used: ORACLE_GAS_USED,
        logs_bloom: None,
        miner: EthAddress(ORACLE_MINER),
        extra_data: vec![],
    }
}

/// A commit-flagged vote from validator `[validator_idx; 20]`, carrying
/// the given extension, or abstaining.
pub fn vote_for(
    validator_idx: u8,
    power: u64,
    ext: Option<VoteExtension>,
) -> VoteInfo {
    VoteInfo {
        validator: ValidatorInfo {
            address: vec![validator_idx; 20],
            power,
        },
        vote_extension: ext
            .map(|ext| BorshCodec.encode(&ext))
            .unwrap_or_default(),
        block_id_flag: BlockIdFlag::Commit,
    }
}

/// Wrap votes in an [`ExtendedCommitInfo`] for round 0.
pub fn commit_of(votes: Vec<VoteInfo>) -> ExtendedCommitInfo {
    ExtendedCommitInfo { round: 0, votes }
}
