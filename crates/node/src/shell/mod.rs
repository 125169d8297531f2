//! The shell connects the consensus engine to the vote-extension
//! protocol: it extends this validator's votes, verifies remote
//! extensions, validates the aggregate commit, and carries the
//! validated aggregate into the next block proposal.

mod block_alloc;
pub mod prepare_proposal;
pub mod process_proposal;
pub mod queries;
#[cfg(test)]
pub mod test_utils;
pub mod vote_extensions;

use tessera_core::chain::BlockHeight;
use tessera_vote_ext::codec::{
    DecodeError, ExtendedCommitCodec, VoteExtensionCodec,
};
use tessera_vote_ext::validation::VoteExtensionError;
use thiserror::Error;

use crate::config::VoteExtensionsConfig;
use self::queries::{ChainStateOracle, MempoolQueries, ValidatorSetQueries};

#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("The consensus engine sent an invalid height {0}: {1}")]
    InvalidHeight(i64, String),
    #[error("Error decoding an injected extended commit: {0}")]
    CommitDecoding(DecodeError),
    #[error(
        "Error decoding the vote extension of validator {validator}: {error}"
    )]
    ExtensionDecoding {
        validator: String,
        error: DecodeError,
    },
    #[error("Invalid vote extension from validator {validator}: {error}")]
    InvalidVoteExtension {
        validator: String,
        error: VoteExtensionError,
    },
    #[error(
        "Vote extensions carry no supermajority: counted voting power \
         {got} of {total}"
    )]
    InsufficientVotingPower { got: u64, total: u64 },
    #[error("Voting power overflowed while tallying")]
    VotingPowerOverflow,
    #[error("Invalid voting power fraction: {0}")]
    VotingPower(eyre::Report),
    #[error(
        "The proposal for height {0} is missing its extended commit slot"
    )]
    MissingCommitSlot(BlockHeight),
}

/// Shell result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The vote-extension shell. One instance lives for the lifetime of the
/// node; all of its state is read-only configuration and injected
/// collaborators, so handler calls never contend with each other.
pub struct Shell<O, V, M>
where
    O: ChainStateOracle,
    V: ValidatorSetQueries,
    M: MempoolQueries,
{
    /// Chain-level vote-extension configuration.
    pub(crate) config: VoteExtensionsConfig,
    /// The execution-layer oracle extensions are built from.
    pub(crate) oracle: O,
    /// The staking layer's view of the validator sets.
    pub(crate) validator_sets: V,
    /// Pending transactions for block building.
    pub(crate) mempool: M,
    /// Wire format for a single extension payload.
    pub(crate) ext_codec: Box<dyn VoteExtensionCodec>,
    /// Wire format for the injected commit aggregate.
    pub(crate) commit_codec: Box<dyn ExtendedCommitCodec>,
}

impl<O, V, M> Shell<O, V, M>
where
    O: ChainStateOracle,
    V: ValidatorSetQueries,
    M: MempoolQueries,
{
    /// Create a new shell, wiring in all collaborators. The codecs must
    /// be the same pair on every node of the chain.
    pub fn new(
        config: VoteExtensionsConfig,
        oracle: O,
        validator_sets: V,
        mempool: M,
        ext_codec: Box<dyn VoteExtensionCodec>,
        commit_codec: Box<dyn ExtendedCommitCodec>,
    ) -> Self {
        Self {
            config,
            oracle,
            validator_sets,
            mempool,
            ext_codec,
            commit_codec,
        }
    }

    /// Check an engine-supplied height into our own representation.
    pub(crate) fn decision_height(&self, raw: i64) -> Result<BlockHeight> {
        BlockHeight::try_from(raw)
            .map_err(|err| Error::InvalidHeight(raw, err))
    }
}
