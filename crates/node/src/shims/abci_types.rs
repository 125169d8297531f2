//! The request and response payloads exchanged with the consensus
//! engine.
//!
//! The engine's own wire types never reach the shell: the embedding
//! application converts them to the structs below at the edge, which is
//! what keeps the protocol logic engine-agnostic. Engine block heights
//! stay `i64` here and are checked into [`BlockHeight`] inside the
//! handlers.
//!
//! [`BlockHeight`]: tessera_core::chain::BlockHeight

/// The payload types the shell speaks.
pub mod shim {
    /// Raw transaction bytes.
    pub type TxBytes = bytes::Bytes;

    /// Custom types for request payloads.
    pub mod request {
        use std::time::Instant;

        use tessera_vote_ext::commit::ExtendedCommitInfo;

        use super::TxBytes;

        /// A request to produce this validator's vote extension for the
        /// given height. Issued once per height, on validators only.
        #[derive(Debug, Clone)]
        pub struct ExtendVote {
            /// The height being voted on.
            pub height: i64,
            /// The consensus address of the block's proposer.
            pub proposer_address: Vec<u8>,
            /// The engine's deadline for answering this request.
            pub deadline: Instant,
        }

        /// A request to judge one remote validator's vote extension.
        /// Issued once per remote pre-commit received.
        #[derive(Debug, Clone)]
        pub struct VerifyVoteExtension {
            /// The height the extension claims to be for.
            pub height: i64,
            /// The consensus address of the validator that sent it.
            pub validator_address: Vec<u8>,
            /// The raw extension payload.
            pub vote_extension: TxBytes,
        }

        /// A request to build the block proposal for a height. Issued
        /// when this validator is the round's proposer.
        #[derive(Debug, Clone)]
        pub struct PrepareProposal {
            /// The height being proposed.
            pub height: i64,
            /// Our own consensus address.
            pub proposer_address: Vec<u8>,
            /// The byte budget for the whole transaction list.
            pub max_tx_bytes: u64,
            /// The previous height's votes and extensions, as collected
            /// by the engine.
            pub local_last_commit: Option<ExtendedCommitInfo>,
        }

        /// A request to judge a received block proposal before voting
        /// on it. Issued on every validator.
        #[derive(Debug, Clone)]
        pub struct ProcessProposal {
            /// The proposal's declared height.
            pub height: i64,
            /// The consensus address of the proposer.
            pub proposer_address: Vec<u8>,
            /// The proposed transaction list.
            pub txs: Vec<TxBytes>,
        }
    }

    /// Custom types for response payloads.
    pub mod response {
        use super::TxBytes;

        /// This validator's extension payload, possibly empty.
        #[derive(Debug, Clone, Default)]
        pub struct ExtendVote {
            /// The encoded payload. Zero-length means we abstained.
            pub vote_extension: TxBytes,
        }

        impl ExtendVote {
            /// The abstain response.
            pub fn empty() -> Self {
                Self::default()
            }
        }

        /// The verdict over one remote vote extension.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum VerifyVoteExtension {
            /// The extension may be counted for its height.
            Accept,
            /// The extension must not enter the commit.
            Reject,
        }

        /// The transaction list this node proposes.
        #[derive(Debug, Clone, Default)]
        pub struct PrepareProposal {
            /// Ordered transactions, injected slots first.
            pub txs: Vec<TxBytes>,
        }

        /// The verdict over a received block proposal.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ProcessProposal {
            /// Vote for this proposal.
            Accept,
            /// Vote against this proposal.
            Reject,
        }
    }
}
