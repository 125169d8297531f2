//! Implementation of the proposal-building side of the shell.

use tessera_core::chain::BlockHeight;
use tessera_vote_ext::commit::ExtendedCommitInfo;

use super::block_alloc::{AllocFailure, TxBin};
use super::queries::{
    ChainStateOracle, MempoolQueries, ValidatorSetQueries,
};
use super::Shell;
use crate::shims::abci_types::shim::{request, response, TxBytes};

impl<O, V, M> Shell<O, V, M>
where
    O: ChainStateOracle,
    V: ValidatorSetQueries,
    M: MempoolQueries,
{
    /// Begin a new block.
    ///
    /// The proposal is laid out with the validated extended commit of
    /// the previous height in the first slot (when the chain carries
    /// extensions), followed by mempool transactions under the
    /// engine's byte budget.
    ///
    /// Failures only ever shrink the proposal. An empty block is
    /// always safer than no block.
    pub fn prepare_proposal(
        &self,
        req: request::PrepareProposal,
    ) -> response::PrepareProposal {
        let height = match self.decision_height(req.height) {
            Ok(height) => height,
            Err(err) => {
                tracing::error!(
                    %err,
                    "Proposing an empty block at an invalid height"
                );
                return response::PrepareProposal::default();
            }
        };

        let mut alloc = TxBin::init(req.max_tx_bytes);
        let mut txs = Vec::new();

        if let Some(commit_tx) =
            self.injected_commit(height, req.local_last_commit.as_ref())
        {
            match alloc.try_dump(&commit_tx) {
                Ok(()) => txs.push(commit_tx),
                Err(failure) => {
                    tracing::warn!(
                        %height,
                        ?failure,
                        "Dropping the extended commit from the current \
                         proposal"
                    );
                }
            }
        }
        self.build_normal_txs(&mut alloc, height, &mut txs);

        tracing::info!(
            %height,
            num_of_txs = txs.len(),
            "Proposing block"
        );

        response::PrepareProposal { txs }
    }

    /// The encoded extended commit to inject ahead of ordinary
    /// transactions, when there is one worth carrying.
    fn injected_commit(
        &self,
        height: BlockHeight,
        last_commit: Option<&ExtendedCommitInfo>,
    ) -> Option<TxBytes> {
        if !self.config.enabled {
            return None;
        }
        let prev = match height.prev_height() {
            // no vote was ever extended before the first decided block
            Some(prev) if prev.0 > 0 => prev,
            _ => return None,
        };
        let commit = match last_commit {
            Some(commit) => commit,
            None => {
                tracing::warn!(
                    %height,
                    "The engine collected no extended commit for the \
                     previous height"
                );
                return None;
            }
        };
        match self.validate_extended_commit(prev, commit) {
            Ok(()) => Some(self.commit_codec.encode(commit).into()),
            Err(err) => {
                tracing::warn!(
                    %height,
                    %err,
                    "Not injecting an extended commit that failed \
                     validation"
                );
                None
            }
        }
    }

    /// Fill the remaining block space from the mempool.
    fn build_normal_txs(
        &self,
        alloc: &mut TxBin,
        height: BlockHeight,
        txs: &mut Vec<TxBytes>,
    ) {
        for tx in self.mempool.pending_txs(alloc.free_space()) {
            match alloc.try_dump(&tx) {
                Ok(()) => txs.push(tx),
                Err(AllocFailure::Rejected { bin_space_left }) => {
                    tracing::debug!(
                        %height,
                        bin_space_left,
                        "Dropping tx from the current proposal"
                    );
                    break;
                }
                Err(AllocFailure::OverflowsBin { bin_size }) => {
                    tracing::warn!(
                        %height,
                        bin_size,
                        "Dropping large tx from the current proposal"
                    );
                }
            }
        }
    }
}
