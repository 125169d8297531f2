//! Implementation of the proposal-checking side of the shell.

use data_encoding::HEXUPPER;

use super::queries::{
    ChainStateOracle, MempoolQueries, ValidatorSetQueries,
};
use super::{Error, Result, Shell};
use crate::shims::abci_types::shim::{request, response};

impl<O, V, M> Shell<O, V, M>
where
    O: ChainStateOracle,
    V: ValidatorSetQueries,
    M: MempoolQueries,
{
    /// Check a received block proposal before voting on it.
    ///
    /// On chains that carry vote extensions, the first slot of the
    /// proposal must hold the previous height's extended commit, and
    /// that commit must re-validate here: voting for a proposal whose
    /// aggregate we cannot verify would mean trusting unverified data.
    pub fn process_proposal(
        &self,
        req: request::ProcessProposal,
    ) -> response::ProcessProposal {
        match self.check_proposal(&req) {
            Ok(()) => response::ProcessProposal::Accept,
            Err(err) => {
                tracing::warn!(
                    proposer = ?HEXUPPER.encode(&req.proposer_address),
                    height = req.height,
                    %err,
                    "Rejecting block proposal"
                );
                response::ProcessProposal::Reject
            }
        }
    }

    /// Errors on anything that must reject the whole proposal.
    fn check_proposal(
        &self,
        req: &request::ProcessProposal,
    ) -> Result<()> {
        let height = self.decision_height(req.height)?;
        if height.0 == 0 {
            return Err(Error::InvalidHeight(
                req.height,
                "blocks are never proposed at genesis".into(),
            ));
        }
        if !self.config.enabled {
            // ordinary transaction semantics are not ours to judge
            return Ok(());
        }
        let prev = match height.prev_height() {
            Some(prev) if prev.0 > 0 => prev,
            // no vote was ever extended before the first decided block
            _ => return Ok(()),
        };
        let first_slot =
            req.txs.first().ok_or(Error::MissingCommitSlot(height))?;
        let commit = self
            .commit_codec
            .decode(first_slot)
            .map_err(Error::CommitDecoding)?;
        self.validate_extended_commit(prev, &commit)
    }
}
