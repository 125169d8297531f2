//! Extend pre-commit votes with fee-market observations, verify remote
//! validators' extensions, and validate the aggregate of a height's
//! extended votes.

use std::cmp;
use std::time::Instant;

use data_encoding::HEXUPPER;
use tessera_core::chain::BlockHeight;
use tessera_core::voting_power::FractionalVotingPower;
use tessera_vote_ext::commit::ExtendedCommitInfo;
use tessera_vote_ext::{validation, VoteExtension};

use super::queries::{
    ChainStateOracle, MempoolQueries, QueryError, ValidatorSetQueries,
};
use super::{Error, Result, Shell};
use crate::shims::abci_types::shim::{request, response};

impl<O, V, M> Shell<O, V, M>
where
    O: ChainStateOracle,
    V: ValidatorSetQueries,
    M: MempoolQueries,
{
    /// Produce this validator's vote extension for the requested
    /// height.
    ///
    /// This never fails outward: any internal error degrades to the
    /// empty (abstain) payload, because returning nothing at all would
    /// stall the consensus round. The whole call is bounded by the
    /// earlier of the engine's deadline and the configured timeout, so
    /// a hung collaborator cannot block the round either.
    pub async fn extend_vote(
        &self,
        req: request::ExtendVote,
    ) -> response::ExtendVote {
        if !self.config.enabled {
            return response::ExtendVote::empty();
        }
        let height = match self.decision_height(req.height) {
            Ok(height) => height,
            Err(err) => {
                tracing::error!(%err, "Abstaining from extending the vote");
                return response::ExtendVote::empty();
            }
        };
        if height.0 == 0 {
            tracing::debug!("Not extending a vote at genesis");
            return response::ExtendVote::empty();
        }

        let deadline = cmp::min(
            req.deadline,
            Instant::now() + self.config.extend_timeout,
        );
        let crafted = tokio::time::timeout_at(
            deadline.into(),
            self.craft_extension(height, &req.proposer_address),
        )
        .await;
        let ext = match crafted {
            Ok(Ok(ext)) => ext,
            Ok(Err(err)) => {
                tracing::error!(
                    %height,
                    %err,
                    "Failed to craft a vote extension, abstaining"
                );
                return response::ExtendVote::empty();
            }
            Err(_) => {
                tracing::error!(
                    %height,
                    "Timed out crafting a vote extension, abstaining"
                );
                return response::ExtendVote::empty();
            }
        };

        // self-check with the same validation every peer will run
        if let Err(err) = validation::validate(
            &ext,
            height,
            &self.config.validation_params(),
        ) {
            tracing::error!(
                %height,
                %err,
                "Crafted an invalid vote extension, abstaining"
            );
            return response::ExtendVote::empty();
        }

        response::ExtendVote {
            vote_extension: self.ext_codec.encode(&ext).into(),
        }
    }

    /// Query the collaborators for the data that goes into an
    /// extension. Each query is independently fallible; the caller
    /// bounds all of them with a single deadline.
    async fn craft_extension(
        &self,
        height: BlockHeight,
        proposer_address: &[u8],
    ) -> std::result::Result<VoteExtension, QueryError> {
        let (base_fee, block_gas_used, logs_bloom, miner) = tokio::try_join!(
            self.oracle.base_fee(height),
            self.oracle.block_gas_used(),
            self.oracle.logs_bloom(),
            self.oracle.resolve_proposer(proposer_address),
        )?;
        Ok(VoteExtension {
            block_height: height,
            base_fee,
            block_gas_used,
            logs_bloom,
            miner,
            extra_data: vec![],
        })
    }

    /// Decide whether one remote validator's vote extension is
    /// acceptable for the requested height.
    ///
    /// Shape-only: the payload is decoded and checked against the
    /// height and the field invariants, but no external source is
    /// consulted. This runs once per remote pre-commit, possibly
    /// concurrently across votes, so it must stay cheap.
    pub fn verify_vote_extension(
        &self,
        req: request::VerifyVoteExtension,
    ) -> response::VerifyVoteExtension {
        if req.vote_extension.is_empty() {
            // an abstaining validator is always acceptable
            return response::VerifyVoteExtension::Accept;
        }
        let validator = HEXUPPER.encode(&req.validator_address);
        let height = match self.decision_height(req.height) {
            Ok(height) => height,
            Err(err) => {
                tracing::debug!(
                    %validator,
                    %err,
                    "Rejecting vote extension at an invalid height"
                );
                return response::VerifyVoteExtension::Reject;
            }
        };
        let ext = match self.ext_codec.decode(&req.vote_extension) {
            Ok(ext) => ext,
            Err(err) => {
                tracing::debug!(
                    %height,
                    %validator,
                    %err,
                    "Rejecting undecodable vote extension"
                );
                return response::VerifyVoteExtension::Reject;
            }
        };
        match validation::validate(
            &ext,
            height,
            &self.config.validation_params(),
        ) {
            Ok(()) => response::VerifyVoteExtension::Accept,
            Err(err) => {
                tracing::debug!(
                    %height,
                    %validator,
                    %err,
                    "Rejecting invalid vote extension"
                );
                response::VerifyVoteExtension::Reject
            }
        }
    }

    /// Validate the aggregate of a height's extended votes: every
    /// non-empty extension must be well formed, and the voting power
    /// behind the counted ones must be a Byzantine supermajority of the
    /// validator set active at `height`.
    ///
    /// An extension that is valid except for carrying a stale height is
    /// counted as absent rather than poisoning the aggregate: lagging
    /// honest validators lower the tally, they do not halt it. A
    /// structurally malformed extension inside an already-signed commit
    /// means a codec mismatch or a misbehaving peer, and rejects the
    /// whole aggregate.
    ///
    /// Idempotent; reads no mutable state.
    pub fn validate_extended_commit(
        &self,
        height: BlockHeight,
        commit: &ExtendedCommitInfo,
    ) -> Result<()> {
        let params = self.config.validation_params();
        let mut counted_power: u64 = 0;

        for vote in &commit.votes {
            if !vote.did_commit() || vote.vote_extension.is_empty() {
                continue;
            }
            let validator = HEXUPPER.encode(&vote.validator.address);
            let ext = self
                .ext_codec
                .decode(&vote.vote_extension)
                .map_err(|error| {
                    tracing::warn!(
                        %height,
                        %validator,
                        %error,
                        "Extended commit carries an undecodable vote \
                         extension"
                    );
                    Error::ExtensionDecoding {
                        validator: validator.clone(),
                        error,
                    }
                })?;
            match validation::validate(&ext, height, &params) {
                Ok(()) => {
                    counted_power = counted_power
                        .checked_add(vote.validator.power)
                        .ok_or(Error::VotingPowerOverflow)?;
                }
                Err(error) if error.is_stale_height() => {
                    tracing::debug!(
                        %height,
                        %validator,
                        %error,
                        "Treating stale vote extension as absent"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        %height,
                        %validator,
                        %error,
                        "Extended commit carries an invalid vote extension"
                    );
                    return Err(Error::InvalidVoteExtension {
                        validator,
                        error,
                    });
                }
            }
        }

        let mut total_power: u64 = 0;
        for validator in self.validator_sets.active_validator_set(height) {
            total_power = total_power
                .checked_add(validator.power)
                .ok_or(Error::VotingPowerOverflow)?;
        }

        let tallied = FractionalVotingPower::new(counted_power, total_power)
            .map_err(Error::VotingPower)?;
        if tallied > FractionalVotingPower::TWO_THIRDS {
            Ok(())
        } else {
            tracing::warn!(
                %height,
                %tallied,
                "Vote extensions are backed by insufficient voting power"
            );
            Err(Error::InsufficientVotingPower {
                got: counted_power,
                total: total_power,
            })
        }
    }
}
