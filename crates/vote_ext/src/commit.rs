//! The aggregate of all validators' votes and vote extensions for one
//! height/round.
//!
//! Instances are handed to us transiently by the consensus engine: built
//! once per height, consumed once by commit validation, then discarded.
//! Nothing here is ever persisted.

use borsh::{BorshDeserialize, BorshSerialize};

/// How a validator's last-block vote relates to the block that was
/// ultimately decided.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize,
)]
pub enum BlockIdFlag {
    /// The validator did not vote.
    Absent,
    /// The validator voted for the decided block.
    Commit,
    /// The validator voted nil.
    Nil,
}

/// A validator's consensus identity and weight.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ValidatorInfo {
    /// The validator's consensus address.
    pub address: Vec<u8>,
    /// The validator's voting power.
    pub power: u64,
}

/// One validator's vote for a height, paired with its raw vote
/// extension payload.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VoteInfo {
    /// Who cast this vote.
    pub validator: ValidatorInfo,
    /// The raw extension payload. Zero-length means the validator
    /// abstained from extending its vote.
    pub vote_extension: Vec<u8>,
    /// Whether this vote agreed with the decided block.
    pub block_id_flag: BlockIdFlag,
}

impl VoteInfo {
    /// Whether this vote counts towards the decided block's commit.
    #[inline]
    pub fn did_commit(&self) -> bool {
        self.block_id_flag == BlockIdFlag::Commit
    }
}

/// The full set of votes and extensions for one height/round.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ExtendedCommitInfo {
    /// The consensus round the commit was formed in.
    pub round: u32,
    /// Every validator's vote for this height.
    pub votes: Vec<VoteInfo>,
}

#[cfg(test)]
mod tests {
    use borsh::{to_vec, BorshDeserialize};

    use super::*;

    #[test]
    fn test_extended_commit_round_trip() {
        let commit = ExtendedCommitInfo {
            round: 3,
            votes: vec![
                VoteInfo {
                    validator: ValidatorInfo {
                        address: vec![1; 20],
                        power: 100,
                    },
                    vote_extension: vec![0xde, 0xad],
                    block_id_flag: BlockIdFlag::Commit,
                },
                VoteInfo {
                    validator: ValidatorInfo {
                        address: vec![2; 20],
                        power: 50,
                    },
                    vote_extension: vec![],
                    block_id_flag: BlockIdFlag::Absent,
                },
            ],
        };
        let encoded = to_vec(&commit).expect("Test failed");
        let decoded = ExtendedCommitInfo::try_from_slice(&encoded)
            .expect("Test failed");
        assert_eq!(decoded, commit);
    }

    #[test]
    fn test_did_commit() {
        let mut vote = VoteInfo {
            validator: ValidatorInfo {
                address: vec![1; 20],
                power: 1,
            },
            vote_extension: vec![],
            block_id_flag: BlockIdFlag::Commit,
        };
        assert!(vote.did_commit());
        vote.block_id_flag = BlockIdFlag::Nil;
        assert!(!vote.did_commit());
        vote.block_id_flag = BlockIdFlag::Absent;
        assert!(!vote.did_commit());
    }
}
