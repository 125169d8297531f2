//! This crate contains the types validators attach to their pre-commit
//! votes, and the validation run over them before they are trusted.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod codec;
pub mod commit;
pub mod validation;

use borsh::{BorshDeserialize, BorshSerialize};
use tessera_core::chain::BlockHeight;
use tessera_core::ethereum::{Bloom, EthAddress, I256};

/// The maximum number of bytes a vote extension's free-form
/// `extra_data` field may carry.
pub const MAX_EXTRA_DATA_LEN: usize = 32;

/// The data a validator attaches to its pre-commit vote: its view of the
/// previous block's fee market.
///
/// An *empty payload* (zero bytes on the wire, never an encoded instance
/// of this type) is the abstain value. Verifiers accept it outright and
/// aggregation does not count it towards the quorum.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VoteExtension {
    /// The block height this observation was requested for. Extensions
    /// carrying any other height are not counted at that height.
    pub block_height: BlockHeight,
    /// The base fee observed for the previous block.
    pub base_fee: I256,
    /// The gas consumed by the previous block.
    pub block_gas_used: u64,
    /// The previous block's log bloom filter, when the validator had it
    /// at hand.
    pub logs_bloom: Option<Bloom>,
    /// The resolved address of the previous block's proposer.
    pub miner: EthAddress,
    /// Free-form data, capacity-bounded by [`MAX_EXTRA_DATA_LEN`].
    pub extra_data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use borsh::to_vec;
    use tessera_core::ethereum::BLOOM_SIZE;

    use super::*;

    /// Changing any field must change the encoding, otherwise two
    /// distinct observations could alias each other on the wire.
    #[test]
    fn test_distinct_observations_encode_differently() {
        let base = VoteExtension {
            block_height: BlockHeight(100),
            base_fee: I256::from(7u64),
            block_gas_used: 21_000,
            logs_bloom: Some(Bloom([1u8; BLOOM_SIZE])),
            miner: EthAddress([0xab; 20]),
            extra_data: vec![1, 2, 3],
        };
        let encoded = to_vec(&base).expect("Test failed");

        let variants = [
            VoteExtension {
                block_height: BlockHeight(101),
                ..base.clone()
            },
            VoteExtension {
                base_fee: I256::from(8u64),
                ..base.clone()
            },
            VoteExtension {
                logs_bloom: None,
                ..base.clone()
            },
            VoteExtension {
                extra_data: vec![],
                ..base.clone()
            },
        ];
        for variant in variants {
            assert_ne!(to_vec(&variant).expect("Test failed"), encoded);
        }
    }
}
