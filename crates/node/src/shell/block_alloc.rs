//! Primitives that facilitate keeping track of the number of bytes
//! utilized by the current block proposal.
//!
//! This is important, because the consensus engine places an upper
//! bound on the size of a block, rejecting proposals whose size exceeds
//! the budget it hands to `prepare_proposal`.

/// Allotted space for a batch of transactions in some proposed block,
/// measured in bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TxBin {
    /// The current space utilized by the batch of transactions.
    occupied_space_in_bytes: u64,
    /// The maximum space the batch of transactions may occupy.
    allotted_space_in_bytes: u64,
}

/// Error returned by [`TxBin::try_dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocFailure {
    /// The transaction does not fit in the space left in the bin; it
    /// can only be included in an upcoming block.
    ///
    /// We return the remaining space in the bin for logging purposes.
    Rejected {
        /// Remaining bin space.
        bin_space_left: u64,
    },
    /// The transaction is bigger than the whole bin, so it needs to be
    /// handled separately from a regular allocation failure.
    ///
    /// We return the total bin space for logging purposes.
    OverflowsBin {
        /// Total bin space.
        bin_size: u64,
    },
}

impl TxBin {
    /// Construct a new [`TxBin`] over the given byte budget.
    pub const fn init(max_bytes: u64) -> Self {
        Self {
            occupied_space_in_bytes: 0,
            allotted_space_in_bytes: max_bytes,
        }
    }

    /// The amount of bytes still available in this bin.
    pub fn free_space(&self) -> u64 {
        self.allotted_space_in_bytes - self.occupied_space_in_bytes
    }

    /// Try to dump a new transaction into this [`TxBin`].
    pub fn try_dump(&mut self, tx: &[u8]) -> Result<(), AllocFailure> {
        let tx_len = tx.len() as u64;
        if tx_len > self.allotted_space_in_bytes {
            return Err(AllocFailure::OverflowsBin {
                bin_size: self.allotted_space_in_bytes,
            });
        }
        let occupied = self
            .occupied_space_in_bytes
            .checked_add(tx_len)
            .expect("bin space must not overflow");
        if occupied <= self.allotted_space_in_bytes {
            self.occupied_space_in_bytes = occupied;
            Ok(())
        } else {
            Err(AllocFailure::Rejected {
                bin_space_left: self.free_space(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_fills_up() {
        let mut bin = TxBin::init(10);
        assert_eq!(bin.try_dump(&[0; 6]), Ok(()));
        assert_eq!(bin.free_space(), 4);
        assert_eq!(
            bin.try_dump(&[0; 5]),
            Err(AllocFailure::Rejected { bin_space_left: 4 })
        );
        assert_eq!(bin.try_dump(&[0; 4]), Ok(()));
        assert_eq!(bin.free_space(), 0);
    }

    #[test]
    fn test_oversized_tx_overflows_bin() {
        let mut bin = TxBin::init(10);
        assert_eq!(
            bin.try_dump(&[0; 11]),
            Err(AllocFailure::OverflowsBin { bin_size: 10 })
        );
        // an overflow does not consume any space
        assert_eq!(bin.free_space(), 10);
    }

    #[test]
    fn test_empty_tx_always_fits() {
        let mut bin = TxBin::init(0);
        assert_eq!(bin.try_dump(&[]), Ok(()));
    }
}
