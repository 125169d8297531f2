//! Stateless validation of decoded vote extensions.

use tessera_core::chain::BlockHeight;
use thiserror::Error;

use crate::{VoteExtension, MAX_EXTRA_DATA_LEN};

/// The reason a decoded vote extension was deemed invalid. The first
/// violated invariant wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteExtensionError {
    /// The extension was issued for a height other than the one under
    /// verification.
    #[error(
        "The vote extension was issued for block height {got}, while \
         verifying height {expected}"
    )]
    UnexpectedBlockHeight {
        /// The height under verification.
        expected: BlockHeight,
        /// The height carried inside the extension.
        got: BlockHeight,
    },
    /// No block has been decided at height 0, so no observation can
    /// legitimately refer to it.
    #[error("The vote extension was issued at genesis")]
    IssuedAtGenesis,
    /// The observed base fee is negative.
    #[error("The vote extension carries a negative base fee")]
    NegativeBaseFee,
    /// The observed block gas used is zero, on a chain configured to
    /// treat that as invalid.
    #[error("The vote extension carries a block gas used of zero")]
    ZeroBlockGasUsed,
    /// The miner address is the all-zeroes address.
    #[error("The vote extension carries an all-zeroes miner address")]
    ZeroMinerAddress,
    /// The free-form extra data exceeds its capacity bound.
    #[error(
        "The vote extension carries {got} bytes of extra data, the \
         maximum is {MAX_EXTRA_DATA_LEN}"
    )]
    OversizedExtraData {
        /// The length found on the wire.
        got: usize,
    },
}

/// Knobs for the per-field checks.
///
/// `reject_zero_block_gas` is off by default: an empty block legitimately
/// burns zero gas, so a zero observation is only an error on chains that
/// explicitly opt in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationParams {
    /// Treat a zero `block_gas_used` observation as invalid.
    pub reject_zero_block_gas: bool,
}

/// Check the per-field invariants of a decoded extension. Pure; no I/O.
pub fn validate_fields(
    ext: &VoteExtension,
    params: &ValidationParams,
) -> Result<(), VoteExtensionError> {
    if ext.base_fee.is_negative() {
        return Err(VoteExtensionError::NegativeBaseFee);
    }
    if params.reject_zero_block_gas && ext.block_gas_used == 0 {
        return Err(VoteExtensionError::ZeroBlockGasUsed);
    }
    if ext.miner.is_zero() {
        return Err(VoteExtensionError::ZeroMinerAddress);
    }
    if ext.extra_data.len() > MAX_EXTRA_DATA_LEN {
        return Err(VoteExtensionError::OversizedExtraData {
            got: ext.extra_data.len(),
        });
    }
    Ok(())
}

/// Check a decoded extension against the height under verification, then
/// its per-field invariants.
///
/// The height equality check is the replay defense: an extension signed
/// for some other height must never be counted at this one.
pub fn validate(
    ext: &VoteExtension,
    expected_height: BlockHeight,
    params: &ValidationParams,
) -> Result<(), VoteExtensionError> {
    if ext.block_height != expected_height {
        return Err(VoteExtensionError::UnexpectedBlockHeight {
            expected: expected_height,
            got: ext.block_height,
        });
    }
    if expected_height.0 == 0 {
        return Err(VoteExtensionError::IssuedAtGenesis);
    }
    validate_fields(ext, params)
}

impl VoteExtensionError {
    /// Whether this failure only says the extension belongs to a
    /// different height, as opposed to being structurally malformed.
    ///
    /// Stale-height extensions from honest-but-lagging validators are
    /// treated as absent during commit aggregation; structural
    /// violations are not forgiven anywhere.
    pub fn is_stale_height(&self) -> bool {
        matches!(
            self,
            VoteExtensionError::UnexpectedBlockHeight { .. }
                | VoteExtensionError::IssuedAtGenesis
        )
    }
}
