//! Fractions of the total voting power of a validator set.

use std::fmt::Display;

use eyre::{eyre, Result};
use num_rational::Ratio;

/// A fraction of the total voting power. This should always be a reduced
/// fraction that is between zero and one inclusive.
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Debug)]
pub struct FractionalVotingPower(Ratio<u64>);

impl FractionalVotingPower {
    /// Null voting power.
    pub const NULL: FractionalVotingPower =
        FractionalVotingPower(Ratio::new_raw(0, 1));
    /// The Byzantine fault tolerance threshold. A quorum is only reached
    /// with voting power *strictly greater* than this fraction.
    pub const TWO_THIRDS: FractionalVotingPower =
        FractionalVotingPower(Ratio::new_raw(2, 3));

    /// Create a new [`FractionalVotingPower`]. It must be between zero and
    /// one inclusive.
    pub fn new(numer: u64, denom: u64) -> Result<Self> {
        if denom == 0 {
            return Err(eyre!("denominator can't be zero"));
        }
        let ratio: Ratio<u64> = (numer, denom).into();
        if ratio > 1.into() {
            return Err(eyre!(
                "fractional voting power cannot be greater than one"
            ));
        }
        Ok(Self(ratio))
    }
}

impl From<&FractionalVotingPower> for (u64, u64) {
    fn from(ratio: &FractionalVotingPower) -> Self {
        (ratio.0.numer().to_owned(), ratio.0.denom().to_owned())
    }
}

impl Display for FractionalVotingPower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0.numer(), self.0.denom())
    }
}
