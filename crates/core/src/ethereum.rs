//! Native wrappers over the Ethereum-flavored types carried inside vote
//! extensions.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use data_encoding::HEXLOWER;
use ethabi::ethereum_types::{H160, U256 as ethUint};
use eyre::{eyre, Context};
use serde::{Deserialize, Serialize};

/// Tessera native type to replace the ethabi::Uint type
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Hash,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct Uint(pub [u64; 4]);

impl PartialOrd for Uint {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uint {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        ethUint(self.0).cmp(&ethUint(other.0))
    }
}

impl Display for Uint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&ethUint(self.0), f)
    }
}

impl From<ethUint> for Uint {
    fn from(value: ethUint) -> Self {
        Self(value.0)
    }
}

impl From<Uint> for ethUint {
    fn from(value: Uint) -> Self {
        Self(value.0)
    }
}

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        ethUint::from(value).into()
    }
}

/// A signed 256-bit integer, in two's complement over [`Uint`].
///
/// Observed base fees travel in this representation because the wire
/// format inherited from the execution layer is a signed big integer.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Hash,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct I256(pub Uint);

impl I256 {
    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0 .0[3] & (1u64 << 63) != 0
    }

    /// The magnitude of this signed value.
    pub fn abs(&self) -> Uint {
        if self.is_negative() {
            let raw = ethUint(self.0 .0);
            ((!raw).overflowing_add(ethUint::one()).0).into()
        } else {
            self.0
        }
    }
}

impl From<Uint> for I256 {
    fn from(value: Uint) -> Self {
        Self(value)
    }
}

impl From<u64> for I256 {
    fn from(value: u64) -> Self {
        Self(Uint::from(value))
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        if value >= 0 {
            Self(Uint::from(value as u64))
        } else {
            let magnitude = ethUint::from(value.unsigned_abs());
            Self(((!magnitude).overflowing_add(ethUint::one()).0).into())
        }
    }
}

impl TryFrom<I256> for Uint {
    type Error = eyre::Error;

    fn try_from(value: I256) -> Result<Self, Self::Error> {
        if value.is_negative() {
            Err(eyre!("cannot convert a negative value to Uint"))
        } else {
            Ok(value.0)
        }
    }
}

impl PartialOrd for I256 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            // two's complement preserves ordering within a sign
            _ => self.0.cmp(&other.0),
        }
    }
}

impl Display for I256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", ethUint::from(self.abs()))
        } else {
            write!(f, "{}", ethUint::from(self.0))
        }
    }
}

/// Representation of an address on Ethereum. The inner value is the last 20
/// bytes of the public key that controls the account.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct EthAddress(pub [u8; 20]);

impl EthAddress {
    /// The canonical way we represent an [`EthAddress`]. A 40-character
    /// lower case hexadecimal address prefixed by '0x'.
    /// e.g. "0x6b175474e89094c44da98b954eedeac495271d0f"
    pub fn to_canonical(&self) -> String {
        format!("{:?}", H160::from(&self.0))
    }

    /// Check if this is the all-zeroes address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl From<H160> for EthAddress {
    fn from(H160(addr): H160) -> Self {
        Self(addr)
    }
}

impl From<EthAddress> for H160 {
    fn from(EthAddress(addr): EthAddress) -> Self {
        Self(addr)
    }
}

impl Display for EthAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

impl FromStr for EthAddress {
    type Err = eyre::Error;

    /// Parses an [`EthAddress`] from a standard hex-encoded Ethereum
    /// address string. e.g. "0x6B175474E89094C44Da98b954EedeAC495271d0F"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let h160 = H160::from_str(s)
            .wrap_err_with(|| eyre!("couldn't parse Ethereum address {}", s))?;
        Ok(Self(h160.into()))
    }
}

impl TryFrom<String> for EthAddress {
    type Error = eyre::Error;

    fn try_from(string: String) -> Result<Self, eyre::Error> {
        Self::from_str(string.as_ref())
    }
}

impl From<EthAddress> for String {
    fn from(addr: EthAddress) -> Self {
        addr.to_string()
    }
}

/// The number of bytes in a block's log bloom filter.
pub const BLOOM_SIZE: usize = 256;

/// A block's log bloom filter.
#[derive(Copy, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Bloom(pub [u8; BLOOM_SIZE]);

impl Default for Bloom {
    fn default() -> Self {
        Self([0u8; BLOOM_SIZE])
    }
}

impl Debug for Bloom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bloom(0x{})", HEXLOWER.encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    #[test]
    fn test_eth_address_to_canonical() {
        let canonical = "0x6b175474e89094c44da98b954eedeac495271d0f";
        let addr =
            EthAddress::from_str("0x6B175474E89094C44Da98b954EedeAC495271d0F")
                .expect("Test failed");
        assert_eq!(addr.to_canonical(), canonical);
    }

    #[test]
    fn test_eth_address_from_str_malformed() {
        for malformed in [
            "0x6B175474E89094C44Da98b954EedeAC495271d0", // too short
            "6B175474E89094C44Da98b954EedeAC495271d0F55", // too long
            "not an address",
        ] {
            assert!(EthAddress::from_str(malformed).is_err());
        }
    }

    #[test]
    fn test_eth_address_is_zero() {
        assert!(EthAddress([0; 20]).is_zero());
        assert!(!EthAddress([1; 20]).is_zero());
    }

    #[test]
    fn test_signed_int_sign() {
        assert!(!I256::from(0i64).is_negative());
        assert!(!I256::from(7i64).is_negative());
        assert!(I256::from(-7i64).is_negative());
        assert!(I256::from(i64::MIN).is_negative());
    }

    #[test]
    fn test_signed_int_abs_round_trips_negation() {
        let value = I256::from(-42i64);
        assert_eq!(value.abs(), Uint::from(42u64));
        assert_eq!(I256::from(42i64).abs(), Uint::from(42u64));
    }

    #[test]
    fn test_signed_int_ordering() {
        let neg = I256::from(-1i64);
        let zero = I256::from(0i64);
        let pos = I256::from(1i64);
        assert_eq!(neg.cmp(&pos), Ordering::Less);
        assert_eq!(pos.cmp(&neg), Ordering::Greater);
        assert_eq!(neg.cmp(&zero), Ordering::Less);
        assert!(I256::from(-10i64) < I256::from(-2i64));
    }

    #[test]
    fn test_signed_int_display() {
        assert_eq!(I256::from(-42i64).to_string(), "-42");
        assert_eq!(I256::from(1729i64).to_string(), "1729");
    }
}
