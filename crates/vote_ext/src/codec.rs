//! Pluggable wire formats for vote extension payloads and extended
//! commits.
//!
//! Every node on a chain must run the same pair of codecs: peers that
//! disagree on the wire format reject each other's votes wholesale, so a
//! codec is deployment configuration, not a per-call choice. Protocol
//! logic only ever sees the traits below, wired in at construction.

use borsh::{to_vec, BorshDeserialize};
use thiserror::Error;

use crate::commit::ExtendedCommitInfo;
use crate::VoteExtension;

#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Error deserializing from bytes: {0}")]
    Deserialization(String),
}

/// A wire format for a single [`VoteExtension`] payload.
///
/// Decoding must be the exact inverse of encoding: for every valid
/// extension `v`, `decode(encode(v)) == v`.
pub trait VoteExtensionCodec: Send + Sync {
    /// Serialize the given vote extension to bytes.
    fn encode(&self, ext: &VoteExtension) -> Vec<u8>;

    /// Deserialize a vote extension from bytes.
    fn decode(&self, bytes: &[u8]) -> Result<VoteExtension, DecodeError>;
}

/// A wire format for an [`ExtendedCommitInfo`] aggregate, used when the
/// prior height's commit is carried inside a block proposal.
pub trait ExtendedCommitCodec: Send + Sync {
    /// Serialize the given extended commit to bytes.
    fn encode(&self, commit: &ExtendedCommitInfo) -> Vec<u8>;

    /// Deserialize an extended commit from bytes.
    fn decode(&self, bytes: &[u8]) -> Result<ExtendedCommitInfo, DecodeError>;
}

/// The borsh wire format, the only codec deployed on Tessera chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorshCodec;

impl VoteExtensionCodec for BorshCodec {
    fn encode(&self, ext: &VoteExtension) -> Vec<u8> {
        to_vec(ext).expect("serializing to memory must not fail")
    }

    fn decode(&self, bytes: &[u8]) -> Result<VoteExtension, DecodeError> {
        VoteExtension::try_from_slice(bytes)
            .map_err(|err| DecodeError::Deserialization(err.to_string()))
    }
}

impl ExtendedCommitCodec for BorshCodec {
    fn encode(&self, commit: &ExtendedCommitInfo) -> Vec<u8> {
        to_vec(commit).expect("serializing to memory must not fail")
    }

    fn decode(&self, bytes: &[u8]) -> Result<ExtendedCommitInfo, DecodeError> {
        ExtendedCommitInfo::try_from_slice(bytes)
            .map_err(|err| DecodeError::Deserialization(err.to_string()))
    }
}
