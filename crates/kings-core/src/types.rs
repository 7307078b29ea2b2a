// Consensus-critical. Changes require a network upgrade + tests.
//! Value types shared between the chain index and the consensus rules.

use crate::constants::HASH32_LEN;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors related to parsing or validating core protocol values.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Hex string had an unexpected byte length.
    #[error("invalid hex length: expected {expected} bytes, got {got} bytes")]
    InvalidHexLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        got: usize,
    },

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Chain parameters violated a basic constraint.
    #[error("invalid chain parameters: {0}")]
    InvalidParameters(&'static str),

    /// Parameter document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid parameter document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fixed-size 32-byte hash.
///
/// The bytes are the little-endian encoding of the 256-bit number that is
/// compared against a target, matching the legacy `uint256` memory layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hash32(pub [u8; HASH32_LEN]);

impl Hash32 {
    /// Returns an all-zero hash.
    pub const fn zero() -> Self {
        Self([0u8; HASH32_LEN])
    }

    /// Returns the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", hex::encode(self.0))
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; HASH32_LEN]> for Hash32 {
    fn from(value: [u8; HASH32_LEN]) -> Self {
        Self(value)
    }
}

impl FromStr for Hash32 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH32_LEN {
            return Err(CoreError::InvalidHexLength {
                expected: HASH32_LEN,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH32_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// Read-only view of one block as the retarget rules need it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockSnapshot {
    /// Height of the block (genesis is 0).
    pub height: u32,
    /// Compact target the block was mined against.
    pub bits: u32,
    /// Block timestamp in unix seconds.
    pub time: i64,
}

impl BlockSnapshot {
    /// Build a snapshot from its three fields.
    pub const fn new(height: u32, bits: u32, time: i64) -> Self {
        Self { height, bits, time }
    }
}

/// The header fields of the block being built or validated that the
/// difficulty rules look at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateHeader {
    /// Proposed block timestamp in unix seconds.
    pub time: i64,
    /// Compact target claimed by the header.
    pub bits: u32,
}
