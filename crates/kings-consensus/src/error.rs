//! Consensus error types.

use thiserror::Error;

/// Why a block hash failed the proof-of-work check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PowError {
    /// The claimed target is negative, zero, overflowing, or easier than the
    /// network limit.
    #[error("nBits below minimum work")]
    BelowMinimumWork,

    /// The hash is numerically larger than the claimed target.
    #[error("hash doesn't match nBits")]
    HashExceedsTarget,
}

/// Errors returned by header-level consensus checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// Proof-of-work check failed.
    #[error(transparent)]
    Pow(#[from] PowError),

    /// Header claims a target other than the one the retarget rules require.
    #[error("incorrect proof of work: expected bits {expected:#010x}, got {got:#010x}")]
    IncorrectDifficultyBits {
        /// Bits required by the retarget rules.
        expected: u32,
        /// Bits found in the header.
        got: u32,
    },
}
