//! Protocol-wide constants for Kings.

/// Length in bytes of a 32-byte hash.
pub const HASH32_LEN: usize = 32;

/// Block spacing target in seconds.
pub const TARGET_SPACING_SECS: i64 = 150;

/// Easiest allowed target on mainnet (`~0 >> 20`, compact form).
pub const MAINNET_POW_LIMIT_BITS: u32 = 0x1e0f_ffff;

/// Easiest allowed target on regtest (`~0 >> 1`, compact form).
pub const REGTEST_POW_LIMIT_BITS: u32 = 0x207f_ffff;

/// Last height at which blocks are mined with proof of work on mainnet.
///
/// Above it the chain is pure stake and the exponential retarget applies.
pub const MAINNET_LAST_POW_HEIGHT: i64 = 259_200;

/// Last proof-of-work height on regtest.
pub const REGTEST_LAST_POW_HEIGHT: i64 = 250;

/// Activation height of the terminal-velocity retarget.
///
/// No fork height has been scheduled yet, so the algorithm stays dormant
/// below this placeholder on every network.
pub const TERMINAL_VELOCITY_HEIGHT: i64 = 9_999_999;
