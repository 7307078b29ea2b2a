//! Network parameters consumed by the difficulty and proof-of-work rules.
//!
//! Parameters are an explicit immutable value handed to every consensus entry
//! point. Nothing reads them from global state.

use crate::compact::CompactFields;
use crate::constants::*;
use crate::types::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consensus parameters for one network.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ChainParameters {
    /// Compact form of the easiest allowed target.
    pub pow_limit_bits: u32,
    /// Desired block spacing in seconds.
    pub target_spacing_secs: i64,
    /// Last proof-of-work height; retargeting turns exponential above it.
    pub last_pow_height: i64,
    /// Height at which the terminal-velocity retarget takes over.
    pub terminal_velocity_height: i64,
    /// Accept every hash without checking it (regtest only).
    pub skip_pow_check: bool,
}

impl ChainParameters {
    /// Mainnet parameters.
    pub const fn mainnet() -> Self {
        Self {
            pow_limit_bits: MAINNET_POW_LIMIT_BITS,
            target_spacing_secs: TARGET_SPACING_SECS,
            last_pow_height: MAINNET_LAST_POW_HEIGHT,
            terminal_velocity_height: TERMINAL_VELOCITY_HEIGHT,
            skip_pow_check: false,
        }
    }

    /// Regression-test parameters: trivial limit and no hash check.
    pub const fn regtest() -> Self {
        Self {
            pow_limit_bits: REGTEST_POW_LIMIT_BITS,
            target_spacing_secs: TARGET_SPACING_SECS,
            last_pow_height: REGTEST_LAST_POW_HEIGHT,
            terminal_velocity_height: TERMINAL_VELOCITY_HEIGHT,
            skip_pow_check: true,
        }
    }

    /// Check the parameters for values the retarget arithmetic cannot use.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.target_spacing_secs <= 0 {
            return Err(CoreError::InvalidParameters(
                "target spacing must be positive",
            ));
        }
        if self.last_pow_height < 0 || self.terminal_velocity_height < 0 {
            return Err(CoreError::InvalidParameters(
                "activation heights must be non-negative",
            ));
        }

        let limit = CompactFields::parse(self.pow_limit_bits);
        if limit.word == 0 {
            return Err(CoreError::InvalidParameters("pow limit is zero"));
        }
        if limit.negative {
            return Err(CoreError::InvalidParameters("pow limit is negative"));
        }
        if limit.overflow {
            return Err(CoreError::InvalidParameters(
                "pow limit exceeds 256 bits",
            ));
        }
        Ok(())
    }

    /// Parse parameters from a JSON document and validate them.
    ///
    /// Missing fields fall back to the mainnet values.
    #[cfg(feature = "serde")]
    pub fn from_json(document: &str) -> Result<Self, CoreError> {
        let params: Self = serde_json::from_str(document)?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self::mainnet()
    }
}
