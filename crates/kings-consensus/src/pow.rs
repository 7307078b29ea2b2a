// Consensus-critical. Changes require a network upgrade + tests.
//! Proof-of-work verification.
//!
//! The PoW condition is:
//!     hash_as_u256 <= target(bits) <= pow_limit
//! where the target must decode without a sign or overflow flag and be
//! non-zero.

use crate::compact::Uint256;
use crate::difficulty::pow_limit;
use crate::error::PowError;
use kings_core::{ChainParameters, Hash32};

/// Check that `hash` satisfies the compact target `bits`.
///
/// Networks with `skip_pow_check` set accept every hash.
pub fn check_proof_of_work(
    hash: &Hash32,
    bits: u32,
    params: &ChainParameters,
) -> Result<(), PowError> {
    if params.skip_pow_check {
        return Ok(());
    }

    let decoded = Uint256::from_compact(bits);
    let target = decoded.value;
    if decoded.negative || target.is_zero() || decoded.overflow || target > pow_limit(params) {
        log::debug!("check_proof_of_work: nBits {bits:08x} below minimum work");
        return Err(PowError::BelowMinimumWork);
    }

    if Uint256::from_hash(hash) > target {
        log::debug!("check_proof_of_work: hash {hash} doesn't match nBits {bits:08x}");
        return Err(PowError::HashExceedsTarget);
    }

    Ok(())
}
