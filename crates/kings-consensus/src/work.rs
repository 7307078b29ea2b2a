// Consensus-critical. Changes require a network upgrade + tests.
//! Work calculation helpers (heaviest-chain selection).

use crate::compact::Uint256;
use kings_core::Hash32;

/// Work represented by one block mined against `bits`.
///
/// Work is `2^256 / (target + 1)`, computed as `!target / (target + 1) + 1`
/// so it fits in 256 bits. Targets that decode negative, overflowing or zero
/// carry no work.
pub fn get_block_proof(bits: u32) -> Uint256 {
    let decoded = Uint256::from_compact(bits);
    let target = decoded.value;
    if decoded.negative || decoded.overflow || target.is_zero() {
        return Uint256::ZERO;
    }

    // target < 2^256 - 1 here, so the divisor cannot wrap to zero.
    let divisor = target.wrapping_add(Uint256::ONE);
    (!target)
        .checked_div(divisor)
        .map_or(Uint256::ZERO, |quotient| quotient.wrapping_add(Uint256::ONE))
}

/// Cumulative work of a chain, summed block by block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChainWork(Uint256);

impl ChainWork {
    /// Work of an empty chain.
    pub const fn zero() -> Self {
        Self(Uint256::ZERO)
    }

    /// Total accumulated so far.
    pub fn total(&self) -> Uint256 {
        self.0
    }

    /// Add the work of one block mined against `bits`.
    pub fn add_block(&mut self, bits: u32) {
        self.0 = self.0.wrapping_add(get_block_proof(bits));
    }

    /// Chain work after appending a block mined against `bits`.
    pub fn with_block(mut self, bits: u32) -> Self {
        self.add_block(bits);
        self
    }
}

impl FromIterator<u32> for ChainWork {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        iter.into_iter().fold(Self::zero(), Self::with_block)
    }
}

/// Return true if tip A is strictly better (heavier) than tip B.
///
/// Equal work tie-breaks on the numerically lower hash, reading each hash as
/// the little-endian 256-bit number it encodes.
pub fn tip_is_better(a_work: &ChainWork, a_hash: &Hash32, b_work: &ChainWork, b_hash: &Hash32) -> bool {
    if a_work != b_work {
        a_work > b_work
    } else {
        Uint256::from_hash(a_hash) < Uint256::from_hash(b_hash)
    }
}
