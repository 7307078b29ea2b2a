// Consensus-critical. Changes require a network upgrade + tests.
//! Contextual header checks built on the retarget and PoW rules.
//!
//! These helpers only need the header's parent chain; they never touch
//! transactions or chain state.

use crate::difficulty::get_next_required_target;
use crate::error::ConsensusError;
use crate::pow::check_proof_of_work;
use kings_core::{BlockSnapshot, CandidateHeader, ChainParameters, ChainView, Hash32};

/// Require the header to claim exactly the target the retarget rules demand.
pub fn check_required_bits<V: ChainView + ?Sized>(
    view: &V,
    tip: Option<&BlockSnapshot>,
    candidate: &CandidateHeader,
    params: &ChainParameters,
) -> Result<(), ConsensusError> {
    let expected = get_next_required_target(view, tip, candidate, params);
    if candidate.bits != expected {
        return Err(ConsensusError::IncorrectDifficultyBits {
            expected,
            got: candidate.bits,
        });
    }
    Ok(())
}

/// Validate a header's difficulty claim, then its proof of work.
///
/// Checks:
/// - `bits` equals the required next target
/// - `hash` satisfies `bits`
pub fn validate_header_pow<V: ChainView + ?Sized>(
    view: &V,
    tip: Option<&BlockSnapshot>,
    candidate: &CandidateHeader,
    hash: &Hash32,
    params: &ChainParameters,
) -> Result<(), ConsensusError> {
    check_required_bits(view, tip, candidate, params)?;
    check_proof_of_work(hash, candidate.bits, params)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact::Uint256;
    use crate::error::PowError;

    fn young_chain() -> Vec<BlockSnapshot> {
        (0..10u32)
            .map(|h| BlockSnapshot::new(h, 0x1e0f_ffff, 1_000 + i64::from(h) * 150))
            .collect()
    }

    #[test]
    fn young_chain_requires_pow_limit() {
        let params = ChainParameters::mainnet();
        let chain = young_chain();
        let tip = chain.last().copied();
        let good = CandidateHeader {
            time: 3_000,
            bits: params.pow_limit_bits,
        };
        check_required_bits(&chain, tip.as_ref(), &good, &params).unwrap();

        let bad = CandidateHeader {
            bits: 0x1d00_ffff,
            ..good
        };
        assert_eq!(
            check_required_bits(&chain, tip.as_ref(), &bad, &params),
            Err(ConsensusError::IncorrectDifficultyBits {
                expected: params.pow_limit_bits,
                got: 0x1d00_ffff,
            })
        );
    }

    #[test]
    fn bits_checked_before_hash() {
        let params = ChainParameters::mainnet();
        let chain = young_chain();
        let tip = chain.last().copied();
        let header = CandidateHeader {
            time: 3_000,
            bits: params.pow_limit_bits,
        };
        let limit = Uint256::from_compact(params.pow_limit_bits).value;

        validate_header_pow(&chain, tip.as_ref(), &header, &limit.to_hash(), &params).unwrap();

        let too_high = limit.wrapping_add(Uint256::ONE).to_hash();
        assert_eq!(
            validate_header_pow(&chain, tip.as_ref(), &header, &too_high, &params),
            Err(ConsensusError::Pow(PowError::HashExceedsTarget))
        );

        let wrong_bits = CandidateHeader { bits: 0, ..header };
        assert!(matches!(
            validate_header_pow(&chain, tip.as_ref(), &wrong_bits, &too_high, &params),
            Err(ConsensusError::IncorrectDifficultyBits { .. })
        ));
    }
}
