// Consensus-critical. Changes require a network upgrade + tests.
//! Difficulty retargeting.
//!
//! Three retarget rules have governed the chain over its lifetime:
//!
//! - Dark Gravity Wave v3 while blocks are mined with proof of work,
//! - an exponential moving average once the chain turns pure stake,
//! - Terminal-Velocity-RateX from its (not yet scheduled) activation height.
//!
//! [`select_algorithm`] picks one per height and [`RetargetAlgorithm::retarget`]
//! runs it over an [`AncestorWindow`] copied out of the chain beforehand.
//! Every intermediate value is a fixed-width integer truncated in exactly the
//! legacy order; do not reassociate any of the multiplications or divisions.

use crate::ancestry::AncestorWindow;
use crate::compact::Uint256;
use crate::events::{LogObserver, RetargetEvent, RetargetObserver};
use kings_core::{BlockSnapshot, CandidateHeader, ChainParameters, ChainView};

/// Blocks averaged by Dark Gravity Wave, and the minimum height it needs.
pub const DGW_PAST_BLOCKS: i64 = 24;

/// Spacing the exponential retarget steers towards.
const EXPONENTIAL_TARGET_SPACING: i64 = 150;

/// Timespan the exponential retarget averages over (40 minutes).
const EXPONENTIAL_TARGET_TIMESPAN: i64 = 40 * 60;

/// Blocks read by terminal velocity: the tip and five ancestors.
pub const VELOCITY_SCAN_BLOCKS: usize = 6;

/// Nominal spacing terminal velocity compares against.
const VELOCITY_NORMAL_SPACING: i64 = 150;

/// Fixed-point scale for the terminal velocity multiplier.
const VELOCITY_FACTOR_SCALE: i64 = 10_000;

/// Retarget rule applied to a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetargetAlgorithm {
    /// Per-block exponential moving average (pure-stake era).
    LegacyExponential,
    /// Dark Gravity Wave v3 over the last 24 blocks.
    DarkGravityWave,
    /// Terminal-Velocity-RateX over the last five spacings.
    TerminalVelocity,
}

impl RetargetAlgorithm {
    /// How many blocks, tip included, the algorithm reads.
    pub const fn ancestry_depth(self) -> usize {
        match self {
            Self::LegacyExponential => 2,
            Self::DarkGravityWave => DGW_PAST_BLOCKS as usize,
            Self::TerminalVelocity => VELOCITY_SCAN_BLOCKS,
        }
    }

    /// Run the algorithm and return the compact target for the next block.
    pub fn retarget(
        self,
        window: &AncestorWindow,
        params: &ChainParameters,
        observer: &dyn RetargetObserver,
    ) -> u32 {
        match self {
            Self::LegacyExponential => legacy_exponential(window, params, observer),
            Self::DarkGravityWave => dark_gravity_wave(window, params, observer),
            Self::TerminalVelocity => terminal_velocity(window, params, observer),
        }
    }
}

/// Choose the retarget rule for the block following a tip at `height`.
///
/// Terminal velocity wins from its activation height on. Below it Dark
/// Gravity Wave applies, which itself hands over to the exponential rule past
/// the last proof-of-work height once it has a full window.
pub fn select_algorithm(height: u32, params: &ChainParameters) -> RetargetAlgorithm {
    let height = i64::from(height);
    if height >= params.terminal_velocity_height {
        RetargetAlgorithm::TerminalVelocity
    } else if height >= DGW_PAST_BLOCKS && height > params.last_pow_height {
        RetargetAlgorithm::LegacyExponential
    } else {
        RetargetAlgorithm::DarkGravityWave
    }
}

/// The network's easiest target.
pub fn pow_limit(params: &ChainParameters) -> Uint256 {
    Uint256::from_compact(params.pow_limit_bits).value
}

/// Compact target the block after `tip` must satisfy.
///
/// `tip` is `None` only when the candidate is the genesis block.
/// `candidate` never changes the result; a claimed `bits` that differs from
/// the required value is only traced. Intermediate values are reported to the
/// `log` facade at debug level.
pub fn get_next_required_target<V: ChainView + ?Sized>(
    view: &V,
    tip: Option<&BlockSnapshot>,
    candidate: &CandidateHeader,
    params: &ChainParameters,
) -> u32 {
    get_next_required_target_observed(view, tip, candidate, params, &LogObserver)
}

/// [`get_next_required_target`] with a caller-supplied event sink.
pub fn get_next_required_target_observed<V: ChainView + ?Sized>(
    view: &V,
    tip: Option<&BlockSnapshot>,
    candidate: &CandidateHeader,
    params: &ChainParameters,
    observer: &dyn RetargetObserver,
) -> u32 {
    let Some(tip) = tip else {
        return pow_limit(params).to_compact();
    };

    let algorithm = select_algorithm(tip.height, params);
    observer.on_event(&RetargetEvent::AlgorithmSelected {
        height: tip.height,
        algorithm,
    });

    let window = AncestorWindow::capture(view, tip, algorithm.ancestry_depth());
    let next_bits = algorithm.retarget(&window, params, observer);

    observer.on_event(&RetargetEvent::Retargeted {
        algorithm,
        previous_bits: tip.bits,
        next_bits,
    });
    if candidate.bits != next_bits {
        log::trace!(
            target: "retarget",
            "candidate at {} claims {:08x}, required {:08x}",
            candidate.time,
            candidate.bits,
            next_bits
        );
    }
    next_bits
}

/// Exponential moving average towards a 150 second spacing.
///
/// The newest observed spacing is counted twice against fifteen nominal
/// ones, so each block moves the target a sixteenth of the way.
pub fn legacy_exponential(
    window: &AncestorWindow,
    params: &ChainParameters,
    observer: &dyn RetargetObserver,
) -> u32 {
    let limit = pow_limit(params);
    let Some(tip) = window.tip() else {
        return limit.to_compact();
    };

    let mut actual_spacing = match window.get(1) {
        Some(prev) if tip.height != 0 => tip.time.wrapping_sub(prev.time),
        _ => 0,
    };
    if actual_spacing < 0 {
        actual_spacing = 1;
    }
    observer.on_event(&RetargetEvent::ExponentialSpacing { actual_spacing });

    let interval = EXPONENTIAL_TARGET_TIMESPAN / EXPONENTIAL_TARGET_SPACING;
    let numerator = ((interval - 1) * EXPONENTIAL_TARGET_SPACING)
        .wrapping_add(actual_spacing)
        .wrapping_add(actual_spacing);
    let denominator = (interval + 1) * EXPONENTIAL_TARGET_SPACING;

    let next = Uint256::from_compact(tip.bits)
        .value
        .wrapping_mul_scalar(numerator)
        .checked_div_scalar(denominator)
        .unwrap_or(Uint256::ZERO);

    if next.is_zero() || next > limit {
        return limit.to_compact();
    }
    next.to_compact()
}

/// Dark Gravity Wave v3.
///
/// Averages the targets of the last 24 blocks with a running mean that
/// truncates at every step, then scales it by observed over expected
/// timespan, clamped to a factor of three either way.
pub fn dark_gravity_wave(
    window: &AncestorWindow,
    params: &ChainParameters,
    observer: &dyn RetargetObserver,
) -> u32 {
    let limit = pow_limit(params);
    let Some(tip) = window.tip() else {
        return limit.to_compact();
    };
    if tip.height == 0 || i64::from(tip.height) < DGW_PAST_BLOCKS {
        return limit.to_compact();
    }
    if i64::from(tip.height) > params.last_pow_height {
        return legacy_exponential(window, params, observer);
    }

    let mut count_blocks: i64 = 0;
    let mut average = Uint256::ZERO;
    let mut actual_timespan: i64 = 0;
    let mut last_block_time: i64 = 0;

    // Newest to oldest; genesis never takes part.
    for block in window
        .iter()
        .take_while(|block| block.height > 0)
        .take(DGW_PAST_BLOCKS as usize)
    {
        count_blocks += 1;

        let difficulty = Uint256::from_compact(block.bits).value;
        average = if count_blocks == 1 {
            difficulty
        } else {
            average
                .wrapping_mul_scalar(count_blocks)
                .wrapping_add(difficulty)
                .checked_div_scalar(count_blocks + 1)
                .unwrap_or(Uint256::ZERO)
        };

        if last_block_time > 0 {
            actual_timespan = actual_timespan.wrapping_add(last_block_time.wrapping_sub(block.time));
        }
        last_block_time = block.time;
    }

    let target_timespan = count_blocks.wrapping_mul(params.target_spacing_secs);
    if actual_timespan < target_timespan / 3 {
        actual_timespan = target_timespan / 3;
    }
    if actual_timespan > target_timespan.wrapping_mul(3) {
        actual_timespan = target_timespan.wrapping_mul(3);
    }
    observer.on_event(&RetargetEvent::DarkGravityWindow {
        count_blocks,
        actual_timespan,
        target_timespan,
    });

    let Some(next) = average
        .wrapping_mul_scalar(actual_timespan)
        .checked_div_scalar(target_timespan)
    else {
        log::warn!("zero target timespan; falling back to the pow limit");
        return limit.to_compact();
    };

    if next > limit {
        return limit.to_compact();
    }
    next.to_compact()
}

/// Multiplier terminal velocity applies for one observed spacing.
///
/// Slow blocks ease the target down towards 0.5, fast blocks push it up
/// towards 2.0.
pub fn velocity_factor(spacing: i64) -> f64 {
    const NORMAL: i64 = VELOCITY_NORMAL_SPACING;
    if spacing >= NORMAL {
        if spacing > NORMAL + 90 {
            0.5
        } else if spacing > NORMAL + 30 {
            0.75
        } else {
            1.0
        }
    } else if spacing < NORMAL - 90 {
        2.0
    } else if spacing < NORMAL - 30 {
        1.5
    } else {
        1.25
    }
}

/// Terminal-Velocity-RateX.
///
/// Averages the multipliers of the five newest spacings, turns the mean into
/// an integer divisor scaled by 10000, divides the tip's target by it and
/// scales back up. The division comes first and truncates.
pub fn terminal_velocity(
    window: &AncestorWindow,
    params: &ChainParameters,
    observer: &dyn RetargetObserver,
) -> u32 {
    let limit = pow_limit(params);
    let Some(tip) = window.tip() else {
        return limit.to_compact();
    };
    // Reset to the limit until the fork activates.
    if i64::from(tip.height) < params.terminal_velocity_height {
        return limit.to_compact();
    }
    if window.len() < VELOCITY_SCAN_BLOCKS {
        log::debug!(
            target: "retarget",
            "terminal velocity needs {VELOCITY_SCAN_BLOCKS} blocks, have {}",
            window.len()
        );
        return limit.to_compact();
    }

    let mut factors = [0f64; VELOCITY_SCAN_BLOCKS - 1];
    for (idx, factor) in factors.iter_mut().enumerate() {
        let (Some(newer), Some(older)) = (window.get(idx), window.get(idx + 1)) else {
            return limit.to_compact();
        };
        let spacing = newer.time.wrapping_sub(older.time);
        *factor = velocity_factor(spacing);
        observer.on_event(&RetargetEvent::VelocitySpacing {
            index: idx + 1,
            spacing,
            factor: *factor,
        });
    }

    // Summed left to right in f64, as the network has always done.
    let average = (factors[0] + factors[1] + factors[2] + factors[3] + factors[4])
        / (VELOCITY_SCAN_BLOCKS - 1) as f64;
    let difficulty_factor = (VELOCITY_FACTOR_SCALE as f64 * average) as i64;
    observer.on_event(&RetargetEvent::VelocityAverage {
        average,
        difficulty_factor,
    });

    let Some(next) = Uint256::from_compact(tip.bits)
        .value
        .checked_div_scalar(difficulty_factor)
    else {
        return limit.to_compact();
    };
    let next = next.wrapping_mul_scalar(VELOCITY_FACTOR_SCALE);

    if next > limit {
        return limit.to_compact();
    }
    next.to_compact()
}
