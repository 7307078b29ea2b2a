//! Diagnostic events emitted while retargeting.
//!
//! Events describe intermediate values (spacings, factors, averages) for
//! operators and tests. They are never read back by the consensus code.

use crate::difficulty::RetargetAlgorithm;

/// One step of a retarget computation.
#[derive(Clone, Debug, PartialEq)]
pub enum RetargetEvent {
    /// The dispatcher chose an algorithm for the block after `height`.
    AlgorithmSelected {
        /// Height of the current tip.
        height: u32,
        /// Selected algorithm.
        algorithm: RetargetAlgorithm,
    },
    /// Dark gravity wave finished its walk.
    DarkGravityWindow {
        /// Blocks averaged.
        count_blocks: i64,
        /// Observed timespan after clamping.
        actual_timespan: i64,
        /// Expected timespan for `count_blocks` blocks.
        target_timespan: i64,
    },
    /// Exponential retarget measured the latest spacing.
    ExponentialSpacing {
        /// Seconds between the tip and its parent, after clamping.
        actual_spacing: i64,
    },
    /// Terminal velocity measured one inter-block spacing.
    VelocitySpacing {
        /// 1 for the newest spacing, up to 5.
        index: usize,
        /// Seconds between the two blocks.
        spacing: i64,
        /// Multiplier derived from the spacing.
        factor: f64,
    },
    /// Terminal velocity averaged its multipliers.
    VelocityAverage {
        /// Arithmetic mean of the multipliers.
        average: f64,
        /// Integer divisor applied to the previous target.
        difficulty_factor: i64,
    },
    /// A new target was produced.
    Retargeted {
        /// Algorithm that produced it.
        algorithm: RetargetAlgorithm,
        /// Bits of the tip.
        previous_bits: u32,
        /// Bits required for the next block.
        next_bits: u32,
    },
}

/// Sink for [`RetargetEvent`]s.
pub trait RetargetObserver {
    /// Receive one event.
    fn on_event(&self, event: &RetargetEvent);
}

impl<F: Fn(&RetargetEvent)> RetargetObserver for F {
    fn on_event(&self, event: &RetargetEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RetargetObserver for NoopObserver {
    fn on_event(&self, _event: &RetargetEvent) {}
}

/// Forwards events to the `log` facade at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl RetargetObserver for LogObserver {
    fn on_event(&self, event: &RetargetEvent) {
        match event {
            RetargetEvent::AlgorithmSelected { height, algorithm } => {
                log::debug!(target: "retarget", "height {height}: {algorithm:?} retarget selected");
            }
            RetargetEvent::DarkGravityWindow {
                count_blocks,
                actual_timespan,
                target_timespan,
            } => {
                log::debug!(
                    target: "retarget",
                    "dgw: {count_blocks} blocks, timespan {actual_timespan}s vs {target_timespan}s"
                );
            }
            RetargetEvent::ExponentialSpacing { actual_spacing } => {
                log::debug!(target: "retarget", "exponential: spacing {actual_spacing}s");
            }
            RetargetEvent::VelocitySpacing {
                index,
                spacing,
                factor,
            } => {
                log::debug!(
                    target: "retarget",
                    "terminal velocity spacing {index}: {spacing}s, multiplier {factor}"
                );
            }
            RetargetEvent::VelocityAverage {
                average,
                difficulty_factor,
            } => {
                log::debug!(
                    target: "retarget",
                    "terminal velocity averaged multiplier {average}, divisor {difficulty_factor}"
                );
            }
            RetargetEvent::Retargeted {
                algorithm,
                previous_bits,
                next_bits,
            } => {
                log::debug!(
                    target: "retarget",
                    "{algorithm:?}: {previous_bits:08x} -> {next_bits:08x}"
                );
            }
        }
    }
}
