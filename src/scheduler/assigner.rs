//! Multi-pass assignment orchestrator.
//!
//! # Algorithm
//!
//! 1. Order the slots that host groups chronologically across all shifts
//!    (day, start minute, shift).
//! 2. For pass p = 1..=P, walk the slots ascending when p is odd and
//!    descending when p is even, matching each slot with max-flow against
//!    the current run state.
//! 3. Stop early when a pass adds nothing (if enabled); the state is then
//!    a fixed point and further passes would add nothing either.
//!
//! Alternating direction lets later slots claim students first on even
//! passes, so students blocked by an early decision get another chance.
//! Passes never remove assignments; the count is non-decreasing in P.
//!
//! # Complexity
//! O(P × S × F) where S = slots with groups and F = one slot's max-flow.

use tracing::debug;

use super::RunContext;
use crate::config::EngineConfig;
use crate::flow::assign_slot;
use crate::models::TimeSlot;

/// Outcome of the assignment passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Passes executed.
    pub passes_run: u32,
    /// Assignments added by each executed pass.
    pub added_per_pass: Vec<usize>,
}

impl PassReport {
    /// Assignments added across all passes.
    pub fn total_added(&self) -> usize {
        self.added_per_pass.iter().sum()
    }
}

/// Runs alternating-direction assignment passes over a slot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiPassAssigner {
    passes: u32,
    stop_when_stable: bool,
}

impl MultiPassAssigner {
    /// Creates an assigner running up to `passes` passes with early exit.
    pub fn new(passes: u32) -> Self {
        Self {
            passes,
            stop_when_stable: true,
        }
    }

    /// Creates an assigner from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            passes: config.assignment_passes,
            stop_when_stable: config.stop_when_stable,
        }
    }

    /// Sets whether to stop after a pass that adds nothing.
    pub fn with_stop_when_stable(mut self, stop: bool) -> Self {
        self.stop_when_stable = stop;
        self
    }

    /// Maximum passes.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Runs the passes over `slots`, given in chronological order.
    ///
    /// Slots without groups are skipped.
    pub fn run(&self, ctx: &mut RunContext<'_>, slots: &[TimeSlot]) -> PassReport {
        let active: Vec<TimeSlot> = slots
            .iter()
            .filter(|s| ctx.has_groups_at(s))
            .copied()
            .collect();

        let mut report = PassReport::default();
        for pass in 0..self.passes {
            let ascending = pass % 2 == 0;
            let mut added = 0;
            if ascending {
                for slot in &active {
                    added += assign_slot(ctx, slot).assigned;
                }
            } else {
                for slot in active.iter().rev() {
                    added += assign_slot(ctx, slot).assigned;
                }
            }

            report.passes_run += 1;
            report.added_per_pass.push(added);
            debug!(
                pass = pass + 1,
                ascending,
                added,
                total = ctx.assignments().len(),
                "assignment pass finished"
            );

            if added == 0 && self.stop_when_stable {
                break;
            }
        }
        report
    }
}
