//! Assignment orchestration, run results, and KPI evaluation.
//!
//! # Algorithm
//!
//! `EnrollmentEngine` opens sections with a [`SectionAllocator`], then
//! `MultiPassAssigner` sweeps the slots with alternating direction,
//! solving a max-flow matching per slot against an explicit
//! [`RunContext`]. It is not globally optimal: each slot's matching is
//! maximal given earlier decisions, which passes never undo.
//!
//! # KPI
//!
//! `EnrollmentKpi` computes coverage (demand, target, scheduled, gap,
//! unserved) per course and shift, plus seat usage and fill rates.
//! `audit_plan` re-checks every scheduling invariant on a finished plan.
//!
//! [`SectionAllocator`]: crate::allocation::SectionAllocator

mod assigner;
mod audit;
mod context;
mod engine;
mod kpi;
mod plan;

#[cfg(test)]
mod tests;

pub use assigner::{MultiPassAssigner, PassReport};
pub use audit::audit_plan;
pub use context::{RunContext, StudentState};
pub use engine::EnrollmentEngine;
pub use kpi::{CourseCoverage, EnrollmentKpi, GroupUsage, ShiftSummary};
pub use plan::EnrollmentPlan;
