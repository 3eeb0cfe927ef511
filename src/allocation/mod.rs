//! Section allocation.
//!
//! Turns seat targets into concrete sections: for every time slot of every
//! shift, decides which course (if any) each room hosts.
//!
//! # Seam
//!
//! The assignment engine only consumes the produced [`ScheduledGroup`] list,
//! so any packing heuristic can be plugged in through [`SectionAllocator`].
//! [`BestFitAllocator`] is the default.
//!
//! # Reference
//! Coffman, Garey & Johnson (1996), "Approximation Algorithms for Bin
//! Packing: A Survey"

mod best_fit;

pub use best_fit::BestFitAllocator;

use std::fmt::Debug;

use crate::demand::DemandTable;
use crate::grid::TimeGrid;
use crate::models::{Room, ScheduledGroup};

/// A strategy that opens sections from demand, rooms, and a time grid.
///
/// Implementations must honor:
/// - one section per room per slot, and no room in two overlapping slots;
/// - sections only for (course, shift) pairs present in the demand table;
/// - `remaining == capacity == room capacity` on every produced group.
pub trait SectionAllocator: Send + Sync + Debug {
    /// Strategy name (e.g., "best-fit").
    fn name(&self) -> &'static str;

    /// Opens sections. Deterministic for identical inputs.
    fn allocate(&self, grid: &TimeGrid, rooms: &[Room], demand: &DemandTable) -> Vec<ScheduledGroup>;
}
