//! Maximum-flow assignment of students to sections.
//!
//! Each time slot is solved independently: a fresh bipartite network of
//! candidate students and the slot's open groups is built from the current
//! run state, solved with Dinic's algorithm, and its saturated
//! student→group edges are turned into assignments.
//!
//! Solving per slot keeps every network bounded by one slot's students and
//! rooms. Time conflicts never appear inside a single slot's network,
//! so they are enforced by candidate filtering rather than extra topology.

mod network;
mod slot;

pub use network::{EdgeId, FlowNetwork};
pub use slot::{assign_slot, SlotOutcome};
