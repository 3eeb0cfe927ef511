//! Per-slot student-to-section matching.
//!
//! # Network
//!
//! ```text
//! source ──1──▶ student ──1──▶ group ──remaining──▶ sink
//! ```
//!
//! - One node per candidate student: same shift as the slot, under the
//!   course limit, free at this time, and (for no-break shifts) adjacent
//!   to their existing block that day.
//! - One node per group meeting at the slot with seats left.
//! - A student→group edge exists only if the student is eligible for the
//!   group's course and has not taken it yet.
//!
//! The unit source edge allows at most one class per student per slot.
//! A maximum flow is a maximum matching under all constraints; every
//! student→group edge carrying flow becomes an assignment.

use tracing::trace;

use super::FlowNetwork;
use crate::models::TimeSlot;
use crate::scheduler::RunContext;

const SOURCE: usize = 0;
const SINK: usize = 1;

/// Result of matching one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotOutcome {
    /// Student nodes in the network.
    pub candidates: usize,
    /// Group nodes in the network.
    pub groups: usize,
    /// Assignments made.
    pub assigned: usize,
}

/// Matches students to the open groups of one slot and records the result
/// in `ctx`.
///
/// A slot without open groups or candidates is a no-op.
pub fn assign_slot(ctx: &mut RunContext<'_>, slot: &TimeSlot) -> SlotOutcome {
    let groups = ctx.open_groups_at(slot);
    if groups.is_empty() {
        return SlotOutcome::default();
    }

    let max_courses = ctx.config().max_courses_per_student;
    let contiguous = !ctx.config().allows_breaks(slot.shift);

    // (student index, positions into `groups` the student may join)
    let mut candidates: Vec<(usize, Vec<usize>)> = Vec::new();
    for (s, student) in ctx.catalog().students.iter().enumerate() {
        if student.shift != slot.shift {
            continue;
        }
        let state = ctx.student_state(s);
        if state.assigned_count() >= max_courses || state.conflicts_with(slot) {
            continue;
        }
        if contiguous && !state.extends_block(slot) {
            continue;
        }
        let reachable: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|&(_, &g)| {
                ctx.group_course(g)
                    .is_some_and(|c| ctx.is_eligible(s, c) && !state.has_taken(c))
            })
            .map(|(pos, _)| pos)
            .collect();
        if !reachable.is_empty() {
            candidates.push((s, reachable));
        }
    }
    if candidates.is_empty() {
        return SlotOutcome {
            groups: groups.len(),
            ..SlotOutcome::default()
        };
    }

    let group_base = 2 + candidates.len();
    let mut net = FlowNetwork::new(group_base + groups.len());
    let mut links = Vec::new();
    for (i, (student, reachable)) in candidates.iter().enumerate() {
        let node = 2 + i;
        net.add_edge(SOURCE, node, 1);
        for &pos in reachable {
            let edge = net.add_edge(node, group_base + pos, 1);
            links.push((*student, groups[pos], edge));
        }
    }
    for (pos, &g) in groups.iter().enumerate() {
        let group = &ctx.groups()[g];
        debug_assert!(group.remaining <= group.capacity, "group {} over capacity", group.id);
        net.add_edge(group_base + pos, SINK, group.remaining.min(group.capacity));
    }

    let flow = net.max_flow(SOURCE, SINK);

    let mut assigned = 0;
    for (student, group, edge) in links {
        if net.flow(edge) > 0 {
            ctx.record(student, group);
            assigned += 1;
        }
    }
    debug_assert_eq!(assigned as u64, flow);

    trace!(
        %slot,
        candidates = candidates.len(),
        groups = groups.len(),
        assigned,
        "slot matched"
    );

    SlotOutcome {
        candidates: candidates.len(),
        groups: groups.len(),
        assigned,
    }
}
