//! Result of one enrollment run.

use serde::{Deserialize, Serialize};

use super::EnrollmentKpi;
use crate::demand::DemandTable;
use crate::models::{Assignment, ScheduledGroup};

/// Groups opened, students placed, and the demand they were sized for.
///
/// Groups carry their final `remaining` seats; `capacity - remaining`
/// equals the number of assignments referencing the group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentPlan {
    /// Allocated groups in allocation order.
    pub groups: Vec<ScheduledGroup>,
    /// Assignments in creation order.
    pub assignments: Vec<Assignment>,
    /// Demand table the allocation was sized from.
    pub demand: DemandTable,
    /// Assignment passes actually executed.
    pub passes_run: u32,
    /// Assignments added by each executed pass.
    pub added_per_pass: Vec<usize>,
}

impl EnrollmentPlan {
    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Group by ID.
    pub fn group(&self, group_id: &str) -> Option<&ScheduledGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// All assignments of a student.
    pub fn assignments_for_student(&self, student_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.student_id == student_id)
            .collect()
    }

    /// All assignments into a group.
    pub fn assignments_for_group(&self, group_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.group_id == group_id)
            .collect()
    }

    /// Total seats across all groups.
    pub fn seats_scheduled(&self) -> u32 {
        self.groups.iter().map(|g| g.capacity).sum()
    }

    /// Computes metrics for this plan.
    pub fn kpi(&self) -> EnrollmentKpi {
        EnrollmentKpi::calculate(self)
    }
}
