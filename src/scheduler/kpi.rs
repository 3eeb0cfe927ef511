//! Enrollment quality metrics (KPIs).
//!
//! Computes coverage and utilization indicators from a finished plan.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Seats scheduled | Sum of group capacities |
//! | Seats used | Sum of (capacity - remaining) |
//! | Gap remaining | max(0, target - scheduled capacity) per (course, shift) |
//! | Unserved | demand - enrolled per (course, shift) |
//! | Fill rate | used / capacity per group |
//! | Avg fill rate | Mean fill rate over groups |
//! | Unassigned students | Students with zero assignments |

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::EnrollmentPlan;
use crate::models::{Catalog, Shift};

/// Coverage of one course in one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseCoverage {
    /// Course.
    pub course_id: String,
    /// Shift of the demand row.
    pub shift: Shift,
    /// Eligible students of the shift.
    pub demand: u32,
    /// Over-provisioned seat target.
    pub target: u32,
    /// Seats opened across all groups of the course in the shift.
    pub scheduled: u32,
    /// Target seats the allocator could not open.
    pub gap: u32,
    /// Students placed.
    pub enrolled: u32,
    /// Eligible students left without a seat.
    pub unserved: u32,
}

/// Totals of one shift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftSummary {
    /// Sum of course demand in the shift.
    pub demand: u32,
    /// Sum of seat targets.
    pub target: u32,
    /// Seats opened.
    pub scheduled: u32,
    /// Target seats not opened.
    pub gap: u32,
    /// Assignments made.
    pub enrolled: u32,
}

/// Utilization of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupUsage {
    /// Group.
    pub group_id: String,
    /// Seats in the room.
    pub capacity: u32,
    /// Seats taken.
    pub used: u32,
    /// Seats left.
    pub remaining: u32,
    /// used / capacity (0.0..1.0).
    pub fill_rate: f64,
}

/// Enrollment performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentKpi {
    /// Sum of group capacities.
    pub seats_scheduled_total: u32,
    /// Seats taken across all groups.
    pub seats_used_total: u32,
    /// Number of assignments.
    pub assignment_count: usize,
    /// Per (course, shift) coverage, in demand table order.
    pub coverage: Vec<CourseCoverage>,
    /// Per-shift totals.
    pub by_shift: BTreeMap<Shift, ShiftSummary>,
    /// Per-group usage, in allocation order.
    pub groups: Vec<GroupUsage>,
    /// Mean group fill rate (0.0 without groups).
    pub avg_fill_rate: f64,
}

impl EnrollmentKpi {
    /// Computes KPIs from a plan.
    pub fn calculate(plan: &EnrollmentPlan) -> Self {
        let mut scheduled: BTreeMap<(&str, Shift), u32> = BTreeMap::new();
        for g in &plan.groups {
            *scheduled.entry((g.course_id.as_str(), g.shift)).or_default() += g.capacity;
        }

        let group_shift: BTreeMap<&str, Shift> = plan
            .groups
            .iter()
            .map(|g| (g.id.as_str(), g.shift))
            .collect();
        let mut enrolled: BTreeMap<(&str, Shift), u32> = BTreeMap::new();
        for a in &plan.assignments {
            if let Some(&shift) = group_shift.get(a.group_id.as_str()) {
                *enrolled.entry((a.course_id.as_str(), shift)).or_default() += 1;
            }
        }

        let mut by_shift: BTreeMap<Shift, ShiftSummary> = BTreeMap::new();
        let coverage: Vec<CourseCoverage> = plan
            .demand
            .entries()
            .iter()
            .map(|d| {
                let key = (d.course_id.as_str(), d.shift);
                let seats = scheduled.get(&key).copied().unwrap_or(0);
                let placed = enrolled.get(&key).copied().unwrap_or(0);
                let row = CourseCoverage {
                    course_id: d.course_id.clone(),
                    shift: d.shift,
                    demand: d.demand,
                    target: d.target_capacity,
                    scheduled: seats,
                    gap: d.target_capacity.saturating_sub(seats),
                    enrolled: placed,
                    unserved: d.demand.saturating_sub(placed),
                };
                let summary = by_shift.entry(d.shift).or_default();
                summary.demand += row.demand;
                summary.target += row.target;
                summary.scheduled += row.scheduled;
                summary.gap += row.gap;
                summary.enrolled += row.enrolled;
                row
            })
            .collect();

        let groups: Vec<GroupUsage> = plan
            .groups
            .iter()
            .map(|g| GroupUsage {
                group_id: g.id.clone(),
                capacity: g.capacity,
                used: g.used(),
                remaining: g.remaining,
                fill_rate: g.fill_rate(),
            })
            .collect();

        let avg_fill_rate = if groups.is_empty() {
            0.0
        } else {
            groups.iter().map(|g| g.fill_rate).sum::<f64>() / groups.len() as f64
        };

        Self {
            seats_scheduled_total: plan.groups.iter().map(|g| g.capacity).sum(),
            seats_used_total: plan.groups.iter().map(|g| g.used()).sum(),
            assignment_count: plan.assignments.len(),
            coverage,
            by_shift,
            groups,
            avg_fill_rate,
        }
    }

    /// Coverage row of a course in a shift.
    pub fn coverage_for(&self, course_id: &str, shift: Shift) -> Option<&CourseCoverage> {
        self.coverage
            .iter()
            .find(|c| c.course_id == course_id && c.shift == shift)
    }

    /// IDs of catalog students with zero assignments, in catalog order.
    pub fn unassigned_students<'c>(plan: &EnrollmentPlan, catalog: &'c Catalog) -> Vec<&'c str> {
        let assigned: HashSet<&str> = plan
            .assignments
            .iter()
            .map(|a| a.student_id.as_str())
            .collect();
        catalog
            .students
            .iter()
            .map(|s| s.id.as_str())
            .filter(|id| !assigned.contains(id))
            .collect()
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_gap: u32, min_fill_rate: f64) -> bool {
        let total_gap: u32 = self.by_shift.values().map(|s| s.gap).sum();
        total_gap <= max_gap && self.avg_fill_rate >= min_fill_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::DemandTable;
    use crate::models::{
        Assignment, Course, Room, ScheduledGroup, Student, TimeSlot, Weekday,
    };

    fn group(id: &str, course: &str, capacity: u32, remaining: u32) -> ScheduledGroup {
        ScheduledGroup {
            id: id.into(),
            course_id: course.into(),
            shift: Shift::Morning,
            group_index: 1,
            room_id: "R1".into(),
            room_code: "R1".into(),
            capacity,
            remaining,
            meeting: TimeSlot::new(Shift::Morning, Weekday::Mon, 0, 420, 510),
        }
    }

    fn catalog() -> Catalog {
        // MATH: 3 morning students, ENG: 1 morning student
        Catalog::new()
            .with_room(Room::new("R1", 30))
            .with_course(Course::new("MATH"))
            .with_course(Course::new("ENG"))
            .with_student(Student::new("S1", Shift::Morning))
            .with_student(Student::new("S2", Shift::Morning))
            .with_student(Student::new("S3", Shift::Morning))
            .with_eligibility("S1", "MATH")
            .with_eligibility("S2", "MATH")
            .with_eligibility("S3", "MATH")
            .with_eligibility("S3", "ENG")
    }

    fn plan() -> EnrollmentPlan {
        EnrollmentPlan {
            groups: vec![group("G1", "MATH", 2, 0), group("G2", "MATH", 4, 4)],
            assignments: vec![
                Assignment::new("S1", "MATH", "G1"),
                Assignment::new("S2", "MATH", "G1"),
            ],
            demand: DemandTable::build(&catalog(), 1.0),
            passes_run: 1,
            added_per_pass: vec![2],
        }
    }

    #[test]
    fn test_kpi_totals() {
        let kpi = EnrollmentKpi::calculate(&plan());
        assert_eq!(kpi.seats_scheduled_total, 6);
        assert_eq!(kpi.seats_used_total, 2);
        assert_eq!(kpi.assignment_count, 2);
        // G1: 1.0, G2: 0.0
        assert!((kpi.avg_fill_rate - 0.5).abs() < 1e-10);
        assert!((kpi.groups[0].fill_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.groups[1].remaining, 4);
    }

    #[test]
    fn test_kpi_coverage() {
        let kpi = EnrollmentKpi::calculate(&plan());
        assert_eq!(kpi.coverage.len(), 2);

        let math = kpi.coverage_for("MATH", Shift::Morning).unwrap();
        assert_eq!(math.demand, 3);
        assert_eq!(math.target, 3);
        assert_eq!(math.scheduled, 6);
        assert_eq!(math.gap, 0);
        assert_eq!(math.enrolled, 2);
        assert_eq!(math.unserved, 1);

        let eng = kpi.coverage_for("ENG", Shift::Morning).unwrap();
        assert_eq!(eng.scheduled, 0);
        assert_eq!(eng.gap, 1);
        assert_eq!(eng.unserved, 1);

        let morning = &kpi.by_shift[&Shift::Morning];
        assert_eq!(morning.demand, 4);
        assert_eq!(morning.gap, 1);
        assert_eq!(morning.enrolled, 2);
        assert!(!kpi.by_shift.contains_key(&Shift::Evening));
    }

    #[test]
    fn test_unassigned_students() {
        let catalog = catalog();
        assert_eq!(EnrollmentKpi::unassigned_students(&plan(), &catalog), vec!["S3"]);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = EnrollmentKpi::calculate(&EnrollmentPlan::default());
        assert_eq!(kpi.seats_scheduled_total, 0);
        assert_eq!(kpi.assignment_count, 0);
        assert!(kpi.coverage.is_empty());
        assert!((kpi.avg_fill_rate - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let kpi = EnrollmentKpi::calculate(&plan());
        assert!(kpi.meets_thresholds(1, 0.5));
        assert!(!kpi.meets_thresholds(0, 0.0)); // ENG gap of 1
        assert!(!kpi.meets_thresholds(1, 0.6));
    }
}
