//! Course demand model.
//!
//! Aggregates the eligibility relation into per-(course, shift) demand and
//! derives an over-provisioned seat target:
//!
//! ```text
//! demand(c, s) = |{ students in shift s eligible for c }|
//! target(c, s) = ceil(demand(c, s) × over_provision_factor)
//! ```
//!
//! The factor (≥ 1) deliberately schedules more seats than raw demand so
//! that conflicts and contiguity rules do not strand students.
//! Courses with zero demand in a shift have no entry and are skipped by
//! the allocator.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Catalog, Shift};

/// Absorbs float noise that lands `demand × factor` just above an integer.
const TARGET_EPSILON: f64 = 1e-9;

/// Demand and seat target of one course in one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDemand {
    /// Course identifier.
    pub course_id: String,
    /// Shift the demand comes from.
    pub shift: Shift,
    /// Eligible students of that shift.
    pub demand: u32,
    /// Seats the allocator aims to open.
    pub target_capacity: u32,
}

/// Demand entries with non-zero demand, in catalog course order then
/// shift order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandTable {
    entries: Vec<CourseDemand>,
}

impl DemandTable {
    /// Aggregates demand from a catalog.
    ///
    /// Duplicate eligibility pairs count once. Pairs naming an unknown
    /// student or course are skipped with a warning.
    pub fn build(catalog: &Catalog, over_provision_factor: f64) -> Self {
        let course_index: HashMap<&str, usize> = catalog
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), i))
            .collect();
        let student_shift: HashMap<&str, Shift> = catalog
            .students
            .iter()
            .map(|s| (s.id.as_str(), s.shift))
            .collect();

        let mut pairs: BTreeSet<(usize, Shift, &str)> = BTreeSet::new();
        for e in &catalog.eligibilities {
            let Some(&course) = course_index.get(e.course_id.as_str()) else {
                warn!(course_id = %e.course_id, student_id = %e.student_id, "eligibility for unknown course skipped");
                continue;
            };
            let Some(&shift) = student_shift.get(e.student_id.as_str()) else {
                warn!(course_id = %e.course_id, student_id = %e.student_id, "eligibility for unknown student skipped");
                continue;
            };
            pairs.insert((course, shift, e.student_id.as_str()));
        }

        let mut counts: Vec<((usize, Shift), u32)> = Vec::new();
        for (course, shift, _) in pairs {
            match counts.last_mut() {
                Some((key, n)) if *key == (course, shift) => *n += 1,
                _ => counts.push(((course, shift), 1)),
            }
        }

        let entries = counts
            .into_iter()
            .map(|((course, shift), demand)| CourseDemand {
                course_id: catalog.courses[course].id.clone(),
                shift,
                demand,
                target_capacity: target_capacity(demand, over_provision_factor),
            })
            .collect();
        Self { entries }
    }

    /// All entries.
    pub fn entries(&self) -> &[CourseDemand] {
        &self.entries
    }

    /// Entries of one shift, in catalog course order.
    pub fn for_shift(&self, shift: Shift) -> impl Iterator<Item = &CourseDemand> + '_ {
        self.entries.iter().filter(move |e| e.shift == shift)
    }

    /// Looks up one (course, shift) entry.
    pub fn get(&self, course_id: &str, shift: Shift) -> Option<&CourseDemand> {
        self.entries
            .iter()
            .find(|e| e.course_id == course_id && e.shift == shift)
    }

    /// Demand of a (course, shift), zero if absent.
    pub fn demand(&self, course_id: &str, shift: Shift) -> u32 {
        self.get(course_id, shift).map_or(0, |e| e.demand)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is no demand at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Over-provisioned seat target: `ceil(demand × factor)`.
pub fn target_capacity(demand: u32, over_provision_factor: f64) -> u32 {
    let raw = demand as f64 * over_provision_factor;
    (raw - TARGET_EPSILON).ceil().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Student};

    fn catalog() -> Catalog {
        Catalog::new()
            .with_course(Course::new("C1"))
            .with_course(Course::new("C2"))
            .with_course(Course::new("C3"))
            .with_student(Student::new("S1", Shift::Morning))
            .with_student(Student::new("S2", Shift::Morning))
            .with_student(Student::new("S3", Shift::Evening))
            .with_eligibility("S1", "C2")
            .with_eligibility("S2", "C2")
            .with_eligibility("S3", "C2")
            .with_eligibility("S1", "C1")
    }

    #[test]
    fn test_demand_by_course_and_shift() {
        let table = DemandTable::build(&catalog(), 1.0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.demand("C1", Shift::Morning), 1);
        assert_eq!(table.demand("C2", Shift::Morning), 2);
        assert_eq!(table.demand("C2", Shift::Evening), 1);
        assert_eq!(table.demand("C3", Shift::Morning), 0);
        assert!(table.get("C3", Shift::Morning).is_none());
    }

    #[test]
    fn test_entries_follow_catalog_order() {
        let table = DemandTable::build(&catalog(), 1.0);
        let keys: Vec<(&str, Shift)> = table
            .entries()
            .iter()
            .map(|e| (e.course_id.as_str(), e.shift))
            .collect();
        assert_eq!(
            keys,
            vec![("C1", Shift::Morning), ("C2", Shift::Morning), ("C2", Shift::Evening)]
        );
        let morning: Vec<&str> = table
            .for_shift(Shift::Morning)
            .map(|e| e.course_id.as_str())
            .collect();
        assert_eq!(morning, vec!["C1", "C2"]);
    }

    #[test]
    fn test_duplicates_and_unknown_references_ignored() {
        let catalog = catalog()
            .with_eligibility("S1", "C2") // duplicate
            .with_eligibility("S9", "C2") // unknown student
            .with_eligibility("S1", "C9"); // unknown course
        let table = DemandTable::build(&catalog, 1.0);
        assert_eq!(table.demand("C2", Shift::Morning), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_target_capacity() {
        assert_eq!(target_capacity(40, 1.0), 40);
        assert_eq!(target_capacity(40, 1.15), 46);
        assert_eq!(target_capacity(10, 1.15), 12); // 11.5 → 12
        assert_eq!(target_capacity(100, 1.15), 115);
        assert_eq!(target_capacity(3, 1.5), 5); // 4.5 → 5
        assert_eq!(target_capacity(0, 1.15), 0);
    }

    #[test]
    fn test_target_in_table() {
        let table = DemandTable::build(&catalog(), 1.5);
        assert_eq!(table.get("C2", Shift::Morning).unwrap().target_capacity, 3);
        assert_eq!(table.get("C1", Shift::Morning).unwrap().target_capacity, 2);
    }

    #[test]
    fn test_empty_catalog() {
        let table = DemandTable::build(&Catalog::new(), 1.15);
        assert!(table.is_empty());
    }
}
