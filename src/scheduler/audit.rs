//! Post-hoc invariant audit of a finished plan.
//!
//! Re-derives every scheduling invariant from the plan alone, without
//! trusting the run state that produced it:
//! - assignments per group never exceed capacity, and `remaining` agrees
//! - no student sits in two overlapping meetings
//! - no student takes a course twice or exceeds the course limit
//! - students only join eligible courses in their own shift
//! - no-break shifts leave no gaps within a student's day
//! - no course opens more sections in one slot than allowed

use std::collections::{BTreeMap, HashMap, HashSet};

use super::EnrollmentPlan;
use crate::config::EngineConfig;
use crate::models::{Catalog, ScheduledGroup, Shift, TimeSlot, Violation, ViolationType, Weekday};

/// Audits a plan and returns every violation found.
///
/// An empty vector means the plan is sound.
pub fn audit_plan(plan: &EnrollmentPlan, catalog: &Catalog, config: &EngineConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    let groups: HashMap<&str, &ScheduledGroup> =
        plan.groups.iter().map(|g| (g.id.as_str(), g)).collect();

    check_capacity(plan, &mut violations);
    check_section_cap(plan, config, &mut violations);

    let eligible: HashSet<(&str, &str)> = catalog
        .eligibilities
        .iter()
        .map(|e| (e.student_id.as_str(), e.course_id.as_str()))
        .collect();
    let shift_of: HashMap<&str, Shift> = catalog
        .students
        .iter()
        .map(|s| (s.id.as_str(), s.shift))
        .collect();

    // student → meetings, in assignment order
    let mut schedule: BTreeMap<&str, Vec<(&str, TimeSlot)>> = BTreeMap::new();
    for a in &plan.assignments {
        let Some(group) = groups.get(a.group_id.as_str()) else {
            violations.push(Violation::new(
                ViolationType::NotEligible,
                a.student_id.as_str(),
                format!("assigned to unknown group {}", a.group_id),
            ));
            continue;
        };
        if !eligible.contains(&(a.student_id.as_str(), group.course_id.as_str())) {
            violations.push(Violation::new(
                ViolationType::NotEligible,
                a.student_id.as_str(),
                format!("not eligible for {}", group.course_id),
            ));
        }
        if shift_of.get(a.student_id.as_str()) != Some(&group.shift) {
            violations.push(Violation::new(
                ViolationType::NotEligible,
                a.student_id.as_str(),
                format!("group {} is outside the student's shift", group.id),
            ));
        }
        schedule
            .entry(a.student_id.as_str())
            .or_default()
            .push((group.course_id.as_str(), group.meeting));
    }

    for (student, meetings) in &schedule {
        check_student(student, meetings, config, &mut violations);
    }

    violations
}

fn check_capacity(plan: &EnrollmentPlan, violations: &mut Vec<Violation>) {
    let mut seated: HashMap<&str, u32> = HashMap::new();
    for a in &plan.assignments {
        *seated.entry(a.group_id.as_str()).or_default() += 1;
    }
    for g in &plan.groups {
        let n = seated.get(g.id.as_str()).copied().unwrap_or(0);
        if n > g.capacity || g.remaining > g.capacity || g.capacity - g.remaining != n {
            violations.push(Violation::new(
                ViolationType::CapacityExceeded,
                g.id.as_str(),
                format!(
                    "{n} assignments, capacity {}, remaining {}",
                    g.capacity, g.remaining
                ),
            ));
        }
    }
}

fn check_section_cap(plan: &EnrollmentPlan, config: &EngineConfig, violations: &mut Vec<Violation>) {
    let mut per_slot: BTreeMap<(&str, Shift, Weekday, u32), u32> = BTreeMap::new();
    for g in &plan.groups {
        let m = &g.meeting;
        *per_slot
            .entry((g.course_id.as_str(), m.shift, m.day, m.index))
            .or_default() += 1;
    }
    for ((course, shift, day, index), n) in per_slot {
        if n > config.max_sections_per_course_per_slot {
            violations.push(Violation::new(
                ViolationType::SectionCapExceeded,
                course,
                format!("{n} sections at {shift} {day} #{index}"),
            ));
        }
    }
}

fn check_student(
    student: &str,
    meetings: &[(&str, TimeSlot)],
    config: &EngineConfig,
    violations: &mut Vec<Violation>,
) {
    if meetings.len() > config.max_courses_per_student as usize {
        violations.push(Violation::new(
            ViolationType::QuotaExceeded,
            student,
            format!(
                "{} courses, limit {}",
                meetings.len(),
                config.max_courses_per_student
            ),
        ));
    }

    let mut courses = HashSet::new();
    for (course, _) in meetings {
        if !courses.insert(*course) {
            violations.push(Violation::new(
                ViolationType::CourseRepeated,
                student,
                format!("takes {course} more than once"),
            ));
        }
    }

    for (i, (_, a)) in meetings.iter().enumerate() {
        for (_, b) in &meetings[i + 1..] {
            if a.conflicts_with(b) {
                violations.push(Violation::new(
                    ViolationType::DoubleBooking,
                    student,
                    format!("{a} overlaps {b}"),
                ));
            }
        }
    }

    let mut days: BTreeMap<(Shift, Weekday), Vec<u32>> = BTreeMap::new();
    for (_, m) in meetings {
        if !config.allows_breaks(m.shift) {
            days.entry((m.shift, m.day)).or_default().push(m.index);
        }
    }
    for ((shift, day), mut indices) in days {
        indices.sort_unstable();
        let gap_free = indices.windows(2).all(|w| w[1] == w[0] + 1);
        if !gap_free {
            violations.push(Violation::new(
                ViolationType::BreakInDay,
                student,
                format!("{shift} {day} slots {indices:?} are not consecutive"),
            ));
        }
    }
}
