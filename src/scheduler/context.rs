//! Run-scoped mutable scheduling state.
//!
//! Everything that changes while students are assigned lives here:
//! remaining seats per group, each student's load, taken courses, and
//! occupied slots. A context belongs to one run and is threaded through
//! every pass and slot; it is never shared between runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::EngineConfig;
use crate::models::{Assignment, Catalog, ScheduledGroup, Shift, TimeSlot, Weekday};

/// Per-student assignment state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentState {
    assigned: u32,
    taken: BTreeSet<usize>,
    occupied: BTreeMap<(Shift, Weekday), BTreeSet<u32>>,
    meetings: Vec<TimeSlot>,
}

impl StudentState {
    /// Number of assignments so far.
    #[inline]
    pub fn assigned_count(&self) -> u32 {
        self.assigned
    }

    /// Whether the student already holds the course (by catalog index).
    #[inline]
    pub fn has_taken(&self, course: usize) -> bool {
        self.taken.contains(&course)
    }

    /// Whether a meeting at `slot` would overlap an existing one.
    pub fn conflicts_with(&self, slot: &TimeSlot) -> bool {
        self.meetings.iter().any(|m| m.conflicts_with(slot))
    }

    /// Occupied slot indices of a shift on a day.
    pub fn occupied_indices(&self, shift: Shift, day: Weekday) -> Option<&BTreeSet<u32>> {
        self.occupied.get(&(shift, day))
    }

    /// Whether `slot` keeps the student's day gap-free.
    ///
    /// True for a free day, or when the slot index sits exactly one above
    /// the highest or one below the lowest occupied index.
    pub fn extends_block(&self, slot: &TimeSlot) -> bool {
        let Some(indices) = self.occupied_indices(slot.shift, slot.day) else {
            return true;
        };
        match (indices.first(), indices.last()) {
            (Some(&lo), Some(&hi)) => slot.index == hi + 1 || slot.index + 1 == lo,
            _ => true,
        }
    }

    fn record(&mut self, course: usize, slot: TimeSlot) {
        self.assigned += 1;
        self.taken.insert(course);
        self.occupied
            .entry((slot.shift, slot.day))
            .or_default()
            .insert(slot.index);
        self.meetings.push(slot);
    }
}

/// Explicit state of one scheduling run.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
    /// Eligible course indices per student index.
    eligible: Vec<BTreeSet<usize>>,
    /// Course index per group; `None` if the group names an unknown course.
    group_course: Vec<Option<usize>>,
    students: Vec<StudentState>,
    groups: Vec<ScheduledGroup>,
    assignments: Vec<Assignment>,
}

impl<'a> RunContext<'a> {
    /// Creates a fresh context over freshly allocated groups.
    ///
    /// Remaining seats are clamped to each group's capacity.
    pub fn new(
        catalog: &'a Catalog,
        config: &'a EngineConfig,
        mut groups: Vec<ScheduledGroup>,
    ) -> Self {
        for g in &mut groups {
            g.remaining = g.remaining.min(g.capacity);
        }
        let course_index: HashMap<&str, usize> = catalog
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), i))
            .collect();
        let student_index: HashMap<&str, usize> = catalog
            .students
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        let mut eligible = vec![BTreeSet::new(); catalog.students.len()];
        for e in &catalog.eligibilities {
            if let (Some(&s), Some(&c)) = (
                student_index.get(e.student_id.as_str()),
                course_index.get(e.course_id.as_str()),
            ) {
                eligible[s].insert(c);
            }
        }

        let group_course = groups
            .iter()
            .map(|g| course_index.get(g.course_id.as_str()).copied())
            .collect();

        Self {
            catalog,
            config,
            eligible,
            group_course,
            students: vec![StudentState::default(); catalog.students.len()],
            groups,
            assignments: Vec::new(),
        }
    }

    /// Input catalog.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Run configuration.
    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Groups with their current remaining seats.
    pub fn groups(&self) -> &[ScheduledGroup] {
        &self.groups
    }

    /// Assignments made so far, in creation order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// State of a student by catalog index.
    pub fn student_state(&self, student: usize) -> &StudentState {
        &self.students[student]
    }

    /// Course index of a group.
    pub fn group_course(&self, group: usize) -> Option<usize> {
        self.group_course[group]
    }

    /// Whether a student (by index) may take a course (by index).
    pub fn is_eligible(&self, student: usize, course: usize) -> bool {
        self.eligible[student].contains(&course)
    }

    /// Indices of groups meeting at `slot` with seats left, in allocation order.
    pub fn open_groups_at(&self, slot: &TimeSlot) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.meeting == *slot && g.remaining > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether any group (full or not) meets at `slot`.
    pub fn has_groups_at(&self, slot: &TimeSlot) -> bool {
        self.groups.iter().any(|g| g.meeting == *slot)
    }

    /// Places a student in a group and updates all run state.
    ///
    /// # Panics
    /// Panics if the group is full or names an unknown course; the flow
    /// network never produces either.
    pub(crate) fn record(&mut self, student: usize, group: usize) {
        let course = self.group_course[group]
            .unwrap_or_else(|| panic!("group {} has no catalog course", self.groups[group].id));
        let g = &mut self.groups[group];
        g.take_seat();
        self.students[student].record(course, g.meeting);
        self.assignments.push(Assignment::new(
            self.catalog.students[student].id.as_str(),
            g.course_id.as_str(),
            g.id.as_str(),
        ));
    }

    /// Consumes the context, returning final groups and assignments.
    pub fn into_parts(self) -> (Vec<ScheduledGroup>, Vec<Assignment>) {
        (self.groups, self.assignments)
    }
}
