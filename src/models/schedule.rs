//! Section and enrollment result models.
//!
//! A `ScheduledGroup` is a concrete course offering bound to a room and a
//! weekly time slot. An `Assignment` places one student in one group.
//! `Violation` records a broken invariant found by a plan audit.

use serde::{Deserialize, Serialize};

use super::{Shift, TimeSlot};

/// A section: one course offered in one room at one time slot.
///
/// Created by a section allocator. Only `remaining` changes afterwards,
/// as students are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGroup {
    /// Run-scoped identifier (`G-{course}-{shift}-{day}-{slot}-{n}`).
    pub id: String,
    /// Offered course.
    pub course_id: String,
    /// Shift the section belongs to.
    pub shift: Shift,
    /// 1-based index of this section among the course's sections in the slot.
    pub group_index: u32,
    /// Hosting room.
    pub room_id: String,
    /// Hosting room code (denormalized for reporting).
    pub room_code: String,
    /// Seats (equal to the room capacity).
    pub capacity: u32,
    /// Seats not yet assigned. Always within `[0, capacity]`.
    pub remaining: u32,
    /// Meeting time.
    pub meeting: TimeSlot,
}

/// A student placed in a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned student.
    pub student_id: String,
    /// Course taken (denormalized from the group).
    pub course_id: String,
    /// Section the student sits in.
    pub group_id: String,
}

/// A broken scheduling invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (student, group, or course).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A group holds more students than seats.
    CapacityExceeded,
    /// A student sits in two meetings at the same time.
    DoubleBooking,
    /// A student takes the same course twice.
    CourseRepeated,
    /// A student exceeds the per-student course limit.
    QuotaExceeded,
    /// A student's same-day classes leave a gap in a no-break shift.
    BreakInDay,
    /// A course has more sections in one slot than allowed.
    SectionCapExceeded,
    /// A student was placed in a course they are not eligible for,
    /// or in a section outside their shift.
    NotEligible,
}

impl ScheduledGroup {
    /// Seats already taken.
    #[inline]
    pub fn used(&self) -> u32 {
        self.capacity.saturating_sub(self.remaining)
    }

    /// Fraction of seats taken (0.0 for a zero-capacity group).
    pub fn fill_rate(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.used() as f64 / self.capacity as f64
        }
    }

    /// Whether every seat is taken.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.remaining == 0
    }

    /// Takes one seat.
    ///
    /// # Panics
    /// Panics if the group is already full. A flow network never routes
    /// more students to a group than its remaining seats, so reaching
    /// this is an engine bug, not bad input.
    pub(crate) fn take_seat(&mut self) {
        assert!(
            self.remaining > 0,
            "group {} assigned beyond capacity {}",
            self.id,
            self.capacity
        );
        self.remaining -= 1;
    }
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: course_id.into(),
            group_id: group_id.into(),
        }
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn group(capacity: u32, remaining: u32) -> ScheduledGroup {
        ScheduledGroup {
            id: "G-C1-morning-Mon-0-1".into(),
            course_id: "C1".into(),
            shift: Shift::Morning,
            group_index: 1,
            room_id: "R1".into(),
            room_code: "A-101".into(),
            capacity,
            remaining,
            meeting: TimeSlot::new(Shift::Morning, Weekday::Mon, 0, 420, 510),
        }
    }

    #[test]
    fn test_group_fill() {
        let g = group(40, 10);
        assert_eq!(g.used(), 30);
        assert!((g.fill_rate() - 0.75).abs() < 1e-10);
        assert!(!g.is_full());
        assert!(group(40, 0).is_full());
        assert!((group(0, 0).fill_rate() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_take_seat() {
        let mut g = group(2, 2);
        g.take_seat();
        g.take_seat();
        assert!(g.is_full());
        assert_eq!(g.used(), 2);
    }

    #[test]
    #[should_panic(expected = "beyond capacity")]
    fn test_take_seat_overflow_panics() {
        let mut g = group(1, 0);
        g.take_seat();
    }

    #[test]
    fn test_violation_new() {
        let v = Violation::new(ViolationType::DoubleBooking, "S1", "two classes at Mon 07:00");
        assert_eq!(v.violation_type, ViolationType::DoubleBooking);
        assert_eq!(v.entity_id, "S1");
    }
}
