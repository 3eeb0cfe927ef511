//! Enrollment domain models.
//!
//! Provides the input catalog (rooms, courses, students, eligibility), the
//! weekly calendar primitives (shifts, weekdays, time slots), and the result
//! types produced by a scheduling run (sections, assignments, violations).
//!
//! # Domain Mappings
//!
//! | u-enroll | University | Training center | Clinic |
//! |----------|------------|-----------------|--------|
//! | Course | Subject | Workshop | Therapy type |
//! | Room | Classroom | Lab | Treatment room |
//! | ScheduledGroup | Section | Cohort | Session block |
//! | Assignment | Enrollment | Seat booking | Appointment |

mod calendar;
mod catalog;
mod schedule;

pub use calendar::{ClockTime, ClockTimeError, Shift, TimeSlot, Weekday};
pub use catalog::{Catalog, Course, Eligibility, Room, Student};
pub use schedule::{Assignment, ScheduledGroup, Violation, ViolationType};
