//! Input validation for enrollment runs.
//!
//! Checks configuration ranges and catalog integrity before scheduling.
//! Detects:
//! - Out-of-range tuning parameters
//! - Shift grids that are empty, too long, or run past midnight
//! - Duplicate IDs
//! - Rooms without seats
//! - Eligibility rows naming unknown students or courses
//! - Hand-built groups with more seats left than capacity
//!
//! Every check runs; all problems are reported together.

use std::collections::HashSet;
use std::fmt;

use crate::config::EngineConfig;
use crate::models::{Catalog, ScheduledGroup};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A tuning parameter is outside its allowed range.
    OutOfRange,
    /// A shift grid cannot be laid out.
    InvalidShift,
    /// Two entities share the same ID.
    DuplicateId,
    /// A room has no seats.
    ZeroCapacity,
    /// An eligibility row references a student or course that doesn't exist.
    UnknownReference,
    /// A group's seat counts are inconsistent.
    InvalidGroup,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::OutOfRange, message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Validates an engine configuration.
///
/// Checks:
/// 1. `max_courses_per_student` in 1..=20
/// 2. `max_sections_per_course_per_slot` ≥ 1
/// 3. `over_provision_factor` finite and ≥ 1
/// 4. `min_fill_rate`, if set, in [0, 1]
/// 5. `oversize_penalty` finite and ≥ 0
/// 6. `assignment_passes` ≥ 1
/// 7. Per shift: class duration in 30..=240 minutes, 1..=12 slots,
///    last class ends by 24:00, no repeated day
pub fn validate_config(config: &EngineConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !(1..=20).contains(&config.max_courses_per_student) {
        errors.push(ValidationError::out_of_range(format!(
            "max_courses_per_student must be in 1..=20, got {}",
            config.max_courses_per_student
        )));
    }
    if config.max_sections_per_course_per_slot == 0 {
        errors.push(ValidationError::out_of_range(
            "max_sections_per_course_per_slot must be at least 1",
        ));
    }
    let factor = config.over_provision_factor;
    if !factor.is_finite() || factor < 1.0 {
        errors.push(ValidationError::out_of_range(format!(
            "over_provision_factor must be finite and >= 1, got {factor}"
        )));
    }
    if let Some(rate) = config.min_fill_rate {
        if !(0.0..=1.0).contains(&rate) {
            errors.push(ValidationError::out_of_range(format!(
                "min_fill_rate must be in [0, 1], got {rate}"
            )));
        }
    }
    let penalty = config.oversize_penalty;
    if !penalty.is_finite() || penalty < 0.0 {
        errors.push(ValidationError::out_of_range(format!(
            "oversize_penalty must be finite and >= 0, got {penalty}"
        )));
    }
    if config.assignment_passes == 0 {
        errors.push(ValidationError::out_of_range(
            "assignment_passes must be at least 1",
        ));
    }

    for (shift, template) in &config.shifts {
        let duration = template.class_duration_minutes;
        if !(30..=240).contains(&duration) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShift,
                format!("{shift}: class_duration_minutes must be in 30..=240, got {duration}"),
            ));
        }
        let slots = template.slots_per_day;
        if !(1..=12).contains(&slots) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShift,
                format!("{shift}: slots_per_day must be in 1..=12, got {slots}"),
            ));
        }
        if template.day_end_minute() > MINUTES_PER_DAY {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShift,
                format!(
                    "{shift}: last class starting {} ends after midnight",
                    template.start
                ),
            ));
        }
        let mut seen = HashSet::new();
        for day in &template.days {
            if !seen.insert(*day) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidShift,
                    format!("{shift}: day {day} listed twice"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates catalog integrity.
///
/// Checks:
/// 1. No duplicate room, course, or student IDs
/// 2. Every room has at least one seat
/// 3. Every eligibility row names an existing student and course
///
/// Duplicate eligibility pairs are not errors; they count once.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for room in &catalog.rooms {
        if !room_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("Room '{}' has no seats", room.id),
            ));
        }
    }

    let mut course_ids = HashSet::new();
    for course in &catalog.courses {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
    }

    let mut student_ids = HashSet::new();
    for student in &catalog.students {
        if !student_ids.insert(student.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", student.id),
            ));
        }
    }

    for e in &catalog.eligibilities {
        if !student_ids.contains(e.student_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!(
                    "Eligibility ({}, {}) references unknown student",
                    e.student_id, e.course_id
                ),
            ));
        }
        if !course_ids.contains(e.course_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!(
                    "Eligibility ({}, {}) references unknown course",
                    e.student_id, e.course_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates pre-built groups before assignment.
///
/// Checks unique group IDs and `remaining <= capacity`.
pub fn validate_groups(groups: &[ScheduledGroup]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for g in groups {
        if !ids.insert(g.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group ID: {}", g.id),
            ));
        }
        if g.remaining > g.capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidGroup,
                format!(
                    "Group '{}' has {} seats left but capacity {}",
                    g.id, g.remaining, g.capacity
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
