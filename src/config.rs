//! Engine configuration.
//!
//! Load tuning parameters and per-shift time grids from TOML, or start from
//! the defaults and adjust with builder methods.
//!
//! # Examples
//!
//! ```
//! use u_enroll::config::EngineConfig;
//! use u_enroll::models::Shift;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     max_courses_per_student = 4
//!     over_provision_factor = 1.2
//!     min_fill_rate = 0.4
//!
//!     [shifts.morning]
//!     start = "07:00"
//!     class_duration_minutes = 90
//!     slots_per_day = 5
//!     days = ["mon", "tue", "wed", "thu", "fri"]
//!     allow_breaks = false
//! "#).unwrap();
//!
//! assert_eq!(config.max_courses_per_student, 4);
//! assert_eq!(config.min_fill_rate, Some(0.4));
//! assert!(!config.shift(Shift::Morning).unwrap().allow_breaks);
//! // Shifts not listed in the file are not scheduled.
//! assert!(config.shift(Shift::Sunday).is_none());
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ClockTime, Shift, Weekday};
use crate::validation::{self, ValidationError};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tuning parameters and time grids for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum assignments per student.
    pub max_courses_per_student: u32,
    /// Maximum sections of one course opened in the same slot.
    pub max_sections_per_course_per_slot: u32,
    /// Seat target multiplier over raw demand (≥ 1).
    pub over_provision_factor: f64,
    /// Minimum expected fill ratio to open a section (`None` = no filter).
    pub min_fill_rate: Option<f64>,
    /// Best-fit penalty per seat a room exceeds the remaining gap.
    pub oversize_penalty: f64,
    /// Number of alternating assignment passes.
    pub assignment_passes: u32,
    /// Stop early once a pass adds no assignment.
    pub stop_when_stable: bool,
    /// Time grid per shift. Shifts absent here get no slots.
    pub shifts: BTreeMap<Shift, ShiftConfig>,
}

/// Daily schedule template for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConfig {
    /// Start of the first class.
    pub start: ClockTime,
    /// Length of every class.
    pub class_duration_minutes: u32,
    /// Classes per day.
    pub slots_per_day: u32,
    /// Days the shift meets.
    pub days: Vec<Weekday>,
    /// Whether a student's classes on one day may leave gaps.
    #[serde(default = "default_allow_breaks")]
    pub allow_breaks: bool,
}

fn default_allow_breaks() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        let shifts = Shift::ALL
            .iter()
            .map(|&shift| (shift, ShiftConfig::default_for(shift)))
            .collect();
        Self {
            max_courses_per_student: 5,
            max_sections_per_course_per_slot: 2,
            over_provision_factor: 1.15,
            min_fill_rate: None,
            oversize_penalty: 0.25,
            assignment_passes: 6,
            stop_when_stable: true,
            shifts,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration (all four shifts).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is unreadable or contains invalid TOML.
    /// Values are not range-checked; call [`EngineConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Checks value ranges and shift grids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self).map_err(ConfigError::Invalid)
    }

    /// Configuration for a shift, if it is scheduled.
    pub fn shift(&self, shift: Shift) -> Option<&ShiftConfig> {
        self.shifts.get(&shift)
    }

    /// Whether students of `shift` may have gaps between same-day classes.
    ///
    /// Unconfigured shifts allow breaks.
    pub fn allows_breaks(&self, shift: Shift) -> bool {
        self.shift(shift).map_or(true, |s| s.allow_breaks)
    }

    /// Sets the per-student course limit.
    pub fn with_max_courses_per_student(mut self, max: u32) -> Self {
        self.max_courses_per_student = max;
        self
    }

    /// Sets the per-course-per-slot section limit.
    pub fn with_max_sections_per_course_per_slot(mut self, max: u32) -> Self {
        self.max_sections_per_course_per_slot = max;
        self
    }

    /// Sets the over-provisioning factor.
    pub fn with_over_provision_factor(mut self, factor: f64) -> Self {
        self.over_provision_factor = factor;
        self
    }

    /// Sets the minimum fill rate filter.
    pub fn with_min_fill_rate(mut self, rate: f64) -> Self {
        self.min_fill_rate = Some(rate);
        self
    }

    /// Sets the best-fit oversize penalty.
    pub fn with_oversize_penalty(mut self, penalty: f64) -> Self {
        self.oversize_penalty = penalty;
        self
    }

    /// Sets the number of assignment passes.
    pub fn with_assignment_passes(mut self, passes: u32) -> Self {
        self.assignment_passes = passes;
        self
    }

    /// Enables or disables the early exit on a stable pass.
    pub fn with_stop_when_stable(mut self, stop: bool) -> Self {
        self.stop_when_stable = stop;
        self
    }

    /// Replaces all shifts with a single one.
    pub fn with_only_shift(mut self, shift: Shift, config: ShiftConfig) -> Self {
        self.shifts.clear();
        self.shifts.insert(shift, config);
        self
    }

    /// Adds or replaces a shift.
    pub fn with_shift(mut self, shift: Shift, config: ShiftConfig) -> Self {
        self.shifts.insert(shift, config);
        self
    }
}

impl ShiftConfig {
    /// Creates a shift template meeting on the given days, breaks allowed.
    pub fn new(
        start: ClockTime,
        class_duration_minutes: u32,
        slots_per_day: u32,
        days: Vec<Weekday>,
    ) -> Self {
        Self {
            start,
            class_duration_minutes,
            slots_per_day,
            days,
            allow_breaks: true,
        }
    }

    /// Default template of a shift.
    ///
    /// | Shift | Start | Slots | Days |
    /// |-------|-------|-------|------|
    /// | morning | 07:00 | 5 | Mon-Fri |
    /// | evening | 16:00 | 4 | Mon-Fri |
    /// | saturday | 08:00 | 4 | Sat |
    /// | sunday | 08:00 | 4 | Sun |
    ///
    /// Classes last 90 minutes and breaks are allowed.
    pub fn default_for(shift: Shift) -> Self {
        let (hour, slots, days) = match shift {
            Shift::Morning => (7, 5, Weekday::WORKDAYS.to_vec()),
            Shift::Evening => (16, 4, Weekday::WORKDAYS.to_vec()),
            Shift::Saturday => (8, 4, vec![Weekday::Sat]),
            Shift::Sunday => (8, 4, vec![Weekday::Sun]),
        };
        Self::new(ClockTime::from_hm(hour, 0).unwrap_or_default(), 90, slots, days)
    }

    /// Sets whether same-day gaps are allowed.
    pub fn with_allow_breaks(mut self, allow: bool) -> Self {
        self.allow_breaks = allow;
        self
    }

    /// Minute at which the last class of the day ends.
    ///
    /// Widened to `u64` so out-of-range templates cannot overflow.
    pub fn day_end_minute(&self) -> u64 {
        u64::from(self.start.minutes())
            + u64::from(self.class_duration_minutes) * u64::from(self.slots_per_day)
    }
}
