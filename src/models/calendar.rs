//! Weekly calendar primitives.
//!
//! Defines the weekday and shift enumerations, wall-clock times, and the
//! generated `TimeSlot` meeting windows that sections are bound to.
//!
//! # Time Model
//! Times are minutes since midnight. A slot occupies the half-open
//! interval `[start_minute, end_minute)` on a single weekday, so two
//! back-to-back classes do not overlap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Monday through Friday.
    pub const WORKDAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Short English label (`"Mon"`, `"Tue"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Daily schedule template a student belongs to.
///
/// Each shift has its own time grid and contiguity rule
/// (see [`ShiftConfig`](crate::config::ShiftConfig)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// Weekday mornings.
    Morning,
    /// Weekday evenings.
    Evening,
    /// Saturday-only program.
    Saturday,
    /// Sunday-only program.
    Sunday,
}

impl Shift {
    /// All shifts in canonical order.
    pub const ALL: [Shift; 4] = [Shift::Morning, Shift::Evening, Shift::Saturday, Shift::Sunday];

    /// Lowercase identifier used in group IDs and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Evening => "evening",
            Shift::Saturday => "saturday",
            Shift::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock time of day, stored as minutes since midnight.
///
/// Serialized as `"HH:MM"`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

/// Error parsing an `HH:MM` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time '{0}', expected HH:MM")]
pub struct ClockTimeError(pub String);

impl ClockTime {
    /// Builds a time from hours and minutes.
    ///
    /// Returns `None` when `hour > 23` or `minute > 59`.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ClockTimeError(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(err());
        }
        let hour: u32 = h.parse().map_err(|_| err())?;
        let minute: u32 = m.parse().map_err(|_| err())?;
        Self::from_hm(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One weekly meeting window of a shift.
///
/// Generated by the [`TimeGrid`](crate::grid::TimeGrid), never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Owning shift.
    pub shift: Shift,
    /// Day of the week.
    pub day: Weekday,
    /// Position within the shift's day (0-based).
    pub index: u32,
    /// Start (minutes since midnight, inclusive).
    pub start_minute: u32,
    /// End (minutes since midnight, exclusive).
    pub end_minute: u32,
}

impl TimeSlot {
    /// Creates a slot.
    pub fn new(shift: Shift, day: Weekday, index: u32, start_minute: u32, end_minute: u32) -> Self {
        Self {
            shift,
            day,
            index,
            start_minute,
            end_minute,
        }
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Whether two slots meet at the same time: same day and
    /// overlapping minute ranges.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.day == other.day
            && self.start_minute < other.end_minute
            && other.start_minute < self.end_minute
    }

    /// Chronological sort key across shifts.
    pub(crate) fn chronological_key(&self) -> (Weekday, u32, Shift, u32) {
        (self.day, self.start_minute, self.shift, self.index)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} #{} {:02}:{:02}-{:02}:{:02}",
            self.shift,
            self.day,
            self.index,
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_parse() {
        let t: ClockTime = "07:30".parse().unwrap();
        assert_eq!(t.minutes(), 450);
        assert_eq!(t.to_string(), "07:30");

        assert!("7:30".parse::<ClockTime>().is_err());
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_clock_time_serde() {
        let t = ClockTime::from_hm(16, 5).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"16:05\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn test_slot_conflicts() {
        let a = TimeSlot::new(Shift::Morning, Weekday::Mon, 0, 420, 510);
        let b = TimeSlot::new(Shift::Evening, Weekday::Mon, 0, 480, 570);
        let c = TimeSlot::new(Shift::Morning, Weekday::Mon, 1, 510, 600); // back-to-back
        let d = TimeSlot::new(Shift::Morning, Weekday::Tue, 0, 420, 510);

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
        assert!(!a.conflicts_with(&d));
        assert_eq!(a.duration_minutes(), 90);
    }

    #[test]
    fn test_shift_serde_names() {
        assert_eq!(serde_json::to_string(&Shift::Saturday).unwrap(), "\"saturday\"");
        assert_eq!(serde_json::to_string(&Weekday::Thu).unwrap(), "\"thu\"");
        assert_eq!(Shift::Evening.to_string(), "evening");
    }
}
