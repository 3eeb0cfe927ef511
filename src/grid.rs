//! Weekly time grid construction.
//!
//! Expands each shift template into its ordered meeting windows: one
//! [`TimeSlot`] per (active day, slot index), with
//! `start = shift_start + index × duration` and `end = start + duration`.
//!
//! A template with zero duration or zero slots per day yields no slots for
//! that shift. This is a valid degenerate grid, not an error.

use std::collections::BTreeMap;

use crate::config::{EngineConfig, ShiftConfig};
use crate::models::{Shift, TimeSlot};

/// Meeting windows of every configured shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeGrid {
    slots: BTreeMap<Shift, Vec<TimeSlot>>,
}

impl TimeGrid {
    /// Builds the grid for all shifts in a configuration.
    pub fn build(config: &EngineConfig) -> Self {
        let slots = config
            .shifts
            .iter()
            .map(|(&shift, template)| (shift, shift_slots(shift, template)))
            .collect();
        Self { slots }
    }

    /// Slots of one shift in chronological order (day, then index).
    ///
    /// Empty if the shift is not configured.
    pub fn shift_slots(&self, shift: Shift) -> &[TimeSlot] {
        self.slots.get(&shift).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Shifts with at least one slot.
    pub fn shifts(&self) -> impl Iterator<Item = Shift> + '_ {
        self.slots
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(&shift, _)| shift)
    }

    /// All slots of all shifts in chronological order.
    ///
    /// Ordered by (day, start minute, shift, index).
    pub fn chronological(&self) -> Vec<TimeSlot> {
        let mut all: Vec<TimeSlot> = self.slots.values().flatten().copied().collect();
        all.sort_by_key(TimeSlot::chronological_key);
        all
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Whether the grid has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Expands one shift template.
///
/// Days are visited in weekday order; duplicate days are ignored.
pub fn shift_slots(shift: Shift, template: &ShiftConfig) -> Vec<TimeSlot> {
    let duration = template.class_duration_minutes;
    if duration == 0 || template.slots_per_day == 0 {
        return Vec::new();
    }

    let mut days = template.days.clone();
    days.sort();
    days.dedup();

    let start = template.start.minutes();
    let mut slots = Vec::new();
    for day in days {
        for index in 0..template.slots_per_day {
            // Unvalidated templates may run past u32 minutes; the rest of the day is dropped.
            let Some((slot_start, slot_end)) = index
                .checked_mul(duration)
                .and_then(|offset| start.checked_add(offset))
                .and_then(|s| s.checked_add(duration).map(|e| (s, e)))
            else {
                break;
            };
            slots.push(TimeSlot::new(shift, day, index, slot_start, slot_end));
        }
    }
    slots
}
