//! Best-fit section allocator.
//!
//! # Algorithm
//!
//! For each shift, walk its slots chronologically. Within a slot, visit
//! rooms by capacity (largest first) and give each room to the course
//! maximizing
//!
//! ```text
//! gap   = max(0, target − seats already scheduled for the course in this shift)
//! fit   = min(capacity, gap)
//! score = fit − α × max(0, capacity − gap)
//! ```
//!
//! Courses already holding the per-slot section cap are skipped. With a
//! minimum fill rate, pairs whose `fit / capacity` falls below it are
//! discarded. A room with no positive-score candidate stays empty for
//! that slot. Placements are never revisited.
//!
//! # Complexity
//! O(S × R × C) for S slots, R rooms, C courses with demand.

use tracing::debug;

use super::SectionAllocator;
use crate::config::EngineConfig;
use crate::demand::{CourseDemand, DemandTable};
use crate::grid::TimeGrid;
use crate::models::{Room, ScheduledGroup, TimeSlot};

/// Greedy best-fit room-to-course packer.
///
/// # Example
///
/// ```
/// use u_enroll::allocation::{BestFitAllocator, SectionAllocator};
/// use u_enroll::config::{EngineConfig, ShiftConfig};
/// use u_enroll::demand::DemandTable;
/// use u_enroll::grid::TimeGrid;
/// use u_enroll::models::{Catalog, ClockTime, Course, Room, Shift, Student, Weekday};
///
/// let mut catalog = Catalog::new()
///     .with_room(Room::new("R1", 30))
///     .with_course(Course::new("C1"));
/// for i in 0..40 {
///     let id = format!("S{i}");
///     catalog = catalog
///         .with_student(Student::new(id.as_str(), Shift::Morning))
///         .with_eligibility(id.as_str(), "C1");
/// }
/// let config = EngineConfig::default()
///     .with_over_provision_factor(1.0)
///     .with_only_shift(
///         Shift::Morning,
///         ShiftConfig::new(ClockTime::from_hm(7, 0).unwrap(), 90, 1, vec![Weekday::Mon]),
///     );
///
/// let demand = DemandTable::build(&catalog, config.over_provision_factor);
/// let groups = BestFitAllocator::from_config(&config)
///     .allocate(&TimeGrid::build(&config), &catalog.rooms, &demand);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].capacity, 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BestFitAllocator {
    max_sections_per_slot: u32,
    oversize_penalty: f64,
    min_fill_rate: Option<f64>,
}

/// A candidate course for the current room.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    entry: usize,
    score: f64,
    fit: u32,
}

impl BestFitAllocator {
    /// Creates an allocator with the given per-slot section cap,
    /// α = 0.25 and no fill-rate filter.
    pub fn new(max_sections_per_slot: u32) -> Self {
        Self {
            max_sections_per_slot,
            oversize_penalty: 0.25,
            min_fill_rate: None,
        }
    }

    /// Creates an allocator from engine settings.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_sections_per_slot: config.max_sections_per_course_per_slot,
            oversize_penalty: config.oversize_penalty,
            min_fill_rate: config.min_fill_rate,
        }
    }

    /// Sets the oversize penalty α.
    pub fn with_oversize_penalty(mut self, penalty: f64) -> Self {
        self.oversize_penalty = penalty;
        self
    }

    /// Sets the minimum fill rate.
    pub fn with_min_fill_rate(mut self, rate: f64) -> Self {
        self.min_fill_rate = Some(rate);
        self
    }

    /// Best-fit score of placing a course with `gap` unmet seats in a room.
    pub fn score(&self, capacity: u32, gap: u32) -> f64 {
        let fit = capacity.min(gap) as f64;
        let over = capacity.saturating_sub(gap) as f64;
        fit - self.oversize_penalty * over
    }

    /// Picks the course for one room, or `None` to leave it empty.
    fn select(
        &self,
        room: &Room,
        entries: &[(usize, &CourseDemand)],
        scheduled: &[u32],
        used_in_slot: &[u32],
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for &(entry, demand) in entries {
            if used_in_slot[entry] >= self.max_sections_per_slot {
                continue;
            }
            let gap = demand.target_capacity.saturating_sub(scheduled[entry]);
            if gap == 0 {
                continue;
            }

            let fit = room.capacity.min(gap);
            if let Some(min_rate) = self.min_fill_rate {
                let ratio = if room.capacity > 0 {
                    fit as f64 / room.capacity as f64
                } else {
                    0.0
                };
                if ratio < min_rate {
                    continue;
                }
            }

            // Strictly better only, so ties keep the earlier course.
            let score = self.score(room.capacity, gap);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Candidate { entry, score, fit });
            }
        }

        best.filter(|c| c.score > 0.0 && c.fit > 0)
    }
}

impl SectionAllocator for BestFitAllocator {
    fn name(&self) -> &'static str {
        "best-fit"
    }

    fn allocate(&self, grid: &TimeGrid, rooms: &[Room], demand: &DemandTable) -> Vec<ScheduledGroup> {
        let mut rooms_by_capacity: Vec<&Room> = rooms.iter().collect();
        rooms_by_capacity.sort_by(|a, b| b.capacity.cmp(&a.capacity));

        let all_entries: Vec<(usize, &CourseDemand)> =
            demand.entries().iter().enumerate().collect();
        let mut scheduled = vec![0u32; all_entries.len()];
        let mut room_bookings: Vec<Vec<TimeSlot>> = vec![Vec::new(); rooms_by_capacity.len()];
        let mut groups = Vec::new();

        for shift in grid.shifts() {
            let entries: Vec<(usize, &CourseDemand)> = all_entries
                .iter()
                .copied()
                .filter(|(_, d)| d.shift == shift)
                .collect();
            if entries.is_empty() {
                continue;
            }
            let before = groups.len();

            for slot in grid.shift_slots(shift) {
                let mut used_in_slot = vec![0u32; all_entries.len()];

                for (r, room) in rooms_by_capacity.iter().enumerate() {
                    if room_bookings[r].iter().any(|b| b.conflicts_with(slot)) {
                        continue;
                    }
                    let Some(pick) = self.select(room, &entries, &scheduled, &used_in_slot) else {
                        continue;
                    };

                    used_in_slot[pick.entry] += 1;
                    scheduled[pick.entry] += room.capacity;
                    room_bookings[r].push(*slot);

                    let course_id = &all_entries[pick.entry].1.course_id;
                    let group_index = used_in_slot[pick.entry];
                    groups.push(ScheduledGroup {
                        id: format!(
                            "G-{}-{}-{}-{}-{}",
                            course_id, shift, slot.day, slot.index, group_index
                        ),
                        course_id: course_id.clone(),
                        shift,
                        group_index,
                        room_id: room.id.clone(),
                        room_code: room.code.clone(),
                        capacity: room.capacity,
                        remaining: room.capacity,
                        meeting: *slot,
                    });
                }
            }

            let opened = &groups[before..];
            debug!(
                %shift,
                groups = opened.len(),
                seats = opened.iter().map(|g| g.capacity as u64).sum::<u64>(),
                "sections allocated"
            );
        }

        groups
    }
}
