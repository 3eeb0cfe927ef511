//! End-to-end enrollment run.
//!
//! # Algorithm
//!
//! 1. Build the time grid from the shift templates.
//! 2. Aggregate demand and over-provisioned seat targets.
//! 3. Open sections with the section allocator.
//! 4. Assign students with multi-pass per-slot max-flow.
//!
//! Each run owns a fresh [`RunContext`]; runs never share state, and the
//! same input always produces the same plan.

use tracing::info;

use super::{EnrollmentPlan, MultiPassAssigner, RunContext};
use crate::allocation::{BestFitAllocator, SectionAllocator};
use crate::config::EngineConfig;
use crate::demand::DemandTable;
use crate::error::ScheduleError;
use crate::grid::TimeGrid;
use crate::models::{Catalog, ScheduledGroup};
use crate::validation;

/// Allocates sections and assigns students in one call.
///
/// # Example
///
/// ```
/// use u_enroll::config::{EngineConfig, ShiftConfig};
/// use u_enroll::models::{Catalog, ClockTime, Course, Room, Shift, Student, Weekday};
/// use u_enroll::scheduler::EnrollmentEngine;
///
/// let morning = ShiftConfig::new(ClockTime::from_hm(7, 0).unwrap(), 90, 1, vec![Weekday::Mon]);
/// let config = EngineConfig::default()
///     .with_over_provision_factor(1.0)
///     .with_only_shift(Shift::Morning, morning);
///
/// let mut catalog = Catalog::new()
///     .with_room(Room::new("R1", 30))
///     .with_course(Course::new("MATH"));
/// for i in 0..40 {
///     let id = format!("S{i}");
///     catalog = catalog
///         .with_student(Student::new(id.as_str(), Shift::Morning))
///         .with_eligibility(id.as_str(), "MATH");
/// }
///
/// let plan = EnrollmentEngine::new(config).run(&catalog);
/// assert_eq!(plan.groups.len(), 1);
/// assert_eq!(plan.assignment_count(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct EnrollmentEngine<A: SectionAllocator = BestFitAllocator> {
    config: EngineConfig,
    allocator: A,
}

impl EnrollmentEngine {
    /// Creates an engine with the best-fit allocator tuned from `config`.
    pub fn new(config: EngineConfig) -> Self {
        let allocator = BestFitAllocator::from_config(&config);
        Self { config, allocator }
    }
}

impl<A: SectionAllocator> EnrollmentEngine<A> {
    /// Replaces the section allocator.
    pub fn with_allocator<B: SectionAllocator>(self, allocator: B) -> EnrollmentEngine<B> {
        EnrollmentEngine {
            config: self.config,
            allocator,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Section allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Runs allocation and assignment on a catalog.
    ///
    /// Assumes the configuration and catalog are valid; see
    /// [`try_run`](Self::try_run) for a checked variant. Unknown
    /// eligibility references are skipped.
    pub fn run(&self, catalog: &Catalog) -> EnrollmentPlan {
        let grid = TimeGrid::build(&self.config);
        let demand = DemandTable::build(catalog, self.config.over_provision_factor);
        info!(
            allocator = self.allocator.name(),
            students = catalog.students.len(),
            courses = catalog.courses.len(),
            rooms = catalog.rooms.len(),
            slots = grid.len(),
            demand_entries = demand.len(),
            "enrollment run started"
        );

        let groups = self.allocator.allocate(&grid, &catalog.rooms, &demand);
        self.assign_groups(catalog, &grid, demand, groups)
    }

    /// Validates configuration and catalog, then runs.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Config`] for out-of-range settings and
    /// [`ScheduleError::Invalid`] for catalog integrity problems.
    pub fn try_run(&self, catalog: &Catalog) -> Result<EnrollmentPlan, ScheduleError> {
        self.config.validate()?;
        validation::validate_catalog(catalog).map_err(ScheduleError::Invalid)?;
        Ok(self.run(catalog))
    }

    /// Assigns students to pre-built groups, skipping allocation.
    ///
    /// Group meetings should come from this engine's grid; groups at
    /// other times still receive students, in input order after the
    /// grid's own slots.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Invalid`] if a group has more remaining
    /// seats than capacity or two groups share an ID.
    pub fn assign(
        &self,
        catalog: &Catalog,
        groups: Vec<ScheduledGroup>,
    ) -> Result<EnrollmentPlan, ScheduleError> {
        validation::validate_groups(&groups).map_err(ScheduleError::Invalid)?;
        let grid = TimeGrid::build(&self.config);
        let demand = DemandTable::build(catalog, self.config.over_provision_factor);
        Ok(self.assign_groups(catalog, &grid, demand, groups))
    }

    fn assign_groups(
        &self,
        catalog: &Catalog,
        grid: &TimeGrid,
        demand: DemandTable,
        groups: Vec<ScheduledGroup>,
    ) -> EnrollmentPlan {
        let mut slots = grid.chronological();
        for g in &groups {
            if !slots.contains(&g.meeting) {
                slots.push(g.meeting);
            }
        }

        let mut ctx = RunContext::new(catalog, &self.config, groups);
        let report = MultiPassAssigner::from_config(&self.config).run(&mut ctx, &slots);
        let (groups, assignments) = ctx.into_parts();

        let plan = EnrollmentPlan {
            groups,
            assignments,
            demand,
            passes_run: report.passes_run,
            added_per_pass: report.added_per_pass,
        };
        info!(
            groups = plan.groups.len(),
            seats = plan.seats_scheduled(),
            assignments = plan.assignment_count(),
            passes = plan.passes_run,
            "enrollment run finished"
        );
        plan
    }
}
