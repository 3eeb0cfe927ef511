//! Course section allocation and student enrollment engine.
//!
//! Turns a catalog of rooms, courses, students, and eligibilities into a
//! weekly plan: which sections open where and when, and which students
//! sit in them.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Room`, `Course`, `Student`, `Shift`,
//!   `TimeSlot`, `ScheduledGroup`, `Assignment`, `Violation`
//! - **`config`**: `EngineConfig` with TOML loading and shift templates
//! - **`grid`**: Weekly time slots per shift
//! - **`demand`**: Eligible students and seat targets per course and shift
//! - **`allocation`**: Best-fit section allocator behind `SectionAllocator`
//! - **`flow`**: Dinic max-flow and per-slot student matching
//! - **`scheduler`**: Multi-pass orchestration, `EnrollmentEngine`, KPIs, audit
//! - **`validation`**: Configuration and catalog integrity checks
//! - **`error`**: `ScheduleError`
//!
//! # Example
//!
//! ```
//! use u_enroll::config::EngineConfig;
//! use u_enroll::models::{Catalog, Course, Room, Shift, Student};
//! use u_enroll::scheduler::{audit_plan, EnrollmentEngine};
//!
//! let catalog = Catalog::new()
//!     .with_room(Room::new("R1", 25))
//!     .with_course(Course::new("MATH"))
//!     .with_course(Course::new("ENG"))
//!     .with_student(Student::new("S1", Shift::Morning))
//!     .with_student(Student::new("S2", Shift::Evening))
//!     .with_eligibility("S1", "MATH")
//!     .with_eligibility("S1", "ENG")
//!     .with_eligibility("S2", "MATH");
//!
//! let config = EngineConfig::default();
//! let plan = EnrollmentEngine::new(config.clone()).try_run(&catalog).unwrap();
//!
//! assert_eq!(plan.assignments_for_student("S1").len(), 2);
//! assert_eq!(plan.assignments_for_student("S2").len(), 1);
//! assert!(audit_plan(&plan, &catalog, &config).is_empty());
//! ```
//!
//! # References
//!
//! - Dinic (1970), "Algorithm for solution of a problem of maximum flow"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod allocation;
pub mod config;
pub mod demand;
pub mod error;
pub mod flow;
pub mod grid;
pub mod models;
pub mod scheduler;
pub mod validation;
