//! End-to-end scenarios and seeded property checks for full runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::config::{EngineConfig, ShiftConfig};
use crate::error::ScheduleError;
use crate::models::{Catalog, ClockTime, Course, Room, ScheduledGroup, Shift, Student, TimeSlot, Weekday};

fn one_slot_config() -> EngineConfig {
    EngineConfig::default()
        .with_over_provision_factor(1.0)
        .with_only_shift(
            Shift::Morning,
            ShiftConfig::new(ClockTime::from_hm(7, 0).unwrap(), 90, 1, vec![Weekday::Mon]),
        )
}

fn cohort(mut catalog: Catalog, prefix: &str, n: usize, shift: Shift, courses: &[&str]) -> Catalog {
    for i in 0..n {
        let id = format!("{prefix}{i}");
        catalog = catalog.with_student(Student::new(id.as_str(), shift));
        for c in courses {
            catalog = catalog.with_eligibility(id.as_str(), *c);
        }
    }
    catalog
}

fn morning_slot(index: u32) -> TimeSlot {
    let start = 420 + index * 90;
    TimeSlot::new(Shift::Morning, Weekday::Mon, index, start, start + 90)
}

fn group(id: &str, course: &str, meeting: TimeSlot, capacity: u32) -> ScheduledGroup {
    ScheduledGroup {
        id: id.into(),
        course_id: course.into(),
        shift: meeting.shift,
        group_index: 1,
        room_id: format!("R-{id}"),
        room_code: format!("R-{id}"),
        capacity,
        remaining: capacity,
        meeting,
    }
}

/// Random catalog: a few rooms, courses, and students spread over the
/// morning and evening shifts plus a handful of unscheduled Sunday students.
fn random_catalog(seed: u64) -> Catalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut catalog = Catalog::new();

    for r in 0..rng.random_range(2..=5) {
        catalog = catalog.with_room(Room::new(format!("R{r}"), rng.random_range(5..=40)));
    }
    let course_count = rng.random_range(3..=6);
    for c in 0..course_count {
        catalog = catalog.with_course(Course::new(format!("C{c}")));
    }
    for s in 0..rng.random_range(20..=60) {
        let shift = match rng.random_range(0..10) {
            0 => Shift::Sunday,
            1..=5 => Shift::Morning,
            _ => Shift::Evening,
        };
        let id = format!("S{s}");
        catalog = catalog.with_student(Student::new(id.as_str(), shift));
        for c in 0..course_count {
            if rng.random_bool(0.5) {
                catalog = catalog.with_eligibility(id.as_str(), format!("C{c}"));
            }
        }
    }
    catalog
}

fn random_config(seed: u64) -> EngineConfig {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let morning = ShiftConfig::new(
        ClockTime::from_hm(7, 0).unwrap(),
        90,
        rng.random_range(2..=4),
        vec![Weekday::Mon, Weekday::Tue],
    )
    .with_allow_breaks(rng.random_bool(0.5));
    let evening = ShiftConfig::new(
        ClockTime::from_hm(16, 0).unwrap(),
        60,
        rng.random_range(2..=3),
        vec![Weekday::Mon, Weekday::Wed, Weekday::Thu],
    )
    .with_allow_breaks(rng.random_bool(0.5));

    EngineConfig::default()
        .with_max_courses_per_student(rng.random_range(1..=4))
        .with_over_provision_factor(1.0 + rng.random_range(0..=30) as f64 / 100.0)
        .with_only_shift(Shift::Morning, morning)
        .with_shift(Shift::Evening, evening)
}

#[test]
fn test_single_room_overflow() {
    let catalog = cohort(
        Catalog::new()
            .with_room(Room::new("R1", 30))
            .with_course(Course::new("C1")),
        "S",
        40,
        Shift::Morning,
        &["C1"],
    );
    let plan = EnrollmentEngine::new(one_slot_config()).run(&catalog);

    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.groups[0].capacity, 30);
    assert_eq!(plan.groups[0].remaining, 0);
    assert_eq!(plan.assignment_count(), 30);

    let kpi = plan.kpi();
    assert_eq!(kpi.seats_used_total, 30);
    let c1 = kpi.coverage_for("C1", Shift::Morning).unwrap();
    assert_eq!(c1.gap, 10);
    assert_eq!(c1.unserved, 10);
    assert_eq!(EnrollmentKpi::unassigned_students(&plan, &catalog).len(), 10);
}

#[test]
fn test_two_students_two_courses() {
    let catalog = cohort(
        Catalog::new()
            .with_room(Room::new("R1", 2))
            .with_course(Course::new("C1"))
            .with_course(Course::new("C2")),
        "S",
        2,
        Shift::Morning,
        &["C1", "C2"],
    );
    let config = EngineConfig::default()
        .with_over_provision_factor(1.0)
        .with_max_courses_per_student(2)
        .with_only_shift(
            Shift::Morning,
            ShiftConfig::new(ClockTime::from_hm(7, 0).unwrap(), 90, 2, vec![Weekday::Mon]),
        );
    let plan = EnrollmentEngine::new(config.clone()).run(&catalog);

    assert_eq!(plan.groups.len(), 2);
    assert_ne!(plan.groups[0].meeting, plan.groups[1].meeting);
    for s in ["S0", "S1"] {
        assert_eq!(plan.assignments_for_student(s).len(), 2);
    }
    assert!(audit_plan(&plan, &catalog, &config).is_empty());
}

#[test]
fn test_contiguity_blocks_gap() {
    let catalog = cohort(
        Catalog::new()
            .with_course(Course::new("C1"))
            .with_course(Course::new("C2")),
        "S",
        1,
        Shift::Morning,
        &["C1", "C2"],
    );
    let config = EngineConfig::default().with_only_shift(
        Shift::Morning,
        ShiftConfig::default_for(Shift::Morning).with_allow_breaks(false),
    );
    let engine = EnrollmentEngine::new(config.clone());

    // Slots 0 and 2 only: the second class would leave a gap.
    let plan = engine.assign(
        &catalog,
        vec![
            group("G0", "C1", morning_slot(0), 5),
            group("G2", "C2", morning_slot(2), 5),
        ],
    )
    .unwrap();
    assert_eq!(plan.assignment_count(), 1);
    assert_eq!(plan.assignments[0].group_id, "G0");
    assert!(audit_plan(&plan, &catalog, &config).is_empty());

    // With breaks allowed, both fit.
    let relaxed = EnrollmentEngine::new(EngineConfig::default()).assign(
        &catalog,
        vec![
            group("G0", "C1", morning_slot(0), 5),
            group("G2", "C2", morning_slot(2), 5),
        ],
    )
    .unwrap();
    assert_eq!(relaxed.assignment_count(), 2);
}

#[test]
fn test_contiguous_block_in_slot_order() {
    // Groups arrive out of order; slots are still visited chronologically.
    let catalog = cohort(
        Catalog::new()
            .with_course(Course::new("C1"))
            .with_course(Course::new("C2"))
            .with_course(Course::new("C3")),
        "S",
        1,
        Shift::Morning,
        &["C1", "C2", "C3"],
    );
    let config = EngineConfig::default().with_only_shift(
        Shift::Morning,
        ShiftConfig::default_for(Shift::Morning).with_allow_breaks(false),
    );
    let plan = EnrollmentEngine::new(config.clone()).assign(
        &catalog,
        vec![
            group("G2", "C2", morning_slot(2), 5),
            group("G1", "C3", morning_slot(1), 5),
            group("G0", "C1", morning_slot(0), 5),
        ],
    )
    .unwrap();
    assert_eq!(plan.assignment_count(), 3);
    assert!(audit_plan(&plan, &catalog, &config).is_empty());
}

#[test]
fn test_assign_rejects_overfull_groups() {
    let catalog = cohort(Catalog::new().with_course(Course::new("C1")), "S", 5, Shift::Morning, &["C1"]);
    let engine = EnrollmentEngine::new(EngineConfig::default());
    let mut g = group("G1", "C1", morning_slot(0), 2);
    g.remaining = 5;

    match engine.assign(&catalog, vec![g]) {
        Err(ScheduleError::Invalid(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.contains("G1"));
        }
        other => panic!("expected invalid groups, got {other:?}"),
    }

    let dup = vec![
        group("G1", "C1", morning_slot(0), 2),
        group("G1", "C1", morning_slot(1), 2),
    ];
    assert!(matches!(engine.assign(&catalog, dup), Err(ScheduleError::Invalid(_))));
}

#[test]
fn test_try_run_rejects_overflowing_shift() {
    let huge = ShiftConfig::new(
        ClockTime::from_hm(7, 0).unwrap(),
        3_000_000_000,
        2,
        vec![Weekday::Mon],
    );
    let config = EngineConfig::default().with_only_shift(Shift::Morning, huge);
    let catalog = cohort(
        Catalog::new().with_room(Room::new("R1", 10)).with_course(Course::new("C1")),
        "S",
        3,
        Shift::Morning,
        &["C1"],
    );

    let result = EnrollmentEngine::new(config).try_run(&catalog);
    assert!(matches!(result, Err(ScheduleError::Config(_))));
}

#[test]
fn test_no_rooms_no_groups() {
    let catalog = cohort(Catalog::new().with_course(Course::new("C1")), "S", 5, Shift::Morning, &["C1"]);
    let plan = EnrollmentEngine::new(EngineConfig::default()).run(&catalog);
    assert!(plan.groups.is_empty());
    assert!(plan.assignments.is_empty());
    assert_eq!(plan.passes_run, 1);
    assert_eq!(plan.kpi().coverage_for("C1", Shift::Morning).unwrap().unserved, 5);
}

#[test]
fn test_unconfigured_shift_gets_nothing() {
    let catalog = cohort(
        Catalog::new()
            .with_room(Room::new("R1", 30))
            .with_course(Course::new("C1")),
        "S",
        5,
        Shift::Saturday,
        &["C1"],
    );
    let plan = EnrollmentEngine::new(one_slot_config()).run(&catalog);
    assert!(plan.groups.is_empty());
    assert_eq!(plan.demand.demand("C1", Shift::Saturday), 5);
}

#[test]
fn test_try_run_rejects_bad_input() {
    let bad_config = EngineConfig::default().with_assignment_passes(0);
    let err = EnrollmentEngine::new(bad_config)
        .try_run(&Catalog::new())
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Config(_)));

    let bad_catalog = Catalog::new()
        .with_student(Student::new("S1", Shift::Morning))
        .with_eligibility("S1", "GHOST");
    let err = EnrollmentEngine::new(EngineConfig::default())
        .try_run(&bad_catalog)
        .unwrap_err();
    match err {
        ScheduleError::Invalid(errors) => assert_eq!(errors.len(), 1),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_random_plans_are_sound() {
    for seed in 0..25 {
        let catalog = random_catalog(seed);
        let config = random_config(seed);
        let plan = EnrollmentEngine::new(config.clone()).try_run(&catalog).unwrap();

        let violations = audit_plan(&plan, &catalog, &config);
        assert!(violations.is_empty(), "seed {seed}: {violations:?}");

        for g in &plan.groups {
            assert_eq!(plan.assignments_for_group(&g.id).len() as u32, g.used());
        }
        // Sunday has no grid here.
        for s in catalog.students.iter().filter(|s| s.shift == Shift::Sunday) {
            assert!(plan.assignments_for_student(&s.id).is_empty());
        }
    }
}

#[test]
fn test_more_passes_never_fewer_assignments() {
    for seed in 0..15 {
        let catalog = random_catalog(seed);
        let mut previous = 0;
        for passes in 1..=5 {
            let config = random_config(seed)
                .with_assignment_passes(passes)
                .with_stop_when_stable(false);
            let count = EnrollmentEngine::new(config).run(&catalog).assignment_count();
            assert!(count >= previous, "seed {seed}: {passes} passes gave {count} < {previous}");
            previous = count;
        }
    }
}

#[test]
fn test_early_exit_matches_full_passes() {
    for seed in 0..15 {
        let catalog = random_catalog(seed);
        let full = EnrollmentEngine::new(random_config(seed).with_stop_when_stable(false)).run(&catalog);
        let early = EnrollmentEngine::new(random_config(seed)).run(&catalog);

        assert_eq!(full.passes_run, 6);
        assert!(early.passes_run <= full.passes_run);
        assert_eq!(early.assignments, full.assignments);
        assert_eq!(early.groups, full.groups);
    }
}

#[test]
fn test_runs_are_deterministic() {
    for seed in [3, 11, 42] {
        let catalog = random_catalog(seed);
        let engine = EnrollmentEngine::new(random_config(seed));
        assert_eq!(engine.run(&catalog), engine.run(&catalog));
    }
}

#[test]
fn test_plan_serializes_to_json() {
    let catalog = random_catalog(7);
    let plan = EnrollmentEngine::new(random_config(7)).run(&catalog);

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["passes_run"], plan.passes_run);
    assert_eq!(
        json["assignments"].as_array().map(Vec::len),
        Some(plan.assignment_count())
    );

    let kpi = serde_json::to_value(plan.kpi()).unwrap();
    let shifts = kpi["by_shift"].as_object().unwrap();
    assert_eq!(shifts.len(), plan.kpi().by_shift.len());
    assert!(shifts
        .keys()
        .all(|k| ["morning", "evening", "sunday"].contains(&k.as_str())));
}
