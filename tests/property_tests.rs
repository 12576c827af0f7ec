//! Property-based tests for anneal-tuner
//!
//! - Generated schedules always satisfy the structural and slope invariants
//!   or are rejected as invalid
//! - Selection is deterministic and picks from the right subset
//! - Run with ProptestConfig::with_cases(100)

use anneal_tuner::schedule::{Knob, Schedule, ScheduleBuilder, ScheduleLimits};
use anneal_tuner::selection::SelectionPolicy;
use anneal_tuner::solver::{QpuTiming, TrialResult};
use anneal_tuner::Error;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_knob() -> impl Strategy<Value = Knob> {
    prop_oneof![
        (0.0f64..200.0).prop_map(|duration| Knob::Pause { duration }),
        (0.01f64..3.0).prop_map(|slope| Knob::Quench { slope }),
        (0.0f64..200.0, 0.01f64..3.0).prop_map(|(pause, slope)| Knob::PauseAndQuench { pause, slope }),
    ]
}

fn arb_limits() -> impl Strategy<Value = ScheduleLimits> {
    (0.1f64..5.0, 100.0f64..3000.0, 3usize..16).prop_map(|(min, max, max_points)| ScheduleLimits {
        annealing_time_range: (min, max),
        max_points,
    })
}

fn arb_result() -> impl Strategy<Value = TrialResult> {
    (
        proptest::collection::vec(-50i32..50, 1..5),
        0u64..3,
        proptest::option::of(1i32..5),
    )
        .prop_map(|(energies, correct, access)| {
            TrialResult::new(energies.into_iter().map(f64::from).collect(), correct).with_timing(
                QpuTiming {
                    access_time: access.map(|a| f64::from(a) * 10.0),
                    ..QpuTiming::default()
                },
            )
        })
}

fn assert_invariants(schedule: &Schedule, limits: &ScheduleLimits) {
    let points = schedule.points();
    assert!(points.len() >= 2);
    assert!(points.len() <= limits.max_points);
    assert_eq!((points[0].time, points[0].fraction), (0.0, 0.0));
    assert!((points[points.len() - 1].fraction - 1.0).abs() < f64::EPSILON);
    for w in points.windows(2) {
        assert!(w[1].time > w[0].time);
        assert!(w[1].fraction >= w[0].fraction);
    }
    for slope in schedule.slopes() {
        assert!(slope <= limits.max_slope() + 1e-9);
    }
    assert!(schedule.duration() <= limits.max_time());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: the builder never emits a schedule that breaks an invariant
    #[test]
    fn prop_built_schedules_are_valid(
        knob in arb_knob(),
        anneal_time in 0.5f64..300.0,
        start in 0.05f64..0.95,
        limits in arb_limits(),
    ) {
        match ScheduleBuilder::new(limits).build(knob, anneal_time, start) {
            Ok(schedule) => assert_invariants(&schedule, &limits),
            Err(e) => prop_assert!(matches!(e, Error::InvalidSchedule(_))),
        }
    }

    /// Property: a built schedule survives the flat text codec unchanged
    #[test]
    fn prop_flat_text_roundtrip(
        knob in arb_knob(),
        anneal_time in 1.0f64..200.0,
        start in 0.1f64..0.7,
    ) {
        if let Ok(schedule) = ScheduleBuilder::new(ScheduleLimits::default()).build(knob, anneal_time, start) {
            let parsed = Schedule::parse_flat_text(&schedule.to_flat_text()).unwrap();
            prop_assert_eq!(parsed, schedule);
        }
    }

    /// Property: selection is idempotent
    #[test]
    fn prop_selection_idempotent(results in proptest::collection::vec(arb_result(), 1..30)) {
        let policy = SelectionPolicy::default();
        let first = policy.select(&results);
        prop_assert!(first.is_some());
        prop_assert_eq!(policy.select(&results), first);
    }

    /// Property: the winner has a correct solution whenever any candidate does,
    /// and no candidate in its group has a lower energy
    #[test]
    fn prop_selection_respects_priority(results in proptest::collection::vec(arb_result(), 1..30)) {
        let winner = &results[SelectionPolicy::default().select(&results).unwrap()];
        let any_correct = results.iter().any(|r| r.correct_solution_count() >= 1);

        if any_correct {
            prop_assert!(winner.correct_solution_count() >= 1);
        }
        let group_min = results
            .iter()
            .filter(|r| !any_correct || r.correct_solution_count() >= 1)
            .map(TrialResult::energy)
            .fold(f64::INFINITY, f64::min);
        prop_assert!((winner.energy() - group_min).abs() < f64::EPSILON);
    }
}
