//! Schedule builder and codec tests

use anneal_tuner::schedule::{AnnealMode, Knob, Schedule, ScheduleBuilder, ScheduleLimits};
use anneal_tuner::Error;

fn builder() -> ScheduleBuilder {
    ScheduleBuilder::new(ScheduleLimits::default())
}

fn approx(actual: &[[f64; 2]], expected: &[[f64; 2]]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a[0] - e[0]).abs() < 1e-9 && (a[1] - e[1]).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn test_pause_schedule_points() {
    let schedule = builder().build(Knob::Pause { duration: 80.0 }, 150.0, 0.3).unwrap();
    approx(&schedule.to_pairs(), &[[0.0, 0.0], [45.0, 0.3], [125.0, 0.3], [230.0, 1.0]]);
}

#[test]
fn test_quench_schedule_points() {
    let schedule = builder().build(Knob::Quench { slope: 0.25 }, 50.0, 0.4).unwrap();
    // (1 - 0.4 + 0.25 * 20) / 0.25 = 22.4
    approx(&schedule.to_pairs(), &[[0.0, 0.0], [20.0, 0.4], [22.4, 1.0]]);
}

#[test]
fn test_pause_and_quench_schedule_points() {
    let knob = Knob::PauseAndQuench { pause: 10.0, slope: 0.5 };
    let schedule = builder().build(knob, 50.0, 0.4).unwrap();
    // s1 = 0.6, ramp end = 2 * 20 + 10 = 50, final = (1 - 0.6 + 0.5 * 50) / 0.5 = 50.8
    approx(
        &schedule.to_pairs(),
        &[[0.0, 0.0], [20.0, 0.4], [30.0, 0.4], [50.0, 0.6], [50.8, 1.0]],
    );
}

#[test]
fn test_zero_pause_collapses_hold_point() {
    let schedule = builder().build(Knob::Pause { duration: 0.0 }, 50.0, 0.4).unwrap();
    approx(&schedule.to_pairs(), &[[0.0, 0.0], [20.0, 0.4], [50.0, 1.0]]);
}

#[test]
fn test_invalid_knobs_rejected() {
    let b = builder();
    for (knob, t, s) in [
        (Knob::Pause { duration: -1.0 }, 50.0, 0.4),
        (Knob::Quench { slope: 0.0 }, 50.0, 0.4),
        (Knob::Pause { duration: 10.0 }, 50.0, 0.0),
        (Knob::Pause { duration: 10.0 }, 50.0, 1.0),
        (Knob::Pause { duration: 10.0 }, 0.0, 0.4),
    ] {
        assert!(matches!(b.build(knob, t, s), Err(Error::InvalidSchedule(_))), "{knob:?} {t} {s}");
    }
}

#[test]
fn test_slope_limit_rejects_steep_quench() {
    // minimum annealing time 0.5 µs => maximum slope 2.0
    let err = builder().build(Knob::Quench { slope: 2.5 }, 50.0, 0.4).unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("slope"));
}

#[test]
fn test_final_time_limit() {
    let limits = ScheduleLimits {
        annealing_time_range: (0.5, 100.0),
        ..ScheduleLimits::default()
    };
    let result = ScheduleBuilder::new(limits).build(Knob::Pause { duration: 80.0 }, 50.0, 0.4);
    assert!(matches!(result, Err(Error::InvalidSchedule(_))));
}

#[test]
fn test_point_count_limit() {
    let limits = ScheduleLimits {
        max_points: 4,
        ..ScheduleLimits::default()
    };
    let knob = Knob::PauseAndQuench { pause: 10.0, slope: 1.0 };
    assert!(ScheduleBuilder::new(limits).build(knob, 50.0, 0.4).is_err());
}

#[test]
fn test_delta_s_override() {
    let knob = Knob::PauseAndQuench { pause: 10.0, slope: 1.0 };
    let schedule = builder().with_delta_s(0.1).build(knob, 50.0, 0.4).unwrap();
    assert!((schedule.to_pairs()[3][1] - 0.5).abs() < 1e-12);
}

#[test]
fn test_structure_checks() {
    for pairs in [
        vec![[0.0, 0.0]],
        vec![[1.0, 0.0], [2.0, 1.0]],
        vec![[0.0, 0.0], [5.0, 0.6], [6.0, 0.5], [9.0, 1.0]],
        vec![[0.0, 0.0], [5.0, 0.5], [5.0, 0.6], [9.0, 1.0]],
        vec![[0.0, 0.0], [5.0, 0.9]],
        vec![[0.0, 0.0], [5.0, 1.2]],
    ] {
        assert!(Schedule::from_pairs(&pairs).is_err(), "{pairs:?}");
    }
}

#[test]
fn test_flat_text_parse() {
    let schedule = Schedule::parse_flat_text("[0.0, 0.0, 10.0, 0.4, 20.0, 1.0]").unwrap();
    assert_eq!(schedule.to_pairs(), vec![[0.0, 0.0], [10.0, 0.4], [20.0, 1.0]]);
    assert_eq!(schedule.to_flat_text(), "[0.0, 0.0, 10.0, 0.4, 20.0, 1.0]");
}

#[test]
fn test_flat_text_rejects_malformed() {
    assert!(matches!(
        Schedule::parse_flat_text("[0.0, 0.0, 10.0]"),
        Err(Error::ParseError(_))
    ));
    assert!(matches!(
        Schedule::parse_flat_text("[0.0, 0.0, ten, 1.0]"),
        Err(Error::ParseError(_))
    ));
    assert!(matches!(
        Schedule::parse_flat_text("[0.0, 0.0, 10.0, 0.5]"),
        Err(Error::InvalidSchedule(_))
    ));
}

#[test]
fn test_schedule_serde_as_pairs() {
    let schedule = Schedule::from_pairs(&[[0.0, 0.0], [10.0, 1.0]]).unwrap();
    let json = serde_json::to_string(&schedule).unwrap();
    assert_eq!(json, "[[0.0,0.0],[10.0,1.0]]");
    let back: Schedule = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schedule);
    assert!(serde_json::from_str::<Schedule>("[[0.0,0.0],[10.0,0.5]]").is_err());
}

#[test]
fn test_anneal_mode_parse() {
    for mode in AnnealMode::ALL {
        assert_eq!(mode.as_str().parse::<AnnealMode>().unwrap(), mode);
    }
    assert!("reverse".parse::<AnnealMode>().is_err());
}
