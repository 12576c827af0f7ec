//! Schedule construction for the pause, quench and pause-and-quench modes.

use serde::{Deserialize, Serialize};

use super::{Schedule, SchedulePoint, ScheduleLimits};
use crate::{Error, Result};

/// Default jump in `s` between the pause level and the quench start in
/// pause-and-quench schedules.
pub const DEFAULT_DELTA_S: f64 = 0.2;

/// Shape of a mid-anneal modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnealMode {
    /// Hold `s` constant for a while, then resume the anneal.
    Pause,
    /// Finish the anneal abruptly at a fixed slope.
    Quench,
    /// Pause at `s0`, ramp to `s0 + delta_s`, then quench.
    PauseAndQuench,
}

impl AnnealMode {
    /// All modes, in results-table type order.
    pub const ALL: [Self; 3] = [Self::Pause, Self::Quench, Self::PauseAndQuench];

    /// Stable lowercase name used in file names and labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Quench => "quench",
            Self::PauseAndQuench => "pause_and_quench",
        }
    }
}

impl std::fmt::Display for AnnealMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnnealMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pause" => Ok(Self::Pause),
            "quench" => Ok(Self::Quench),
            "pause_and_quench" => Ok(Self::PauseAndQuench),
            other => Err(Error::Configuration(format!(
                "unknown anneal mode '{other}' (expected pause, quench or pause_and_quench)"
            ))),
        }
    }
}

/// Secondary knob of a schedule; the variant selects the mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Knob {
    /// Pause duration in µs.
    Pause {
        /// Time spent at constant `s`
        duration: f64,
    },
    /// Quench slope `ds/dt`.
    Quench {
        /// Slope of the final segment
        slope: f64,
    },
    /// Pause duration and quench slope.
    PauseAndQuench {
        /// Time spent at constant `s0`
        pause: f64,
        /// Slope of the final segment
        slope: f64,
    },
}

impl Knob {
    /// The mode this knob drives.
    #[must_use]
    pub const fn mode(&self) -> AnnealMode {
        match self {
            Self::Pause { .. } => AnnealMode::Pause,
            Self::Quench { .. } => AnnealMode::Quench,
            Self::PauseAndQuench { .. } => AnnealMode::PauseAndQuench,
        }
    }
}

/// Builds schedules and rejects any that break a physical invariant.
///
/// # Examples
///
/// ```
/// use anneal_tuner::schedule::{Knob, ScheduleBuilder, ScheduleLimits};
///
/// let builder = ScheduleBuilder::new(ScheduleLimits::default());
/// let quench = builder.build(Knob::Quench { slope: 0.5 }, 10.0, 0.5)?;
/// assert_eq!(quench.to_pairs(), vec![[0.0, 0.0], [5.0, 0.5], [6.0, 1.0]]);
///
/// // s0 + delta_s > 1: rejected, never emitted
/// let knob = Knob::PauseAndQuench { pause: 10.0, slope: 1.0 };
/// assert!(builder.build(knob, 10.0, 0.9).is_err());
/// # Ok::<(), anneal_tuner::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleBuilder {
    limits: ScheduleLimits,
    delta_s: f64,
}

impl ScheduleBuilder {
    /// Create a builder for the given backend limits.
    #[must_use]
    pub const fn new(limits: ScheduleLimits) -> Self {
        Self {
            limits,
            delta_s: DEFAULT_DELTA_S,
        }
    }

    /// Override the pause-and-quench `s` offset.
    #[must_use]
    pub const fn with_delta_s(mut self, delta_s: f64) -> Self {
        self.delta_s = delta_s;
        self
    }

    /// Backend limits enforced by this builder.
    #[must_use]
    pub const fn limits(&self) -> &ScheduleLimits {
        &self.limits
    }

    /// Build the schedule for `knob` with total anneal time `anneal_time`
    /// and modification starting at fraction `start`.
    ///
    /// Points produced per mode, with `T = anneal_time`, `s = start`:
    ///
    /// - pause: `(0,0), (sT, s), (sT + p, s), (T + p, 1)`
    /// - quench: `(0,0), (sT, s), ((1 - s + q·sT) / q, 1)`
    /// - pause-and-quench, `s1 = s + delta_s`:
    ///   `(0,0), (sT, s), (sT + p, s), (2sT + p, s1), ((1 - s1 + q(2sT + p)) / q, 1)`
    ///
    /// A zero pause drops the hold point instead of repeating a time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchedule`] for out-of-range knobs or if the
    /// resulting schedule breaks a structural invariant or backend limit.
    pub fn build(&self, knob: Knob, anneal_time: f64, start: f64) -> Result<Schedule> {
        if !(anneal_time > 0.0 && anneal_time.is_finite()) {
            return Err(Error::InvalidSchedule(format!(
                "anneal time must be positive, got {anneal_time}"
            )));
        }
        if !(start > 0.0 && start < 1.0) {
            return Err(Error::InvalidSchedule(format!(
                "start fraction must be in (0, 1), got {start}"
            )));
        }

        let start_time = start * anneal_time;
        let mut points = vec![
            SchedulePoint::new(0.0, 0.0),
            SchedulePoint::new(start_time, start),
        ];

        match knob {
            Knob::Pause { duration } => {
                check_pause(duration)?;
                push_hold(&mut points, start_time + duration, start);
                points.push(SchedulePoint::new(anneal_time + duration, 1.0));
            }
            Knob::Quench { slope } => {
                check_slope(slope)?;
                points.push(SchedulePoint::new(
                    (1.0 - start + slope * start_time) / slope,
                    1.0,
                ));
            }
            Knob::PauseAndQuench { pause, slope } => {
                check_pause(pause)?;
                check_slope(slope)?;
                let s1 = start + self.delta_s;
                let ramp_end = 2.0 * start_time + pause;
                push_hold(&mut points, start_time + pause, start);
                points.push(SchedulePoint::new(ramp_end, s1));
                points.push(SchedulePoint::new(
                    (1.0 - s1 + slope * ramp_end) / slope,
                    1.0,
                ));
            }
        }

        let schedule = Schedule::new(points)?;
        schedule.check_limits(&self.limits)?;
        Ok(schedule)
    }
}

fn push_hold(points: &mut Vec<SchedulePoint>, time: f64, fraction: f64) {
    if points.last().is_some_and(|p| time > p.time) {
        points.push(SchedulePoint::new(time, fraction));
    }
}

fn check_pause(pause: f64) -> Result<()> {
    if pause >= 0.0 && pause.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidSchedule(format!(
            "pause duration must be non-negative, got {pause}"
        )))
    }
}

fn check_slope(slope: f64) -> Result<()> {
    if slope > 0.0 && slope.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidSchedule(format!(
            "quench slope must be positive, got {slope}"
        )))
    }
}
