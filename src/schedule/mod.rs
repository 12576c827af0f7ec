//! Piecewise-linear anneal schedules
//!
//! A schedule is a list of `(time, s)` points, linearly interpolated by the
//! backend, where `s` is the normalized anneal fraction. Every schedule
//! held by a [`Schedule`] satisfies:
//!
//! - at least two points
//! - the first point is exactly `(0, 0)`
//! - the last point has `s = 1`
//! - time is strictly increasing and `s` is non-decreasing, within `[0, 1]`
//!
//! Backend-dependent rules (maximum slope, maximum final time, maximum
//! number of points) live in [`ScheduleLimits`] and are checked with
//! [`Schedule::check_limits`].
//!
//! ## Usage
//!
//! ```rust
//! use anneal_tuner::schedule::{Knob, ScheduleBuilder, ScheduleLimits};
//!
//! let builder = ScheduleBuilder::new(ScheduleLimits::default());
//! let schedule = builder.build(Knob::Pause { duration: 10.0 }, 50.0, 0.4)?;
//!
//! assert_eq!(schedule.len(), 4);
//! assert_eq!(schedule.to_flat_text(), "[0.0, 0.0, 20.0, 0.4, 30.0, 0.4, 60.0, 1.0]");
//! # Ok::<(), anneal_tuner::Error>(())
//! ```

mod builder;
mod codec;

pub use builder::{AnnealMode, Knob, ScheduleBuilder, DEFAULT_DELTA_S};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Absolute tolerance when comparing a segment slope against the maximum.
const SLOPE_TOLERANCE: f64 = 1e-9;

/// One `(time, s)` control point. Time is in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulePoint {
    /// Time since the start of the anneal (µs)
    pub time: f64,
    /// Normalized anneal fraction in `[0, 1]`
    pub fraction: f64,
}

impl SchedulePoint {
    /// Create a control point.
    #[must_use]
    pub const fn new(time: f64, fraction: f64) -> Self {
        Self { time, fraction }
    }
}

/// Backend-supplied physical limits for anneal schedules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLimits {
    /// `(min, max)` supported annealing time in µs
    pub annealing_time_range: (f64, f64),
    /// Maximum number of points a schedule may contain
    pub max_points: usize,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            annealing_time_range: (0.5, 2000.0),
            max_points: 12,
        }
    }
}

impl ScheduleLimits {
    /// Maximum slope `ds/dt` of any segment: the inverse of the minimum
    /// annealing time.
    #[must_use]
    pub fn max_slope(&self) -> f64 {
        1.0 / self.annealing_time_range.0
    }

    /// Maximum time of the final point.
    #[must_use]
    pub const fn max_time(&self) -> f64 {
        self.annealing_time_range.1
    }

    /// Validates the limits themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a non-positive or inverted time
    /// range, or fewer than two allowed points.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.annealing_time_range;
        if !(min > 0.0 && min.is_finite()) {
            return Err(Error::Configuration(format!(
                "annealing_time_range minimum must be positive, got {min}"
            )));
        }
        if !(max >= min && max.is_finite()) {
            return Err(Error::Configuration(format!(
                "annealing_time_range ({min}, {max}) is inverted"
            )));
        }
        if self.max_points < 2 {
            return Err(Error::Configuration(format!(
                "max_points must be at least 2, got {}",
                self.max_points
            )));
        }
        Ok(())
    }
}

/// A validated anneal schedule. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Schedule {
    points: Vec<SchedulePoint>,
}

impl Schedule {
    /// Create a schedule from control points, checking the structural
    /// invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchedule`] naming the first violated invariant.
    pub fn new(points: Vec<SchedulePoint>) -> Result<Self> {
        check_structure(&points)?;
        Ok(Self { points })
    }

    /// Create a schedule from `[time, s]` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Schedule::new`].
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&[time, fraction]| SchedulePoint::new(time, fraction))
                .collect(),
        )
    }

    /// Control points in time order.
    #[must_use]
    pub fn points(&self) -> &[SchedulePoint] {
        &self.points
    }

    /// Points as `[time, s]` pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.time, p.fraction]).collect()
    }

    /// Number of control points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a schedule has at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total anneal duration (time of the last point).
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time)
    }

    /// Slopes `ds/dt` of consecutive segments.
    pub fn slopes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points
            .windows(2)
            .map(|w| (w[1].fraction - w[0].fraction) / (w[1].time - w[0].time))
    }

    /// Check backend limits: segment slope, final time and point count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchedule`] naming the violated limit.
    pub fn check_limits(&self, limits: &ScheduleLimits) -> Result<()> {
        if self.points.len() > limits.max_points {
            return Err(Error::InvalidSchedule(format!(
                "{} points exceed the backend maximum of {}",
                self.points.len(),
                limits.max_points
            )));
        }

        let duration = self.duration();
        if duration > limits.max_time() {
            return Err(Error::InvalidSchedule(format!(
                "final time {duration} exceeds the maximum annealing time {}",
                limits.max_time()
            )));
        }

        let max_slope = limits.max_slope();
        if let Some((segment, slope)) = self
            .slopes()
            .enumerate()
            .find(|(_, slope)| *slope > max_slope + SLOPE_TOLERANCE)
        {
            return Err(Error::InvalidSchedule(format!(
                "segment {segment} has slope {slope} above the maximum {max_slope}"
            )));
        }

        Ok(())
    }
}

impl TryFrom<Vec<[f64; 2]>> for Schedule {
    type Error = Error;

    fn try_from(pairs: Vec<[f64; 2]>) -> Result<Self> {
        Self::from_pairs(&pairs)
    }
}

impl From<Schedule> for Vec<[f64; 2]> {
    fn from(schedule: Schedule) -> Self {
        schedule.to_pairs()
    }
}

fn check_structure(points: &[SchedulePoint]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::InvalidSchedule(format!(
            "a schedule needs at least 2 points, got {}",
            points.len()
        )));
    }

    let first = points[0];
    #[allow(clippy::float_cmp)]
    if first.time != 0.0 || first.fraction != 0.0 {
        return Err(Error::InvalidSchedule(format!(
            "first point must be (0, 0), got ({}, {})",
            first.time, first.fraction
        )));
    }

    for (i, point) in points.iter().enumerate() {
        if !point.time.is_finite() || !(0.0..=1.0).contains(&point.fraction) {
            return Err(Error::InvalidSchedule(format!(
                "point {i} ({}, {}) is outside the valid range",
                point.time, point.fraction
            )));
        }
    }

    for (i, w) in points.windows(2).enumerate() {
        if w[1].time <= w[0].time {
            return Err(Error::InvalidSchedule(format!(
                "time must strictly increase: point {} at {} follows {}",
                i + 1,
                w[1].time,
                w[0].time
            )));
        }
        if w[1].fraction < w[0].fraction {
            return Err(Error::InvalidSchedule(format!(
                "anneal fraction must not decrease: point {} has s={} after s={}",
                i + 1,
                w[1].fraction,
                w[0].fraction
            )));
        }
    }

    let last = points[points.len() - 1];
    #[allow(clippy::float_cmp)]
    if last.fraction != 1.0 {
        return Err(Error::InvalidSchedule(format!(
            "last point must reach s=1, got s={}",
            last.fraction
        )));
    }

    Ok(())
}
