//! Schedule sweeps: one solver call per grid point

use tracing::{debug, info, warn};

use super::{CandidateSet, StartRange, TuningOutcome};
use crate::schedule::{AnnealMode, Knob, Schedule, ScheduleBuilder};
use crate::solver::{SolveRequest, Solver};
use crate::{Error, Result};

/// One point of a sweep grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Total anneal time (µs)
    pub anneal_time: f64,
    /// Secondary knob
    pub knob: Knob,
    /// Start fraction of the modification
    pub start: f64,
}

/// Cartesian sweep grid: anneal times × secondary knobs × start fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    anneal_times: Vec<f64>,
    knobs: Vec<Knob>,
    start: StartRange,
}

impl SweepGrid {
    /// Create a grid.
    #[must_use]
    pub const fn new(anneal_times: Vec<f64>, knobs: Vec<Knob>, start: StartRange) -> Self {
        Self {
            anneal_times,
            knobs,
            start,
        }
    }

    /// Mode of the grid, taken from its first knob.
    #[must_use]
    pub fn mode(&self) -> Option<AnnealMode> {
        self.knobs.first().map(Knob::mode)
    }

    /// Number of grid points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anneal_times.len() * self.knobs.len() * self.start.num_points
    }

    /// Whether the grid has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid points in enumeration order: anneal time outermost, then knob,
    /// then start fraction.
    #[must_use]
    pub fn points(&self) -> Vec<GridPoint> {
        let starts = self.start.values();
        let mut points = Vec::with_capacity(self.len());
        for &anneal_time in &self.anneal_times {
            for &knob in &self.knobs {
                for &start in &starts {
                    points.push(GridPoint {
                        anneal_time,
                        knob,
                        start,
                    });
                }
            }
        }
        points
    }

    /// Validates the grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty grid or knobs of mixed
    /// modes.
    pub fn validate(&self) -> Result<()> {
        let Some(mode) = self.mode() else {
            return Err(Error::Configuration("sweep grid has no knobs".into()));
        };
        if self.anneal_times.is_empty() {
            return Err(Error::Configuration("sweep grid has no anneal times".into()));
        }
        if let Some(other) = self.knobs.iter().find(|k| k.mode() != mode) {
            return Err(Error::Configuration(format!(
                "sweep grid mixes {mode} with {} knobs",
                other.mode()
            )));
        }
        self.start.validate()
    }
}

/// Runs schedule sweeps against a solver.
#[derive(Debug, Clone)]
pub struct SweepRunner {
    builder: ScheduleBuilder,
    read_count: usize,
}

impl SweepRunner {
    /// Create a runner that builds schedules with `builder` and draws
    /// `read_count` samples per grid point.
    #[must_use]
    pub const fn new(builder: ScheduleBuilder, read_count: usize) -> Self {
        Self {
            builder,
            read_count,
        }
    }

    /// Run one solver call per grid point, in grid order.
    ///
    /// Points whose schedule is invalid are skipped without a solver call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an invalid grid, and the
    /// solver's error on the first failed call. Results gathered before a
    /// failure are discarded.
    pub fn run<P, S>(&self, solver: &mut S, problem: &P, grid: &SweepGrid) -> Result<CandidateSet<Schedule>>
    where
        P: ?Sized,
        S: Solver<P> + ?Sized,
    {
        grid.validate()?;
        let mode = grid.mode().unwrap_or(AnnealMode::Pause);
        let label = format!(
            "Anneal Schedule {mode} Tuning - num_reads = {}",
            self.read_count
        );

        info!(
            backend = solver.name(),
            %mode,
            points = grid.len(),
            read_count = self.read_count,
            "starting schedule sweep"
        );

        let mut candidates = CandidateSet::new();
        let mut skipped = 0usize;

        for (index, point) in grid.points().into_iter().enumerate() {
            let schedule = match self
                .builder
                .build(point.knob, point.anneal_time, point.start)
            {
                Ok(schedule) => schedule,
                Err(e) if e.is_recoverable() => {
                    warn!(
                        index,
                        anneal_time = point.anneal_time,
                        start = point.start,
                        knob = ?point.knob,
                        error = %e,
                        "skipping grid point"
                    );
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let request = SolveRequest::new(self.read_count, label.clone()).schedule(schedule.clone());
            let result = solver.solve(problem, &request)?;

            debug!(
                index,
                schedule = %schedule.to_flat_text(),
                energy = result.energy(),
                correct = result.correct_solution_count(),
                "grid point solved"
            );
            candidates.push(schedule, result);
        }

        info!(
            %mode,
            trials = candidates.len(),
            skipped,
            "schedule sweep finished"
        );
        Ok(candidates)
    }

    /// Sweep `grid` and select the best schedule.
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run), plus [`Error::Configuration`] when every grid
    /// point was skipped.
    pub fn tune<P, S>(&self, solver: &mut S, problem: &P, grid: &SweepGrid) -> Result<TuningOutcome<Schedule>>
    where
        P: ?Sized,
        S: Solver<P> + ?Sized,
    {
        let outcome = TuningOutcome::from_candidates(self.run(solver, problem, grid)?)?;
        info!(
            best_index = outcome.best_index(),
            schedule = %outcome.best_parameter().to_flat_text(),
            energy = outcome.best().result.energy(),
            "selected anneal schedule"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleLimits;

    #[test]
    fn test_grid_order() {
        let grid = SweepGrid::new(
            vec![10.0, 20.0],
            vec![Knob::Pause { duration: 1.0 }, Knob::Pause { duration: 2.0 }],
            StartRange::new(0.3, 0.5, 2),
        );
        let points = grid.points();
        assert_eq!(points.len(), 8);
        assert!((points[0].anneal_time - 10.0).abs() < f64::EPSILON);
        assert!((points[0].start - 0.3).abs() < f64::EPSILON);
        assert!((points[1].start - 0.5).abs() < f64::EPSILON);
        assert_eq!(points[2].knob, Knob::Pause { duration: 2.0 });
        assert!((points[4].anneal_time - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_mixed_modes_rejected() {
        let grid = SweepGrid::new(
            vec![10.0],
            vec![Knob::Pause { duration: 1.0 }, Knob::Quench { slope: 1.0 }],
            StartRange::default(),
        );
        assert!(grid.validate().is_err());
    }

    #[test]
    fn test_grid_empty_rejected() {
        let grid = SweepGrid::new(vec![10.0], vec![], StartRange::default());
        assert!(grid.is_empty());
        assert!(grid.validate().is_err());
    }

    #[test]
    fn test_runner_builds_with_limits() {
        let runner = SweepRunner::new(ScheduleBuilder::new(ScheduleLimits::default()), 10);
        assert_eq!(runner.read_count, 10);
    }
}
