//! External solver seam
//!
//! Simulated annealing, QPU and hybrid backends live outside this crate.
//! The tuning engine only needs a synchronous `solve` returning a
//! [`TrialResult`], with failures reported as [`Error::SolverInvocation`].
//!
//! [`Error::SolverInvocation`]: crate::Error::SolverInvocation

use serde::{Deserialize, Serialize};

use crate::schedule::{Schedule, ScheduleLimits};
use crate::Result;

/// Solving backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Classical simulated annealing
    Simulated,
    /// Quantum processing unit
    Qpu,
    /// Hybrid classical/QPU decomposition
    Hybrid,
}

impl BackendKind {
    /// Short label used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "SA",
            Self::Qpu => "QPU",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// Parameters of one solver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    /// Number of samples to draw
    pub read_count: usize,
    /// Job label shown by the backend
    pub label: String,
    /// Chain strength; `None` lets the backend choose
    pub chain_strength: Option<f64>,
    /// Custom anneal schedule; `None` uses the backend default
    pub schedule: Option<Schedule>,
}

impl SolveRequest {
    /// Create a request with backend defaults for chain and schedule.
    #[must_use]
    pub fn new(read_count: usize, label: impl Into<String>) -> Self {
        Self {
            read_count,
            label: label.into(),
            chain_strength: None,
            schedule: None,
        }
    }

    /// Set the chain strength.
    #[must_use]
    pub const fn chain_strength(mut self, chain_strength: f64) -> Self {
        self.chain_strength = Some(chain_strength);
        self
    }

    /// Set the anneal schedule.
    #[must_use]
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}

/// Hardware timing of a trial, in µs. All fields are absent for
/// software backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QpuTiming {
    /// Total QPU access time
    pub access_time: Option<f64>,
    /// QPU programming time
    pub programming_time: Option<f64>,
    /// QPU sampling time
    pub sampling_time: Option<f64>,
    /// Anneal time per sample
    pub anneal_time_per_sample: Option<f64>,
}

/// Outcome of one solver invocation. Read-only to the tuning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    energies: Vec<f64>,
    correct_solution_count: u64,
    timing: QpuTiming,
}

impl TrialResult {
    /// Create a result from per-sample energies and the number of samples
    /// that encode a valid tour.
    #[must_use]
    pub fn new(energies: Vec<f64>, correct_solution_count: u64) -> Self {
        Self {
            energies,
            correct_solution_count,
            timing: QpuTiming::default(),
        }
    }

    /// Attach hardware timing.
    #[must_use]
    pub const fn with_timing(mut self, timing: QpuTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Per-sample energies.
    #[must_use]
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Lowest sample energy; `+inf` when no samples were returned.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Mean sample energy, if any samples were returned.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_energy(&self) -> Option<f64> {
        if self.energies.is_empty() {
            return None;
        }
        Some(self.energies.iter().sum::<f64>() / self.energies.len() as f64)
    }

    /// Number of samples that are valid tours.
    #[must_use]
    pub const fn correct_solution_count(&self) -> u64 {
        self.correct_solution_count
    }

    /// Hardware timing.
    #[must_use]
    pub const fn timing(&self) -> &QpuTiming {
        &self.timing
    }

    /// QPU access time, present for hardware trials only.
    #[must_use]
    pub const fn qpu_access_time(&self) -> Option<f64> {
        self.timing.access_time
    }

    /// QPU programming time, present for hardware trials only.
    #[must_use]
    pub const fn qpu_programming_time(&self) -> Option<f64> {
        self.timing.programming_time
    }
}

/// A solving backend.
///
/// Calls are synchronous: the tuning engine waits for each response before
/// issuing the next request.
pub trait Solver<P: ?Sized> {
    /// Backend identifier, used in errors and logs.
    fn name(&self) -> &str;

    /// Backend family.
    fn kind(&self) -> BackendKind;

    /// Schedule limits advertised by the backend.
    fn schedule_limits(&self) -> ScheduleLimits {
        ScheduleLimits::default()
    }

    /// Sample `problem` once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SolverInvocation`](crate::Error::SolverInvocation)
    /// when the backend fails or times out.
    fn solve(&mut self, problem: &P, request: &SolveRequest) -> Result<TrialResult>;
}
