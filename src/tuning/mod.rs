//! Parameter tuning
//!
//! Schedule sweeps ([`SweepRunner`]) and chain-strength sweeps
//! ([`ChainTuner`]) invoke the solver once per candidate, strictly one call
//! at a time, and collect a [`CandidateSet`]. The comparator
//! ([`select_best`]) then picks the winner with the shared
//! [`SelectionPolicy`](crate::selection::SelectionPolicy).
//!
//! ## Usage
//!
//! ```rust,no_run
//! # use anneal_tuner::solver::Solver;
//! # fn demo<S: Solver<()>>(qpu: &mut S) -> anneal_tuner::Result<()> {
//! use anneal_tuner::schedule::{AnnealMode, ScheduleBuilder};
//! use anneal_tuner::tuning::{SweepRunner, TuningConfig};
//!
//! let config = TuningConfig::default();
//! let runner = SweepRunner::new(ScheduleBuilder::new(qpu.schedule_limits()), config.read_count);
//!
//! let outcome = runner.tune(qpu, &(), &config.grid(AnnealMode::Pause))?;
//! println!("best schedule: {}", outcome.best_parameter().to_flat_text());
//! # Ok(())
//! # }
//! ```

mod candidates;
mod chain;
mod config;
mod sweep;

pub use candidates::{select_best, CandidateSet, Trial, TuningOutcome};
pub use chain::ChainTuner;
pub use config::{ChainGrid, StartRange, TuningConfig};
pub use sweep::{GridPoint, SweepGrid, SweepRunner};
