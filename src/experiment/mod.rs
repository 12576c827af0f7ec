//! Experiments and run tracking
//!
//! ```text
//! ExperimentCatalog (1) ──< Experiment (N) ──< RunRecord (N)
//! ```
//!
//! An [`Experiment`] names one problem instance. Its `num_nodes` is the
//! partition key of every trial log and results table written for it.
//!
//! ## Usage
//!
//! ```rust
//! use anneal_tuner::experiment::{Experiment, ExperimentCatalog, TrialSpec};
//!
//! let mut catalog = ExperimentCatalog::new();
//! catalog.insert(
//!     Experiment::builder("tsp-8", 8)
//!         .label("TSP 8 nodes")
//!         .qpu_trial(TrialSpec::hardware(2000, 3.0))
//!         .build(),
//! )?;
//!
//! assert_eq!(catalog.get("tsp-8")?.num_nodes(), 8);
//! # Ok::<(), anneal_tuner::Error>(())
//! ```

mod catalog;
mod definition;
mod run_record;

pub use catalog::ExperimentCatalog;
pub use definition::{Experiment, ExperimentBuilder, NormFactors, TrialSpec};
pub use run_record::{RunRecord, RunStatus};
