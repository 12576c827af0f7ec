//! # anneal-tuner: Anneal Schedule and Chain-Strength Tuning
//!
//! **Version**: 0.1.0
//!
//! anneal-tuner picks the operating parameters of an annealing backend from
//! repeated trials. It builds physically valid piecewise-linear anneal
//! schedules, sweeps them (and chain strengths) against a solver, selects
//! winners with one shared multi-criterion policy, and persists the best
//! candidates per problem size so later runs can reuse them.
//!
//! ## Pipeline
//!
//! ```text
//! ScheduleBuilder ─▶ SweepRunner ─┐
//!                                 ├─▶ select_best ─▶ trial logs ─▶ ResultsWriter
//!             ChainTuner ─────────┘                                    │
//!                                                    ResultsReader ◀───┘
//! ```
//!
//! The [`orchestrator`] threads these steps together for nine fixed
//! execution modes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use anneal_tuner::results::{ResultsPaths, ResultsReader, ResultsStore};
//!
//! anneal_tuner::logging::init();
//!
//! let reader = ResultsReader::new(ResultsStore::new(ResultsPaths::new("output")));
//! let best = reader.get_best_parameters(8)?;
//! println!("chain {} schedule {}", best.chain_strength, best.schedule.to_flat_text());
//! # Ok::<(), anneal_tuner::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;
pub mod logging;
pub mod orchestrator;
pub mod results;
pub mod schedule;
pub mod selection;
pub mod solver;
pub mod storage;
pub mod tuning;

pub use error::{Error, Result};
