//! Chain-strength tuning: a one-dimensional sweep over scalar values

use tracing::{debug, info};

use super::{CandidateSet, ChainGrid, TuningOutcome};
use crate::solver::{SolveRequest, Solver};
use crate::{Error, Result};

/// Tunes the chain strength of an embedded problem.
#[derive(Debug, Clone)]
pub struct ChainTuner {
    grid: ChainGrid,
    read_count: usize,
}

impl ChainTuner {
    /// Create a tuner over `grid` drawing `read_count` samples per value.
    #[must_use]
    pub const fn new(grid: ChainGrid, read_count: usize) -> Self {
        Self { grid, read_count }
    }

    /// Try every chain strength of the grid once and select the best.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the grid is empty or holds a
    /// non-positive value (checked before any solver call), and the
    /// solver's error on the first failed call.
    pub fn tune<P, S>(&self, solver: &mut S, problem: &P, initial_chain: f64) -> Result<TuningOutcome<f64>>
    where
        P: ?Sized,
        S: Solver<P> + ?Sized,
    {
        let values = self.grid.values(initial_chain);
        if values.is_empty() {
            return Err(Error::Configuration("chain grid is empty".into()));
        }
        if let Some(bad) = values.iter().find(|v| !(**v > 0.0 && v.is_finite())) {
            return Err(Error::Configuration(format!(
                "chain strength must be positive, got {bad}"
            )));
        }

        info!(
            backend = solver.name(),
            initial_chain,
            values = values.len(),
            read_count = self.read_count,
            "starting chain strength tuning"
        );

        let label = format!("Chain Strength Tuning - num_reads = {}", self.read_count);
        let mut candidates = CandidateSet::new();
        for chain in values {
            let request = SolveRequest::new(self.read_count, label.clone()).chain_strength(chain);
            let result = solver.solve(problem, &request)?;
            debug!(
                chain,
                energy = result.energy(),
                correct = result.correct_solution_count(),
                "chain strength solved"
            );
            candidates.push(chain, result);
        }

        let outcome = TuningOutcome::from_candidates(candidates)?;
        info!(
            chain = outcome.best_parameter(),
            energy = outcome.best().result.energy(),
            "selected chain strength"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{BackendKind, TrialResult};

    struct Quadratic {
        calls: Vec<f64>,
    }

    impl Solver<()> for Quadratic {
        fn name(&self) -> &str {
            "quadratic"
        }

        fn kind(&self) -> BackendKind {
            BackendKind::Qpu
        }

        fn solve(&mut self, _problem: &(), request: &SolveRequest) -> Result<TrialResult> {
            let chain = request.chain_strength.unwrap_or_default();
            self.calls.push(chain);
            Ok(TrialResult::new(vec![(chain - 3.0).powi(2)], 0))
        }
    }

    #[test]
    fn test_tune_picks_minimum_energy() {
        let mut solver = Quadratic { calls: Vec::new() };
        let tuner = ChainTuner::new(ChainGrid::Explicit(vec![1.0, 2.0, 3.0, 4.0]), 10);
        let outcome = tuner.tune(&mut solver, &(), 2.0).unwrap();
        assert!((outcome.best_parameter() - 3.0).abs() < f64::EPSILON);
        assert_eq!(solver.calls, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_tune_rejects_non_positive_before_solving() {
        let mut solver = Quadratic { calls: Vec::new() };
        let tuner = ChainTuner::new(ChainGrid::Explicit(vec![1.0, -1.0]), 10);
        assert!(tuner.tune(&mut solver, &(), 2.0).is_err());
        assert!(solver.calls.is_empty());
    }

    #[test]
    fn test_tune_scaled_grid() {
        let mut solver = Quadratic { calls: Vec::new() };
        let tuner = ChainTuner::new(
            ChainGrid::Scaled {
                factors: vec![0.5, 1.0, 1.5],
            },
            10,
        );
        let outcome = tuner.tune(&mut solver, &(), 2.0).unwrap();
        assert_eq!(solver.calls, vec![1.0, 2.0, 3.0]);
        assert_eq!(outcome.best_index(), 2);
    }
}
