//! Candidate sets and the comparator

use crate::selection::{Candidate, SelectionPolicy};
use crate::solver::TrialResult;
use crate::{Error, Result};

/// One tried parameter and the solver's response to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial<T> {
    /// Parameter the solver was invoked with
    pub parameter: T,
    /// Solver outcome
    pub result: TrialResult,
}

impl<T> Candidate for Trial<T> {
    fn correct_solution_count(&self) -> u64 {
        self.result.correct_solution_count()
    }

    fn energy(&self) -> f64 {
        self.result.energy()
    }

    fn qpu_access_time(&self) -> Option<f64> {
        self.result.qpu_access_time()
    }
}

/// Trials in the order they were run. Each parameter travels with its own
/// result, so the pairing can never drift.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet<T> {
    trials: Vec<Trial<T>>,
}

impl<T> Default for CandidateSet<T> {
    fn default() -> Self {
        Self { trials: Vec::new() }
    }
}

impl<T> CandidateSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trial.
    pub fn push(&mut self, parameter: T, result: TrialResult) {
        self.trials.push(Trial { parameter, result });
    }

    /// Trials in run order.
    #[must_use]
    pub fn trials(&self) -> &[Trial<T>] {
        &self.trials
    }

    /// Number of trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Whether no trial was run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Trial at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Trial<T>> {
        self.trials.get(index)
    }
}

impl<T> FromIterator<(T, TrialResult)> for CandidateSet<T> {
    fn from_iter<I: IntoIterator<Item = (T, TrialResult)>>(iter: I) -> Self {
        Self {
            trials: iter
                .into_iter()
                .map(|(parameter, result)| Trial { parameter, result })
                .collect(),
        }
    }
}

/// Index of the best trial under the default selection policy: any
/// correct solution first, then minimum energy, then minimum QPU access
/// time, then first seen.
#[must_use]
pub fn select_best<T>(candidates: &CandidateSet<T>) -> Option<usize> {
    SelectionPolicy::default().select(candidates.trials())
}

/// A finished tuning run: every trial plus the winner.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningOutcome<T> {
    candidates: CandidateSet<T>,
    best_index: usize,
}

impl<T> TuningOutcome<T> {
    /// Select the winner of `candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the set is empty (every grid
    /// point was skipped or the grid itself was empty).
    pub fn from_candidates(candidates: CandidateSet<T>) -> Result<Self> {
        let best_index = select_best(&candidates).ok_or_else(|| {
            Error::Configuration("tuning grid produced no valid candidates".into())
        })?;
        Ok(Self {
            candidates,
            best_index,
        })
    }

    /// All trials in run order.
    #[must_use]
    pub const fn candidates(&self) -> &CandidateSet<T> {
        &self.candidates
    }

    /// Position of the winner in [`candidates`](Self::candidates).
    #[must_use]
    pub const fn best_index(&self) -> usize {
        self.best_index
    }

    /// The winning trial.
    #[must_use]
    pub fn best(&self) -> &Trial<T> {
        &self.candidates.trials[self.best_index]
    }

    /// The winning parameter.
    #[must_use]
    pub fn best_parameter(&self) -> &T {
        &self.best().parameter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::QpuTiming;

    fn timed(energy: f64, correct: u64, access: f64) -> TrialResult {
        TrialResult::new(vec![energy], correct).with_timing(QpuTiming {
            access_time: Some(access),
            ..QpuTiming::default()
        })
    }

    #[test]
    fn test_select_best_priority() {
        let set: CandidateSet<f64> = vec![
            (1.0, TrialResult::new(vec![5.0], 0)),
            (2.0, TrialResult::new(vec![3.0], 1)),
            (3.0, TrialResult::new(vec![1.0], 0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(select_best(&set), Some(1));
    }

    #[test]
    fn test_select_best_tie_break() {
        let set: CandidateSet<f64> = vec![(1.0, timed(2.0, 1, 100.0)), (2.0, timed(2.0, 1, 50.0))]
            .into_iter()
            .collect();
        assert_eq!(select_best(&set), Some(1));
    }

    #[test]
    fn test_select_best_idempotent() {
        let set: CandidateSet<f64> = (0..20_i32)
            .map(|i| (f64::from(i), timed(f64::from(i % 3), u64::from(i % 2 == 0), 10.0)))
            .collect();
        let first = select_best(&set);
        for _ in 0..5 {
            assert_eq!(select_best(&set), first);
        }
    }

    #[test]
    fn test_outcome_empty_set() {
        let err = TuningOutcome::<f64>::from_candidates(CandidateSet::new()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_outcome_best_parameter() {
        let mut set = CandidateSet::<f64>::new();
        set.push(4.0, TrialResult::new(vec![2.0], 0));
        set.push(8.0, TrialResult::new(vec![1.0], 0));
        let outcome = TuningOutcome::from_candidates(set).unwrap();
        assert_eq!(outcome.best_index(), 1);
        assert!((outcome.best_parameter() - 8.0).abs() < f64::EPSILON);
    }
}
