//! Best-candidate selection
//!
//! Both the live sweep comparator and the persisted-results resolver pick a
//! winner with the same lexicographic policy:
//!
//! 1. prefer candidates with at least one correct solution
//! 2. among those, the minimum energy
//! 3. among energy ties, the minimum QPU access time
//! 4. remaining ties go to the first candidate in input order
//!
//! The policy is an ordered list of [`Criterion`]s. Each criterion narrows
//! the surviving set; a criterion that would eliminate every survivor is
//! skipped, which is how "no correct solution anywhere" falls back to plain
//! minimum energy. Narrowing stops as soon as one survivor remains.

use std::cmp::Ordering;

use crate::solver::TrialResult;

/// Scored candidate.
pub trait Candidate {
    /// Samples that encode a valid solution.
    fn correct_solution_count(&self) -> u64;

    /// Energy, lower is better.
    fn energy(&self) -> f64;

    /// QPU access time, absent for software backends.
    fn qpu_access_time(&self) -> Option<f64>;
}

impl Candidate for TrialResult {
    fn correct_solution_count(&self) -> u64 {
        Self::correct_solution_count(self)
    }

    fn energy(&self) -> f64 {
        Self::energy(self)
    }

    fn qpu_access_time(&self) -> Option<f64> {
        Self::qpu_access_time(self)
    }
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn correct_solution_count(&self) -> u64 {
        (**self).correct_solution_count()
    }

    fn energy(&self) -> f64 {
        (**self).energy()
    }

    fn qpu_access_time(&self) -> Option<f64> {
        (**self).qpu_access_time()
    }
}

/// One narrowing step of a [`SelectionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Keep candidates with `correct_solution_count >= 1`
    HasCorrectSolution,
    /// Keep candidates at the minimum energy
    MinEnergy,
    /// Keep candidates at the minimum QPU access time
    MinQpuAccessTime,
}

impl Criterion {
    /// Indices of `survivors` that satisfy this criterion, in input order.
    /// May be empty.
    fn narrow<C: Candidate>(self, candidates: &[C], survivors: &[usize]) -> Vec<usize> {
        match self {
            Self::HasCorrectSolution => survivors
                .iter()
                .copied()
                .filter(|&i| candidates[i].correct_solution_count() >= 1)
                .collect(),
            Self::MinEnergy => keep_minimum(survivors, |i| {
                let energy = candidates[i].energy();
                (!energy.is_nan()).then_some(energy)
            }),
            Self::MinQpuAccessTime => keep_minimum(survivors, |i| {
                candidates[i].qpu_access_time().filter(|t| !t.is_nan())
            }),
        }
    }
}

/// Keep the survivors whose key equals the minimum key. Survivors without a
/// key never win.
fn keep_minimum(survivors: &[usize], key: impl Fn(usize) -> Option<f64>) -> Vec<usize> {
    let minimum = survivors
        .iter()
        .filter_map(|&i| key(i))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    minimum.map_or_else(Vec::new, |min| {
        survivors
            .iter()
            .copied()
            .filter(|&i| key(i).is_some_and(|k| k.partial_cmp(&min) == Some(Ordering::Equal)))
            .collect()
    })
}

/// Ordered selection criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    criteria: Vec<Criterion>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(vec![
            Criterion::HasCorrectSolution,
            Criterion::MinEnergy,
            Criterion::MinQpuAccessTime,
        ])
    }
}

impl SelectionPolicy {
    /// Create a policy from criteria applied in order.
    #[must_use]
    pub const fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// Criteria in application order.
    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Indices of all candidates tied after every criterion, in input order.
    #[must_use]
    pub fn survivors<C: Candidate>(&self, candidates: &[C]) -> Vec<usize> {
        let mut survivors: Vec<usize> = (0..candidates.len()).collect();

        for criterion in &self.criteria {
            if survivors.len() <= 1 {
                break;
            }
            let narrowed = criterion.narrow(candidates, &survivors);
            if !narrowed.is_empty() {
                survivors = narrowed;
            }
        }

        survivors
    }

    /// Index of the winning candidate, or `None` for an empty input.
    ///
    /// Deterministic: the same input always yields the same index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anneal_tuner::selection::SelectionPolicy;
    /// use anneal_tuner::solver::TrialResult;
    ///
    /// let candidates = vec![
    ///     TrialResult::new(vec![5.0], 0),
    ///     TrialResult::new(vec![3.0], 1),
    ///     TrialResult::new(vec![1.0], 0),
    /// ];
    ///
    /// // A correct solution beats a lower energy
    /// assert_eq!(SelectionPolicy::default().select(&candidates), Some(1));
    /// ```
    #[must_use]
    pub fn select<C: Candidate>(&self, candidates: &[C]) -> Option<usize> {
        self.survivors(candidates).first().copied()
    }
}
