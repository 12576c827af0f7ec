//! Best-parameter resolver

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ParameterType, ResultRow, ResultsStore, ResultsTable};
use crate::schedule::Schedule;
use crate::selection::SelectionPolicy;
use crate::{Error, Result};

/// Best chain strength and schedule known for a problem size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestParameters {
    /// Chain strength, rounded to two decimals
    pub chain_strength: f64,
    /// Anneal schedule
    pub schedule: Schedule,
}

/// Resolves best parameters from persisted results tables.
#[derive(Debug, Clone)]
pub struct ResultsReader {
    store: ResultsStore,
    policy: SelectionPolicy,
}

impl ResultsReader {
    /// Reader over `store` using the default selection policy, the same one
    /// tuning runs select with.
    #[must_use]
    pub fn new(store: ResultsStore) -> Self {
        Self {
            store,
            policy: SelectionPolicy::default(),
        }
    }

    /// Best chain strength and best schedule for `num_nodes`.
    ///
    /// Chain rows (`Type == 0`) and schedule rows (every other type) are
    /// resolved independently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingResults`] if no table exists for the size and
    /// [`Error::StorageError`] if the table has no chain or no schedule rows.
    pub fn get_best_parameters(&self, num_nodes: u32) -> Result<BestParameters> {
        let table = self.store.load(num_nodes)?;
        let best = self.resolve(&table)?;
        info!(
            num_nodes,
            chain_strength = best.chain_strength,
            schedule = %best.schedule.to_flat_text(),
            "resolved best parameters"
        );
        Ok(best)
    }

    /// Resolve best parameters from an in-memory table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] if the table has no chain or no
    /// schedule rows.
    pub fn resolve(&self, table: &ResultsTable) -> Result<BestParameters> {
        let chain_row = self.best_row(table, "chain", |t| t == ParameterType::Chain)?;
        let schedule_row = self.best_row(table, "schedule", ParameterType::is_schedule)?;

        let chain = chain_row.parameter.as_chain().ok_or_else(|| {
            Error::StorageError("chain row does not hold a chain strength".into())
        })?;
        let schedule = schedule_row.parameter.as_schedule().cloned().ok_or_else(|| {
            Error::StorageError("schedule row does not hold a schedule".into())
        })?;

        Ok(BestParameters {
            chain_strength: round_to_hundredths(chain),
            schedule,
        })
    }

    fn best_row<'a>(
        &self,
        table: &'a ResultsTable,
        what: &str,
        predicate: impl Fn(ParameterType) -> bool,
    ) -> Result<&'a ResultRow> {
        let rows = table.rows_where(predicate);
        self.policy
            .select(&rows)
            .map(|index| rows[index])
            .ok_or_else(|| Error::StorageError(format!("results table has no {what} rows")))
    }
}

/// Two decimals, exact ties to even (1.125 -> 1.12).
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Parameter, ResultsPaths};

    fn reader() -> ResultsReader {
        ResultsReader::new(ResultsStore::new(ResultsPaths::new("unused")))
    }

    fn chain(value: f64, energy: f64, correct: u64, access: Option<f64>) -> ResultRow {
        ResultRow {
            parameter: Parameter::Chain(value),
            parameter_type: ParameterType::Chain,
            energy,
            correct_solution_count: correct,
            qpu_access_time: access,
            qpu_programming_time: None,
        }
    }

    fn schedule(mid: f64, family: ParameterType, energy: f64, correct: u64) -> ResultRow {
        ResultRow {
            parameter: Parameter::Schedule(
                Schedule::from_pairs(&[[0.0, 0.0], [mid, 0.4], [20.0, 1.0]]).unwrap(),
            ),
            parameter_type: family,
            energy,
            correct_solution_count: correct,
            qpu_access_time: Some(100.0),
            qpu_programming_time: None,
        }
    }

    #[test]
    fn test_resolve_prefers_correct_solutions() {
        let table = ResultsTable::new(vec![
            chain(1.234, -9.0, 0, Some(10.0)),
            chain(2.345_6, -4.0, 3, Some(10.0)),
            schedule(5.0, ParameterType::Pause, -9.0, 0),
            schedule(10.0, ParameterType::Quench, -3.0, 1),
        ]);
        let best = reader().resolve(&table).unwrap();
        assert!((best.chain_strength - 2.35).abs() < 1e-12);
        assert_eq!(best.schedule.to_pairs()[1], [10.0, 0.4]);
    }

    #[test]
    fn test_resolve_fallback_and_access_time() {
        let table = ResultsTable::new(vec![
            chain(1.0, -2.0, 0, Some(90.0)),
            chain(2.0, -5.0, 0, Some(80.0)),
            chain(3.0, -5.0, 0, Some(70.0)),
            schedule(5.0, ParameterType::PauseAndQuench, -1.0, 0),
        ]);
        let best = reader().resolve(&table).unwrap();
        assert!((best.chain_strength - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_rounds_ties_to_even() {
        for (value, expected) in [(1.5 * 0.75, 1.12), (2.5 * 0.75, 1.88), (0.125, 0.12)] {
            let table = ResultsTable::new(vec![
                chain(value, -2.0, 1, None),
                schedule(5.0, ParameterType::Pause, -1.0, 0),
            ]);
            let best = reader().resolve(&table).unwrap();
            assert!((best.chain_strength - expected).abs() < 1e-12, "{value}");
        }
    }

    #[test]
    fn test_resolve_missing_family() {
        let table = ResultsTable::new(vec![chain(1.0, -2.0, 1, None)]);
        let err = reader().resolve(&table).unwrap_err();
        assert!(err.to_string().contains("schedule"));
    }
}
