//! Result aggregator: trial logs → one results table per problem size

use tracing::{debug, info, warn};

use super::trial_log::read_trial_log;
use super::{ParameterType, ResultRow, ResultsStore, ResultsTable};
use crate::{Error, Result};

/// Rows of one family worth keeping: every row with a correct solution,
/// followed by every row at the family's minimum energy. A row matching both
/// appears twice.
#[must_use]
pub fn retain_best_rows(rows: &[ResultRow]) -> Vec<ResultRow> {
    let min_energy = rows
        .iter()
        .map(|row| row.energy)
        .filter(|energy| !energy.is_nan())
        .fold(f64::INFINITY, f64::min);

    let with_solution = rows.iter().filter(|row| row.correct_solution_count >= 1);
    #[allow(clippy::float_cmp)]
    let at_minimum = rows.iter().filter(|row| row.energy == min_energy);

    with_solution.chain(at_minimum).cloned().collect()
}

/// Builds results tables from the trial logs of every tuning family.
#[derive(Debug, Clone)]
pub struct ResultsWriter {
    store: ResultsStore,
}

impl ResultsWriter {
    /// Writer persisting through `store`.
    #[must_use]
    pub const fn new(store: ResultsStore) -> Self {
        Self { store }
    }

    /// Aggregate the trial logs of size `num_nodes` into its results table,
    /// replacing any previous table. Families are concatenated in `Type`
    /// order; a family without a log is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTrialLogs`] if no family has a log, and the
    /// storage error if a log is unreadable or the table cannot be written.
    pub fn write_results(&self, num_nodes: u32) -> Result<ResultsTable> {
        let mut table = ResultsTable::default();
        let mut logs_found = 0_usize;

        for family in ParameterType::ALL {
            let path = self.store.paths().trial_log(num_nodes, family);
            if !path.is_file() {
                warn!(num_nodes, family = %family, path = %path.display(), "trial log not found, skipping family");
                continue;
            }
            logs_found += 1;

            let rows = read_trial_log(&path, family)?;
            let retained = retain_best_rows(&rows);
            debug!(
                family = %family,
                trials = rows.len(),
                retained = retained.len(),
                "filtered trial log"
            );
            table.extend(retained);
        }

        if logs_found == 0 {
            return Err(Error::MissingTrialLogs { num_nodes });
        }

        self.store.save(num_nodes, &table)?;
        info!(num_nodes, families = logs_found, rows = table.len(), "wrote results table");
        Ok(table)
    }
}
