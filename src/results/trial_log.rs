//! Per-family trial logs written by tuning runs and read by the aggregator

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tracing::info;

use super::table::{
    read_rows, CORRECT_SOL_NUM, ENERGY, QPU_ACCESS_TIME, QPU_PROGRAMMING_TIME,
};
use super::{Parameter, ParameterType, ResultRow};
use crate::storage::StorageEngine;
use crate::tuning::TuningOutcome;
use crate::Result;

/// `Mean Energy` column (trial logs only)
pub const MEAN_ENERGY: &str = "Mean Energy";
/// `Best` column (trial logs only)
pub const BEST: &str = "Best";

/// Arrow schema of a trial log for `family`.
#[must_use]
pub fn trial_log_schema(family: ParameterType) -> Schema {
    Schema::new(vec![
        Field::new(family.log_column(), DataType::Utf8, false),
        Field::new(ENERGY, DataType::Float64, false),
        Field::new(MEAN_ENERGY, DataType::Float64, true),
        Field::new(BEST, DataType::Int64, false),
        Field::new(CORRECT_SOL_NUM, DataType::Int64, false),
        Field::new(QPU_ACCESS_TIME, DataType::Float64, true),
        Field::new(QPU_PROGRAMMING_TIME, DataType::Float64, true),
    ])
}

/// Convert a finished tuning run into a trial log batch, one row per trial
/// in run order, with `Best = 1` on the winner.
///
/// # Errors
///
/// Returns [`Error::Arrow`](crate::Error::Arrow) if the batch cannot be
/// assembled.
pub fn trial_log_batch<T>(family: ParameterType, outcome: &TuningOutcome<T>) -> Result<RecordBatch>
where
    T: Clone + Into<Parameter>,
{
    let trials = outcome.candidates().trials();
    let best_index = outcome.best_index();

    let parameters = StringArray::from_iter_values(
        trials
            .iter()
            .map(|t| t.parameter.clone().into().to_text()),
    );
    let energies = Float64Array::from_iter_values(trials.iter().map(|t| t.result.energy()));
    let means: Float64Array = trials.iter().map(|t| t.result.mean_energy()).collect();
    let best = Int64Array::from_iter_values((0..trials.len()).map(|i| i64::from(i == best_index)));
    let correct = Int64Array::from_iter_values(trials.iter().map(|t| {
        i64::try_from(t.result.correct_solution_count()).unwrap_or(i64::MAX)
    }));
    let access: Float64Array = trials.iter().map(|t| t.result.qpu_access_time()).collect();
    let programming: Float64Array = trials
        .iter()
        .map(|t| t.result.qpu_programming_time())
        .collect();

    Ok(RecordBatch::try_new(
        Arc::new(trial_log_schema(family)),
        vec![
            Arc::new(parameters),
            Arc::new(energies),
            Arc::new(means),
            Arc::new(best),
            Arc::new(correct),
            Arc::new(access),
            Arc::new(programming),
        ],
    )?)
}

/// Replace the trial log at `path` with the trials of `outcome`.
///
/// # Errors
///
/// Returns an error if the log cannot be written.
pub fn write_trial_log<T>(path: &Path, family: ParameterType, outcome: &TuningOutcome<T>) -> Result<()>
where
    T: Clone + Into<Parameter>,
{
    let batch = trial_log_batch(family, outcome)?;
    StorageEngine::new(vec![batch]).write_csv(path)?;
    info!(
        path = %path.display(),
        family = %family,
        trials = outcome.candidates().len(),
        "wrote trial log"
    );
    Ok(())
}

/// Read a trial log of `family`. Columns are looked up by name, so
/// `Mean Energy`, `Best` and any extra columns are ignored.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a required column is
/// missing or unreadable.
pub fn read_trial_log(path: &Path, family: ParameterType) -> Result<Vec<ResultRow>> {
    let storage = StorageEngine::load_csv(path)?;
    read_rows(&storage, family.log_column(), Some(family))
}
