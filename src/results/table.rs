//! Results table - retained trials of every tuning family for one problem size

use std::fmt;
use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::schedule::{AnnealMode, Schedule};
use crate::selection::Candidate;
use crate::storage::{float_column, int_column, text_column, StorageEngine};
use crate::{Error, Result};

/// `Parameter` column
pub const PARAMETER: &str = "Parameter";
/// `Type` column
pub const TYPE: &str = "Type";
/// `Energy` column
pub const ENERGY: &str = "Energy";
/// `Correct Sol Num` column
pub const CORRECT_SOL_NUM: &str = "Correct Sol Num";
/// `QPU Access Time` column
pub const QPU_ACCESS_TIME: &str = "QPU Access Time";
/// `QPU Programming Time` column
pub const QPU_PROGRAMMING_TIME: &str = "QPU Programming Time";

/// Tuning family of a row, stored in the `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    /// Chain strength (0)
    Chain,
    /// Pause schedule (1)
    Pause,
    /// Quench schedule (2)
    Quench,
    /// Pause-and-quench schedule (3)
    PauseAndQuench,
}

impl ParameterType {
    /// All families, in `Type` order.
    pub const ALL: [Self; 4] = [Self::Chain, Self::Pause, Self::Quench, Self::PauseAndQuench];

    /// Integer tag stored in the `Type` column.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Chain => 0,
            Self::Pause => 1,
            Self::Quench => 2,
            Self::PauseAndQuench => 3,
        }
    }

    /// Decode a `Type` tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] for tags outside `0..=3`.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Chain),
            1 => Ok(Self::Pause),
            2 => Ok(Self::Quench),
            3 => Ok(Self::PauseAndQuench),
            other => Err(Error::ParseError(format!("unknown parameter type {other}"))),
        }
    }

    /// Whether rows of this family hold a schedule.
    #[must_use]
    pub const fn is_schedule(self) -> bool {
        !matches!(self, Self::Chain)
    }

    /// Name of the parameter column in this family's trial log.
    #[must_use]
    pub const fn log_column(self) -> &'static str {
        match self {
            Self::Chain => "Chain Strength",
            _ => "Schedule",
        }
    }

    /// Stable lowercase name, used for trial log file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::Pause => "pause",
            Self::Quench => "quench",
            Self::PauseAndQuench => "pause_and_quench",
        }
    }
}

impl From<AnnealMode> for ParameterType {
    fn from(mode: AnnealMode) -> Self {
        match mode {
            AnnealMode::Pause => Self::Pause,
            AnnealMode::Quench => Self::Quench,
            AnnealMode::PauseAndQuench => Self::PauseAndQuench,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tuned value: a chain strength or an anneal schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Chain strength
    Chain(f64),
    /// Anneal schedule
    Schedule(Schedule),
}

impl Parameter {
    /// Text form stored in table files: the number for a chain strength, the
    /// bracketed flat list for a schedule.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Chain(value) => format!("{value:?}"),
            Self::Schedule(schedule) => schedule.to_flat_text(),
        }
    }

    /// Parse the text form for a row of family `parameter_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] (or [`Error::InvalidSchedule`]) if the
    /// text does not hold a value of that family.
    pub fn parse(text: &str, parameter_type: ParameterType) -> Result<Self> {
        if parameter_type.is_schedule() {
            Schedule::parse_flat_text(text).map(Self::Schedule)
        } else {
            text.trim()
                .parse::<f64>()
                .map(Self::Chain)
                .map_err(|e| Error::ParseError(format!("invalid chain strength '{text}': {e}")))
        }
    }

    /// The chain strength, if this is one.
    #[must_use]
    pub const fn as_chain(&self) -> Option<f64> {
        match self {
            Self::Chain(value) => Some(*value),
            Self::Schedule(_) => None,
        }
    }

    /// The schedule, if this is one.
    #[must_use]
    pub const fn as_schedule(&self) -> Option<&Schedule> {
        match self {
            Self::Chain(_) => None,
            Self::Schedule(schedule) => Some(schedule),
        }
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Self::Chain(value)
    }
}

impl From<Schedule> for Parameter {
    fn from(schedule: Schedule) -> Self {
        Self::Schedule(schedule)
    }
}

/// One retained trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Tuned value
    pub parameter: Parameter,
    /// Tuning family
    pub parameter_type: ParameterType,
    /// Lowest sample energy of the trial
    pub energy: f64,
    /// Samples that were valid tours
    pub correct_solution_count: u64,
    /// QPU access time (µs), absent for software trials
    pub qpu_access_time: Option<f64>,
    /// QPU programming time (µs), absent for software trials
    pub qpu_programming_time: Option<f64>,
}

impl Candidate for ResultRow {
    fn correct_solution_count(&self) -> u64 {
        self.correct_solution_count
    }

    fn energy(&self) -> f64 {
        self.energy
    }

    fn qpu_access_time(&self) -> Option<f64> {
        self.qpu_access_time
    }
}

/// Retained trials for one problem size, in family order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    rows: Vec<ResultRow>,
}

impl ResultsTable {
    /// Create a table from rows.
    #[must_use]
    pub const fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append rows.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = ResultRow>) {
        self.rows.extend(rows);
    }

    /// Rows whose family satisfies `predicate`, in table order.
    pub fn rows_where(&self, predicate: impl Fn(ParameterType) -> bool) -> Vec<&ResultRow> {
        self.rows
            .iter()
            .filter(|row| predicate(row.parameter_type))
            .collect()
    }

    /// Arrow schema of the persisted table.
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new(PARAMETER, DataType::Utf8, false),
            Field::new(TYPE, DataType::Int32, false),
            Field::new(ENERGY, DataType::Float64, false),
            Field::new(CORRECT_SOL_NUM, DataType::Int64, false),
            Field::new(QPU_ACCESS_TIME, DataType::Float64, true),
            Field::new(QPU_PROGRAMMING_TIME, DataType::Float64, true),
        ])
    }

    /// Convert to a single record batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arrow`] if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let parameters =
            StringArray::from_iter_values(self.rows.iter().map(|r| r.parameter.to_text()));
        let types = Int32Array::from_iter_values(self.rows.iter().map(|r| r.parameter_type.code()));
        let energies = Float64Array::from_iter_values(self.rows.iter().map(|r| r.energy));
        let correct = Int64Array::from_iter_values(
            self.rows
                .iter()
                .map(|r| i64::try_from(r.correct_solution_count).unwrap_or(i64::MAX)),
        );
        let access: Float64Array = self.rows.iter().map(|r| r.qpu_access_time).collect();
        let programming: Float64Array = self.rows.iter().map(|r| r.qpu_programming_time).collect();

        Ok(RecordBatch::try_new(
            Arc::new(Self::schema()),
            vec![
                Arc::new(parameters),
                Arc::new(types),
                Arc::new(energies),
                Arc::new(correct),
                Arc::new(access),
                Arc::new(programming),
            ],
        )?)
    }

    /// Read rows from any table holding the results columns by name.
    ///
    /// Timing columns are optional; a missing one reads as absent values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] for a missing required column and
    /// [`Error::ParseError`] for unreadable values.
    pub fn from_storage(storage: &StorageEngine) -> Result<Self> {
        read_rows(storage, PARAMETER, None).map(Self::new)
    }
}

/// Read result rows by column name. With `family` set, every row belongs to
/// it and no `Type` column is needed (trial logs); otherwise `Type` is read
/// per row.
pub(super) fn read_rows(
    storage: &StorageEngine,
    parameter_column: &str,
    family: Option<ParameterType>,
) -> Result<Vec<ResultRow>> {
    let mut rows = Vec::with_capacity(storage.num_rows());

    for batch in storage.batches() {
        let parameters = text_column(batch, parameter_column)?;
        let types = match family {
            Some(_) => Vec::new(),
            None => int_column(batch, TYPE)?,
        };
        let energies = float_column(batch, ENERGY)?;
        let correct = int_column(batch, CORRECT_SOL_NUM)?;
        let access = optional_float_column(batch, QPU_ACCESS_TIME)?;
        let programming = optional_float_column(batch, QPU_PROGRAMMING_TIME)?;

        for i in 0..batch.num_rows() {
            let parameter_type = match family {
                Some(family) => family,
                None => ParameterType::from_code(required(types[i], TYPE, i)?)?,
            };
            let text = parameters[i]
                .as_deref()
                .ok_or_else(|| missing_value(parameter_column, i))?;
            let count = required(correct[i], CORRECT_SOL_NUM, i)?;
            let correct_solution_count = u64::try_from(count).map_err(|_| {
                Error::ParseError(format!(
                    "row {i} has a negative value in column '{CORRECT_SOL_NUM}': {count}"
                ))
            })?;
            rows.push(ResultRow {
                parameter: Parameter::parse(text, parameter_type)?,
                parameter_type,
                energy: required(energies[i], ENERGY, i)?,
                correct_solution_count,
                qpu_access_time: access[i],
                qpu_programming_time: programming[i],
            });
        }
    }

    Ok(rows)
}

fn optional_float_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<f64>>> {
    if batch.column_by_name(name).is_some() {
        float_column(batch, name)
    } else {
        Ok(vec![None; batch.num_rows()])
    }
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T> {
    value.ok_or_else(|| missing_value(column, row))
}

fn missing_value(column: &str, row: usize) -> Error {
    Error::ParseError(format!("row {row} has no value in column '{column}'"))
}
