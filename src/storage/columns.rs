//! Typed column access by name

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::{Error, Result};

fn column_as(batch: &RecordBatch, name: &str, data_type: &DataType) -> Result<ArrayRef> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::StorageError(format!("Column not found: {name}")))?;
    cast(column, data_type).map_err(|e| {
        Error::ParseError(format!(
            "Column '{name}' of type {} cannot be read as {data_type}: {e}",
            column.data_type()
        ))
    })
}

/// Values of column `name` as `f64`, casting numeric or text columns.
///
/// # Errors
///
/// Returns [`Error::StorageError`] if the column is missing and
/// [`Error::ParseError`] if it cannot be cast.
pub fn float_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<f64>>> {
    let array = column_as(batch, name, &DataType::Float64)?;
    let values = array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| Error::ParseError(format!("Failed to downcast '{name}' to Float64Array")))?;
    Ok(values.iter().collect())
}

/// Values of column `name` as `i64`.
///
/// # Errors
///
/// Same as [`float_column`].
pub fn int_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<i64>>> {
    let array = column_as(batch, name, &DataType::Int64)?;
    let values = array
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| Error::ParseError(format!("Failed to downcast '{name}' to Int64Array")))?;
    Ok(values.iter().collect())
}

/// Values of column `name` as text. Numeric columns are formatted.
///
/// # Errors
///
/// Same as [`float_column`].
pub fn text_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<String>>> {
    let array = column_as(batch, name, &DataType::Utf8)?;
    let values = array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::ParseError(format!("Failed to downcast '{name}' to StringArray")))?;
    Ok(values.iter().map(|v| v.map(str::to_owned)).collect())
}
