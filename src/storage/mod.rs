//! Table files (Arrow/Parquet and CSV)
//!
//! Results tables are persisted as Parquet; trial logs are CSV so they stay
//! readable by spreadsheet tools and by older tooling.
//!
//! Write pattern: whole-table replacement. A table is written to a
//! temporary sibling file and renamed over the previous one, so readers see
//! either the old table or the new one, never a partial write.

mod columns;

pub use columns::{float_column, int_column, text_column};

use std::fs::{self, File};
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use tracing::debug;

use crate::{Error, Result};

/// Rows sampled when inferring the schema of a CSV file.
const CSV_INFER_RECORDS: usize = 1000;

/// In-memory table made of record batches sharing one schema.
pub struct StorageEngine {
    batches: Vec<RecordBatch>,
}

impl StorageEngine {
    /// Create a new storage engine from existing batches
    #[must_use]
    pub fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Load table from Parquet file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path.as_ref()).map_err(|e| {
            Error::StorageError(format!(
                "Failed to open Parquet file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::StorageError(format!("Failed to parse Parquet file: {e}"))
        })?;

        let reader = builder.build().map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet reader: {e}"))
        })?;

        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(path = %path.as_ref().display(), batches = batches.len(), "loaded parquet table");
        Ok(Self { batches })
    }

    /// Load table from a CSV file with a header row.
    ///
    /// Column types are inferred; callers look columns up by name and cast,
    /// so column order and extra columns do not matter.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        use arrow::csv::reader::Format;
        use arrow::csv::ReaderBuilder;

        let mut file = File::open(path.as_ref()).map_err(|e| {
            Error::StorageError(format!(
                "Failed to open CSV file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let (schema, _) = Format::default()
            .with_header(true)
            .infer_schema(&mut file, Some(CSV_INFER_RECORDS))?;
        file.rewind()?;

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_header(true)
            .build(file)?;

        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(path = %path.as_ref().display(), batches = batches.len(), "loaded csv table");
        Ok(Self { batches })
    }

    /// Get all record batches
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total number of rows across batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Append a batch
    ///
    /// # Errors
    ///
    /// Returns error if batch schema doesn't match existing batches
    pub fn append_batch(&mut self, batch: RecordBatch) -> Result<()> {
        if let Some(existing) = self.batches.first() {
            let existing_schema = existing.schema();
            if batch.schema() != existing_schema {
                return Err(Error::StorageError(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    existing_schema,
                    batch.schema()
                )));
            }
        }

        self.batches.push(batch);
        Ok(())
    }

    /// Replace the Parquet file at `path` with this table.
    ///
    /// # Errors
    /// Returns error if the table is empty or the file cannot be written
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use parquet::arrow::ArrowWriter;

        let path = path.as_ref();
        let schema = self.schema()?;
        replace_file(path, |file| {
            let mut writer = ArrowWriter::try_new(file, schema, None).map_err(|e| {
                Error::StorageError(format!("Failed to create Parquet writer: {e}"))
            })?;
            for batch in &self.batches {
                writer.write(batch).map_err(|e| {
                    Error::StorageError(format!("Failed to write record batch: {e}"))
                })?;
            }
            writer.close().map_err(|e| {
                Error::StorageError(format!("Failed to finish Parquet file: {e}"))
            })?;
            Ok(())
        })?;

        debug!(path = %path.display(), rows = self.num_rows(), "wrote parquet table");
        Ok(())
    }

    /// Replace the CSV file at `path` with this table, header included.
    ///
    /// # Errors
    /// Returns error if the table is empty or the file cannot be written
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use arrow::csv::WriterBuilder;

        let path = path.as_ref();
        self.schema()?;
        replace_file(path, |file| {
            let mut writer = WriterBuilder::new().with_header(true).build(file);
            for batch in &self.batches {
                writer.write(batch)?;
            }
            Ok(())
        })?;

        debug!(path = %path.display(), rows = self.num_rows(), "wrote csv table");
        Ok(())
    }

    fn schema(&self) -> Result<arrow::datatypes::SchemaRef> {
        self.batches
            .first()
            .map(RecordBatch::schema)
            .ok_or_else(|| Error::StorageError("Cannot write a table without batches".into()))
    }
}

/// Write `path` through a temporary sibling renamed over it on success.
/// On failure the temporary file is removed and `path` is left untouched.
fn replace_file(path: &Path, write: impl FnOnce(File) -> Result<()>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = File::create(&tmp)
        .map_err(Error::from)
        .and_then(write)
        .and_then(|()| fs::rename(&tmp, path).map_err(Error::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
