use tracing::{debug, info};

use super::{ResultsPaths, ResultsTable};
use crate::storage::StorageEngine;
use crate::{Error, Result};

/// Persisted results tables, one per problem size.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    paths: ResultsPaths,
}

impl ResultsStore {
    /// Store rooted at `paths`.
    #[must_use]
    pub const fn new(paths: ResultsPaths) -> Self {
        Self { paths }
    }

    /// Locations used by this store.
    #[must_use]
    pub const fn paths(&self) -> &ResultsPaths {
        &self.paths
    }

    /// Replace the table for `num_nodes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be converted or written.
    pub fn save(&self, num_nodes: u32, table: &ResultsTable) -> Result<()> {
        let path = self.paths.results_table(num_nodes);
        let batch = table.to_record_batch()?;
        StorageEngine::new(vec![batch]).write_parquet(&path)?;
        info!(num_nodes, rows = table.len(), path = %path.display(), "saved results table");
        Ok(())
    }

    /// Load the table for `num_nodes`, falling back to a legacy CSV table
    /// when no Parquet table exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingResults`] if neither file exists, or the
    /// storage error if the file is unreadable.
    pub fn load(&self, num_nodes: u32) -> Result<ResultsTable> {
        let parquet = self.paths.results_table(num_nodes);
        let legacy = self.paths.legacy_results_csv(num_nodes);

        let storage = if parquet.is_file() {
            StorageEngine::load_parquet(&parquet)?
        } else if legacy.is_file() {
            debug!(path = %legacy.display(), "reading legacy csv results table");
            StorageEngine::load_csv(&legacy)?
        } else {
            return Err(Error::MissingResults { num_nodes });
        };

        let table = ResultsTable::from_storage(&storage)?;
        debug!(num_nodes, rows = table.len(), "loaded results table");
        Ok(table)
    }

    /// Whether a table exists for `num_nodes`.
    #[must_use]
    pub fn contains(&self, num_nodes: u32) -> bool {
        self.paths.results_table(num_nodes).is_file()
            || self.paths.legacy_results_csv(num_nodes).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Parameter, ParameterType, ResultRow};

    fn temp_store(name: &str) -> ResultsStore {
        let root = std::env::temp_dir().join(format!(
            "anneal_tuner_store_{}_{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        ResultsStore::new(ResultsPaths::new(root))
    }

    fn row(chain: f64, energy: f64) -> ResultRow {
        ResultRow {
            parameter: Parameter::Chain(chain),
            parameter_type: ParameterType::Chain,
            energy,
            correct_solution_count: 1,
            qpu_access_time: None,
            qpu_programming_time: None,
        }
    }

    #[test]
    fn test_missing_table() {
        let store = temp_store("missing");
        assert!(!store.contains(5));
        assert!(matches!(
            store.load(5),
            Err(Error::MissingResults { num_nodes: 5 })
        ));
    }

    #[test]
    fn test_save_replaces_previous_table() {
        let store = temp_store("replace");
        store
            .save(6, &ResultsTable::new(vec![row(1.0, -1.0), row(2.0, -2.0)]))
            .unwrap();
        store.save(6, &ResultsTable::new(vec![row(3.0, -3.0)])).unwrap();

        let table = store.load(6).unwrap();
        assert_eq!(table.rows(), &[row(3.0, -3.0)]);
    }

    #[test]
    fn test_legacy_csv_import() {
        let store = temp_store("legacy");
        let table = ResultsTable::new(vec![row(1.5, -7.0)]);
        StorageEngine::new(vec![table.to_record_batch().unwrap()])
            .write_csv(store.paths().legacy_results_csv(9))
            .unwrap();

        assert!(store.contains(9));
        assert_eq!(store.load(9).unwrap(), table);
    }
}
