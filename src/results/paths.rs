use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ParameterType;

/// On-disk locations of trial logs and results tables, all under one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsPaths {
    root: PathBuf,
}

impl Default for ResultsPaths {
    fn default() -> Self {
        Self::new("output")
    }
}

impl ResultsPaths {
    /// Resolve locations under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Trial log of one tuning family: `<root>/performance/<n>/<family>.csv`.
    #[must_use]
    pub fn trial_log(&self, num_nodes: u32, family: ParameterType) -> PathBuf {
        self.root
            .join("performance")
            .join(num_nodes.to_string())
            .join(format!("{family}.csv"))
    }

    /// Results table: `<root>/results/<n>/performance_results.parquet`.
    #[must_use]
    pub fn results_table(&self, num_nodes: u32) -> PathBuf {
        self.results_dir(num_nodes).join("performance_results.parquet")
    }

    /// Results table written by older tooling.
    #[must_use]
    pub fn legacy_results_csv(&self, num_nodes: u32) -> PathBuf {
        self.results_dir(num_nodes).join("performance_results.csv")
    }

    fn results_dir(&self, num_nodes: u32) -> PathBuf {
        self.root.join("results").join(num_nodes.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = ResultsPaths::new("/data");
        assert_eq!(
            paths.trial_log(8, ParameterType::PauseAndQuench),
            PathBuf::from("/data/performance/8/pause_and_quench.csv")
        );
        assert_eq!(
            paths.results_table(8),
            PathBuf::from("/data/results/8/performance_results.parquet")
        );
        assert_eq!(
            paths.legacy_results_csv(12),
            PathBuf::from("/data/results/12/performance_results.csv")
        );
    }
}
