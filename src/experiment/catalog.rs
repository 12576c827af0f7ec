//! Experiment catalog - named experiments available to the orchestrator

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use super::{Experiment, NormFactors, TrialSpec};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    experiments: Vec<ExperimentEntry>,
}

#[derive(Debug, Deserialize)]
struct ExperimentEntry {
    name: String,
    label: String,
    num_nodes: u32,
    norm_factors: [f64; 3],
    sa_qpu: (SaEntry, QpuEntry),
}

#[derive(Debug, Deserialize)]
struct SaEntry {
    #[serde(rename = "num_reads_SA")]
    num_reads: usize,
    #[serde(rename = "chain_strength_SA")]
    chain_strength: f64,
}

#[derive(Debug, Deserialize)]
struct QpuEntry {
    #[serde(rename = "num_reads_QPU")]
    num_reads: usize,
    #[serde(rename = "chain_strength_QPU")]
    chain_strength: f64,
}

impl From<ExperimentEntry> for Experiment {
    fn from(entry: ExperimentEntry) -> Self {
        let [a, b, c] = entry.norm_factors;
        let (sa, qpu) = entry.sa_qpu;
        Self::builder(entry.name, entry.num_nodes)
            .label(entry.label)
            .norm_factors(NormFactors { a, b, c })
            .sa_trial(TrialSpec::simulated(sa.num_reads, sa.chain_strength))
            .qpu_trial(TrialSpec::hardware(qpu.num_reads, qpu.chain_strength))
            .build()
    }
}

/// Experiments indexed by unique name.
#[derive(Debug, Default)]
pub struct ExperimentCatalog {
    experiments: HashMap<String, Experiment>,
}

impl ExperimentCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an experiments document:
    ///
    /// ```json
    /// {"experiments": [{"name": "tsp-8", "label": "TSP 8", "num_nodes": 8,
    ///   "norm_factors": [1.0, 1.0, 1.0],
    ///   "sa_qpu": [{"num_reads_SA": 1000, "chain_strength_SA": 2.0},
    ///              {"num_reads_QPU": 1000, "chain_strength_QPU": 2.0}]}]}
    /// ```
    ///
    /// Unknown top-level keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed documents and
    /// [`Error::Configuration`] for duplicate names or a zero `num_nodes`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entry in document.experiments {
            catalog.insert(entry.into())?;
        }
        debug!(experiments = catalog.len(), "parsed experiment catalog");
        Ok(catalog)
    }

    /// Add an experiment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the name is already present or
    /// `num_nodes` is zero.
    pub fn insert(&mut self, experiment: Experiment) -> Result<()> {
        if experiment.num_nodes() == 0 {
            return Err(Error::Configuration(format!(
                "experiment '{}' must have a positive num_nodes",
                experiment.name()
            )));
        }
        if self.experiments.contains_key(experiment.name()) {
            return Err(Error::Configuration(format!(
                "duplicate experiment name '{}'",
                experiment.name()
            )));
        }
        self.experiments
            .insert(experiment.name().to_string(), experiment);
        Ok(())
    }

    /// Look up an experiment by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an unknown name.
    pub fn get(&self, name: &str) -> Result<&Experiment> {
        self.experiments
            .get(name)
            .ok_or_else(|| Error::Configuration(format!("unknown experiment '{name}'")))
    }

    /// Number of experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Experiment names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.experiments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
