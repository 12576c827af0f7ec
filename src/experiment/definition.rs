//! Experiment definition - one named problem instance

use serde::{Deserialize, Serialize};

/// Energy-function weights. Consumed by the problem builder only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormFactors {
    /// Weight of the distance term
    #[serde(rename = "A_Normalization")]
    pub a: f64,
    /// Weight of the tour-constraint term
    #[serde(rename = "B_Normalization")]
    pub b: f64,
    /// Weight of the charge term
    #[serde(rename = "C_Normalization")]
    pub c: f64,
}

impl Default for NormFactors {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            c: 1.0,
        }
    }
}

/// Per-backend trial parameters of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    /// Whether the trial runs on hardware
    pub hardware: bool,
    /// Requested sample count
    pub num_reads: usize,
    /// Initial chain strength
    pub chain_strength: f64,
}

impl TrialSpec {
    /// Software (simulated annealing) trial parameters.
    #[must_use]
    pub const fn simulated(num_reads: usize, chain_strength: f64) -> Self {
        Self {
            hardware: false,
            num_reads,
            chain_strength,
        }
    }

    /// Hardware (QPU) trial parameters.
    #[must_use]
    pub const fn hardware(num_reads: usize, chain_strength: f64) -> Self {
        Self {
            hardware: true,
            num_reads,
            chain_strength,
        }
    }
}

/// A named problem instance. Immutable once built.
///
/// `num_nodes` partitions every persisted tuning artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    name: String,
    label: String,
    num_nodes: u32,
    norm_factors: NormFactors,
    sa_trial: TrialSpec,
    qpu_trial: TrialSpec,
}

impl Experiment {
    /// Create a builder with the required fields.
    #[must_use]
    pub fn builder(name: impl Into<String>, num_nodes: u32) -> ExperimentBuilder {
        ExperimentBuilder::new(name, num_nodes)
    }

    /// Unique experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label, also used as solver job label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Problem size.
    #[must_use]
    pub const fn num_nodes(&self) -> u32 {
        self.num_nodes
    }

    /// Energy-function weights.
    #[must_use]
    pub const fn norm_factors(&self) -> &NormFactors {
        &self.norm_factors
    }

    /// Simulated annealing trial parameters.
    #[must_use]
    pub const fn sa_trial(&self) -> &TrialSpec {
        &self.sa_trial
    }

    /// QPU trial parameters.
    #[must_use]
    pub const fn qpu_trial(&self) -> &TrialSpec {
        &self.qpu_trial
    }
}

/// Builder for `Experiment`.
#[derive(Debug)]
pub struct ExperimentBuilder {
    name: String,
    label: Option<String>,
    num_nodes: u32,
    norm_factors: NormFactors,
    sa_trial: TrialSpec,
    qpu_trial: TrialSpec,
}

impl ExperimentBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, num_nodes: u32) -> Self {
        Self {
            name: name.into(),
            label: None,
            num_nodes,
            norm_factors: NormFactors::default(),
            sa_trial: TrialSpec::simulated(1000, 1.0),
            qpu_trial: TrialSpec::hardware(1000, 1.0),
        }
    }

    /// Set the display label (defaults to the name).
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the energy-function weights.
    #[must_use]
    pub const fn norm_factors(mut self, norm_factors: NormFactors) -> Self {
        self.norm_factors = norm_factors;
        self
    }

    /// Set the simulated annealing trial parameters.
    #[must_use]
    pub const fn sa_trial(mut self, spec: TrialSpec) -> Self {
        self.sa_trial = spec;
        self
    }

    /// Set the QPU trial parameters.
    #[must_use]
    pub const fn qpu_trial(mut self, spec: TrialSpec) -> Self {
        self.qpu_trial = spec;
        self
    }

    /// Build the `Experiment`.
    #[must_use]
    pub fn build(self) -> Experiment {
        let label = self.label.unwrap_or_else(|| self.name.clone());
        Experiment {
            name: self.name,
            label,
            num_nodes: self.num_nodes,
            norm_factors: self.norm_factors,
            sa_trial: self.sa_trial,
            qpu_trial: self.qpu_trial,
        }
    }
}
