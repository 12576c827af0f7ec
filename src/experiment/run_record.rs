//! Run Record - one orchestrated execution of an experiment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::orchestrator::ExecutionMode;

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is created but not yet started.
    Pending,
    /// Run is currently executing.
    Running,
    /// Run completed successfully.
    Success,
    /// Run stopped on an error.
    Failed,
}

/// Run Record tracks a single orchestrated execution of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    run_id: String,
    experiment_name: String,
    backend: String,
    mode: ExecutionMode,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    failure: Option<String>,
}

impl RunRecord {
    /// Create a new run record in Pending status.
    ///
    /// The run ID combines the experiment name, mode and creation time.
    #[must_use]
    pub fn new(
        experiment_name: impl Into<String>,
        backend: impl Into<String>,
        mode: ExecutionMode,
    ) -> Self {
        let experiment_name = experiment_name.into();
        let run_id = format!(
            "{experiment_name}-m{}-{}",
            mode.code(),
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        );
        Self {
            run_id,
            experiment_name,
            backend: backend.into(),
            mode,
            status: RunStatus::Pending,
            started_at: None,
            ended_at: None,
            failure: None,
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    /// Get the backend identifier the run was dispatched to.
    #[must_use]
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Get the execution mode.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start timestamp, if the run has started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if the run has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Get the failure message of a failed run.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Start the run, transitioning from Pending to Running.
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Complete the run successfully.
    pub fn succeed(&mut self) {
        self.status = RunStatus::Success;
        self.ended_at = Some(Utc::now());
    }

    /// Complete the run with a failure message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = RunStatus::Failed;
        self.failure = Some(message.into());
        self.ended_at = Some(Utc::now());
    }
}
