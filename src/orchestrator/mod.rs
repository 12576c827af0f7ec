//! Experiment orchestrator
//!
//! One entry point, [`Orchestrator::run`], takes a backend identifier, a
//! mode code (0-8) and an experiment name. The mode selects a fixed
//! composition of steps:
//!
//! | Code | Simulated | Hardware step                         |
//! |------|-----------|---------------------------------------|
//! | 0    | yes       | none                                  |
//! | 1    |           | QPU, live tuning                      |
//! | 2    |           | hybrid                                |
//! | 3    | yes       | QPU, live tuning                      |
//! | 4    | yes       | hybrid                                |
//! | 5    |           | QPU, best stored parameters           |
//! | 6    |           | hybrid, best stored chain strength    |
//! | 7    | yes       | QPU, best stored parameters           |
//! | 8    | yes       | hybrid, best stored chain strength    |
//!
//! Modes running two backends also return an [`EnergyComparison`].
//! Unknown modes and experiment names fail before any solver call.

mod mode;
mod report;

pub use mode::{ExecutionMode, HardwareStep, TuningSelector};
pub use report::{EnergyComparison, EnergySummary, HISTOGRAM_BINS};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::experiment::{Experiment, ExperimentCatalog, RunRecord};
use crate::results::{
    write_trial_log, BestParameters, ParameterType, ResultsPaths, ResultsReader, ResultsStore,
    ResultsWriter,
};
use crate::schedule::{Schedule, ScheduleBuilder};
use crate::solver::{BackendKind, QpuTiming, SolveRequest, Solver, TrialResult};
use crate::tuning::{ChainTuner, SweepRunner, TuningConfig};
use crate::Result;

/// Builds the solver-ready problem of an experiment.
pub trait ProblemBuilder<P> {
    /// Build the problem for `experiment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem data cannot be prepared.
    fn build(&self, experiment: &Experiment) -> Result<P>;
}

impl<P, F> ProblemBuilder<P> for F
where
    F: Fn(&Experiment) -> Result<P>,
{
    fn build(&self, experiment: &Experiment) -> Result<P> {
        self(experiment)
    }
}

/// The three solving backends of one run.
pub struct Backends<P> {
    /// Simulated annealing
    pub simulated: Box<dyn Solver<P>>,
    /// Quantum processing unit
    pub qpu: Box<dyn Solver<P>>,
    /// Hybrid classical/QPU
    pub hybrid: Box<dyn Solver<P>>,
}

/// Opens backends for a backend identifier (an account profile, say).
pub trait BackendConnector<P> {
    /// Connect to the backends named by `backend_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SolverInvocation`](crate::Error::SolverInvocation)
    /// if a backend cannot be reached.
    fn connect(&self, backend_id: &str) -> Result<Backends<P>>;
}

impl<P, F> BackendConnector<P> for F
where
    F: Fn(&str) -> Result<Backends<P>>,
{
    fn connect(&self, backend_id: &str) -> Result<Backends<P>> {
        self(backend_id)
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Sweep and chain grids
    pub tuning: TuningConfig,
    /// Which QPU parameters live tuning covers
    pub selector: TuningSelector,
    /// Rebuild the results table after live tuning
    pub write_results: bool,
    /// Root of trial logs and results tables
    pub paths: ResultsPaths,
}

impl OrchestratorConfig {
    /// Set tuning.
    #[must_use]
    pub fn with_tuning(mut self, tuning: TuningConfig) -> Self {
        self.tuning = tuning;
        self
    }

    /// Set selector.
    #[must_use]
    pub const fn with_selector(mut self, selector: TuningSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Set write results.
    #[must_use]
    pub const fn with_write_results(mut self, write_results: bool) -> Self {
        self.write_results = write_results;
        self
    }

    /// Set paths.
    #[must_use]
    pub fn with_paths(mut self, paths: ResultsPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// tuning configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        self.tuning.validate()
    }
}

/// Hardware solve of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareRun {
    /// Backend that solved
    pub backend: BackendKind,
    /// Chain strength used
    pub chain_strength: f64,
    /// Custom schedule used, if any
    pub schedule: Option<Schedule>,
    /// Solver outcome
    pub result: TrialResult,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    record: RunRecord,
    simulated: Option<TrialResult>,
    hardware: Option<HardwareRun>,
    comparison: Option<EnergyComparison>,
}

impl ExperimentOutcome {
    /// Lifecycle record of the run.
    #[must_use]
    pub const fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Simulated annealing result, for modes that run it.
    #[must_use]
    pub const fn simulated(&self) -> Option<&TrialResult> {
        self.simulated.as_ref()
    }

    /// Hardware result, for modes that run a hardware step.
    #[must_use]
    pub const fn hardware(&self) -> Option<&HardwareRun> {
        self.hardware.as_ref()
    }

    /// Energy comparison, for modes that run two backends.
    #[must_use]
    pub const fn comparison(&self) -> Option<&EnergyComparison> {
        self.comparison.as_ref()
    }
}

/// Hardware step of a run with its parameters resolved.
enum HardwarePlan {
    TunedQpu,
    StoredQpu(BestParameters),
    Hybrid { chain_strength: f64 },
}

/// Runs experiments against pluggable problem builders and backends.
pub struct Orchestrator<B, C> {
    catalog: ExperimentCatalog,
    problems: B,
    connector: C,
    config: OrchestratorConfig,
    writer: ResultsWriter,
    reader: ResultsReader,
}

impl<B, C> Orchestrator<B, C> {
    /// Create an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if
    /// `config` is invalid.
    pub fn new(
        catalog: ExperimentCatalog,
        problems: B,
        connector: C,
        config: OrchestratorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let store = ResultsStore::new(config.paths.clone());
        Ok(Self {
            catalog,
            problems,
            connector,
            config,
            writer: ResultsWriter::new(store.clone()),
            reader: ResultsReader::new(store),
        })
    }

    /// Experiments available to [`run`](Self::run).
    #[must_use]
    pub const fn catalog(&self) -> &ExperimentCatalog {
        &self.catalog
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run experiment `experiment_name` in mode `mode` on `backend_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) for an
    /// unknown mode or experiment (before any solver call), and otherwise
    /// the first error of the run, unmodified.
    pub fn run<P>(&self, backend_id: &str, mode: i64, experiment_name: &str) -> Result<ExperimentOutcome>
    where
        B: ProblemBuilder<P>,
        C: BackendConnector<P>,
    {
        let mode = ExecutionMode::try_from(mode)?;
        self.run_mode(backend_id, mode, experiment_name)
    }

    /// Run with an already decoded mode.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_mode<P>(
        &self,
        backend_id: &str,
        mode: ExecutionMode,
        experiment_name: &str,
    ) -> Result<ExperimentOutcome>
    where
        B: ProblemBuilder<P>,
        C: BackendConnector<P>,
    {
        let experiment = self.catalog.get(experiment_name)?;

        let mut record = RunRecord::new(experiment.name(), backend_id, mode);
        record.start();
        info!(
            run_id = record.run_id(),
            experiment = experiment.name(),
            num_nodes = experiment.num_nodes(),
            backend = backend_id,
            mode = %mode,
            "starting run"
        );

        match self.execute(backend_id, mode, experiment) {
            Ok((simulated, hardware)) => {
                record.succeed();
                let comparison = match (&simulated, &hardware) {
                    (Some(sa), Some(hw)) => Some(EnergyComparison::new(
                        (BackendKind::Simulated.as_str(), sa.energies()),
                        (hw.backend.as_str(), hw.result.energies()),
                    )),
                    _ => None,
                };
                info!(run_id = record.run_id(), "run finished");
                Ok(ExperimentOutcome {
                    record,
                    simulated,
                    hardware,
                    comparison,
                })
            }
            Err(e) => {
                record.fail(e.to_string());
                error!(run_id = record.run_id(), error = %e, "run failed");
                Err(e)
            }
        }
    }

    fn execute<P>(
        &self,
        backend_id: &str,
        mode: ExecutionMode,
        experiment: &Experiment,
    ) -> Result<(Option<TrialResult>, Option<HardwareRun>)>
    where
        B: ProblemBuilder<P>,
        C: BackendConnector<P>,
    {
        // stored parameters are resolved before any solver call
        let plan = match mode.hardware_step() {
            None => None,
            Some(HardwareStep::TunedQpu) => Some(HardwarePlan::TunedQpu),
            Some(HardwareStep::Hybrid) => Some(HardwarePlan::Hybrid {
                chain_strength: experiment.qpu_trial().chain_strength,
            }),
            Some(HardwareStep::BestQpu) => Some(HardwarePlan::StoredQpu(
                self.reader.get_best_parameters(experiment.num_nodes())?,
            )),
            Some(HardwareStep::BestHybrid) => Some(HardwarePlan::Hybrid {
                chain_strength: self
                    .reader
                    .get_best_parameters(experiment.num_nodes())?
                    .chain_strength,
            }),
        };

        let problem = self.problems.build(experiment)?;
        let mut backends = self.connector.connect(backend_id)?;

        let simulated = if mode.runs_simulated() {
            Some(self.simulated(backends.simulated.as_mut(), &problem, experiment)?)
        } else {
            None
        };

        let hardware = match plan {
            None => None,
            Some(HardwarePlan::TunedQpu) => {
                Some(self.tuned_qpu(backends.qpu.as_mut(), &problem, experiment)?)
            }
            Some(HardwarePlan::StoredQpu(best)) => {
                Some(self.best_qpu(backends.qpu.as_mut(), &problem, experiment, best)?)
            }
            Some(HardwarePlan::Hybrid { chain_strength }) => Some(self.hybrid(
                backends.hybrid.as_mut(),
                &problem,
                experiment,
                chain_strength,
            )?),
        };

        Ok((simulated, hardware))
    }

    fn simulated<P>(
        &self,
        solver: &mut dyn Solver<P>,
        problem: &P,
        experiment: &Experiment,
    ) -> Result<TrialResult> {
        let spec = experiment.sa_trial();
        let request = SolveRequest::new(spec.num_reads, experiment.label())
            .chain_strength(spec.chain_strength);
        let result = solver.solve(problem, &request)?;
        info!(
            backend = solver.name(),
            energy = result.energy(),
            correct = result.correct_solution_count(),
            "simulated annealing finished"
        );
        Ok(result)
    }

    fn tuned_qpu<P>(
        &self,
        qpu: &mut dyn Solver<P>,
        problem: &P,
        experiment: &Experiment,
    ) -> Result<HardwareRun> {
        let tuning = &self.config.tuning;
        let selector = self.config.selector;
        let num_nodes = experiment.num_nodes();
        let paths = &self.config.paths;

        let chain_strength = if selector.tunes_chain() {
            let outcome = ChainTuner::new(tuning.chain_grid.clone(), tuning.read_count).tune(
                &mut *qpu,
                problem,
                experiment.qpu_trial().chain_strength,
            )?;
            write_trial_log(
                &paths.trial_log(num_nodes, ParameterType::Chain),
                ParameterType::Chain,
                &outcome,
            )?;
            *outcome.best_parameter()
        } else {
            experiment.qpu_trial().chain_strength
        };

        let schedule = if selector.tunes_schedule() {
            let builder = ScheduleBuilder::new(qpu.schedule_limits()).with_delta_s(tuning.delta_s);
            let grid = tuning.grid(tuning.anneal_mode);
            let outcome = SweepRunner::new(builder, tuning.read_count).tune(&mut *qpu, problem, &grid)?;
            let family = ParameterType::from(tuning.anneal_mode);
            write_trial_log(&paths.trial_log(num_nodes, family), family, &outcome)?;
            Some(outcome.best_parameter().clone())
        } else {
            None
        };

        if self.config.write_results && (selector.tunes_chain() || selector.tunes_schedule()) {
            self.writer.write_results(num_nodes)?;
        }

        solve_hardware(
            qpu,
            problem,
            SolveRequest::new(experiment.qpu_trial().num_reads, experiment.label()),
            chain_strength,
            schedule,
        )
    }

    fn best_qpu<P>(
        &self,
        qpu: &mut dyn Solver<P>,
        problem: &P,
        experiment: &Experiment,
        best: BestParameters,
    ) -> Result<HardwareRun> {
        debug!(
            chain_strength = best.chain_strength,
            schedule = %best.schedule.to_flat_text(),
            "using stored parameters"
        );
        solve_hardware(
            qpu,
            problem,
            SolveRequest::new(experiment.qpu_trial().num_reads, experiment.label()),
            best.chain_strength,
            Some(best.schedule),
        )
    }

    fn hybrid<P>(
        &self,
        hybrid: &mut dyn Solver<P>,
        problem: &P,
        experiment: &Experiment,
        chain_strength: f64,
    ) -> Result<HardwareRun> {
        let label = format!("{}-Hybrid", experiment.label());
        solve_hardware(
            hybrid,
            problem,
            SolveRequest::new(experiment.qpu_trial().num_reads, label),
            chain_strength,
            None,
        )
    }
}

fn solve_hardware<P>(
    solver: &mut dyn Solver<P>,
    problem: &P,
    request: SolveRequest,
    chain_strength: f64,
    schedule: Option<Schedule>,
) -> Result<HardwareRun> {
    let mut request = request.chain_strength(chain_strength);
    if let Some(schedule) = &schedule {
        request = request.schedule(schedule.clone());
    }

    let result = solver.solve(problem, &request)?;
    let backend = solver.kind();
    info!(
        backend = solver.name(),
        label = %request.label,
        energy = result.energy(),
        correct = result.correct_solution_count(),
        "hardware solve finished"
    );
    if backend == BackendKind::Qpu {
        log_timing(result.timing());
    }

    Ok(HardwareRun {
        backend,
        chain_strength,
        schedule,
        result,
    })
}

fn log_timing(timing: &QpuTiming) {
    info!(
        anneal_time_per_sample = ?timing.anneal_time_per_sample,
        programming_time = ?timing.programming_time,
        sampling_time = ?timing.sampling_time,
        access_time = ?timing.access_time,
        "QPU timing (µs)"
    );
}
