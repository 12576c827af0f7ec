//! Tuning configuration: sweep grids, chain grid and sample counts.

use serde::{Deserialize, Serialize};

use crate::schedule::{AnnealMode, Knob, DEFAULT_DELTA_S};
use crate::{Error, Result};

/// Linearly spaced start fractions `s_low..=s_high` with `num_points`
/// samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartRange {
    /// First start fraction
    pub s_low: f64,
    /// Last start fraction
    pub s_high: f64,
    /// Number of samples (1 yields `s_low` only)
    pub num_points: usize,
}

impl Default for StartRange {
    fn default() -> Self {
        Self {
            s_low: 0.3,
            s_high: 0.5,
            num_points: 3,
        }
    }
}

impl StartRange {
    /// Create a start range.
    #[must_use]
    pub const fn new(s_low: f64, s_high: f64, num_points: usize) -> Self {
        Self {
            s_low,
            s_high,
            num_points,
        }
    }

    /// The sampled start fractions, endpoints included.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> Vec<f64> {
        match self.num_points {
            0 => Vec::new(),
            1 => vec![self.s_low],
            n => {
                let step = (self.s_high - self.s_low) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.s_high
                        } else {
                            (i as f64).mul_add(step, self.s_low)
                        }
                    })
                    .collect()
            }
        }
    }

    /// Validates the range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty or inverted range, or
    /// bounds outside `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.num_points == 0 {
            return Err(Error::Configuration(
                "start range must have at least one point".into(),
            ));
        }
        if !(self.s_low > 0.0 && self.s_high < 1.0) {
            return Err(Error::Configuration(format!(
                "start range [{}, {}] must lie inside (0, 1)",
                self.s_low, self.s_high
            )));
        }
        if self.s_low > self.s_high {
            return Err(Error::Configuration(format!(
                "start range is inverted: s_low {} > s_high {}",
                self.s_low, self.s_high
            )));
        }
        Ok(())
    }
}

/// Chain-strength candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainGrid {
    /// Fixed chain strengths
    Explicit(Vec<f64>),
    /// Multiples of the experiment's initial chain strength
    Scaled {
        /// Factors applied to the initial chain strength
        factors: Vec<f64>,
    },
}

impl Default for ChainGrid {
    fn default() -> Self {
        Self::Scaled {
            factors: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
        }
    }
}

impl ChainGrid {
    /// Chain strengths to try for the given initial value.
    #[must_use]
    pub fn values(&self, initial_chain: f64) -> Vec<f64> {
        match self {
            Self::Explicit(values) => values.clone(),
            Self::Scaled { factors } => factors.iter().map(|f| f * initial_chain).collect(),
        }
    }
}

/// Sweep and chain tuning parameters.
///
/// Defaults reproduce the production sweep: 3 anneal times × 3 secondary
/// knobs × 3 start fractions per anneal mode, 2000 reads per trial.
///
/// # Examples
///
/// ```
/// use anneal_tuner::schedule::AnnealMode;
/// use anneal_tuner::tuning::TuningConfig;
///
/// let config = TuningConfig::default()
///     .with_anneal_times(vec![20.0, 40.0])
///     .with_read_count(500);
///
/// let grid = config.grid(AnnealMode::Pause);
/// assert_eq!(grid.len(), 2 * 3 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Total anneal times (µs), outer loop of every sweep
    pub anneal_times: Vec<f64>,
    /// Pause durations (µs) for pause sweeps
    pub pause_durations: Vec<f64>,
    /// Quench slopes for quench sweeps
    pub quench_slopes: Vec<f64>,
    /// Quench slopes paired element-wise with `pause_durations` for
    /// pause-and-quench sweeps
    pub pause_quench_slopes: Vec<f64>,
    /// Start fractions of the schedule modification
    pub start: StartRange,
    /// `s` jump after the pause in pause-and-quench schedules
    pub delta_s: f64,
    /// Samples per trial
    pub read_count: usize,
    /// Mode used when the orchestrator tunes the schedule
    pub anneal_mode: AnnealMode,
    /// Chain-strength candidates
    pub chain_grid: ChainGrid,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            anneal_times: vec![10.0, 50.0, 150.0],
            pause_durations: vec![10.0, 80.0, 100.0],
            quench_slopes: vec![1.0, 0.5, 0.25],
            pause_quench_slopes: vec![1.0, 0.8, 0.5],
            start: StartRange::default(),
            delta_s: DEFAULT_DELTA_S,
            read_count: 2000,
            anneal_mode: AnnealMode::PauseAndQuench,
            chain_grid: ChainGrid::default(),
        }
    }
}

impl TuningConfig {
    /// Small grid for smoke runs: one knob per mode and a single start
    /// fraction.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            anneal_times: vec![50.0, 10.0],
            pause_durations: vec![25.0],
            quench_slopes: vec![0.25],
            pause_quench_slopes: vec![1.0],
            start: StartRange::new(0.5, 0.5, 1),
            ..Self::default()
        }
    }

    /// Set anneal times.
    #[must_use]
    pub fn with_anneal_times(mut self, anneal_times: Vec<f64>) -> Self {
        self.anneal_times = anneal_times;
        self
    }

    /// Set pause durations.
    #[must_use]
    pub fn with_pause_durations(mut self, pause_durations: Vec<f64>) -> Self {
        self.pause_durations = pause_durations;
        self
    }

    /// Set quench slopes.
    #[must_use]
    pub fn with_quench_slopes(mut self, quench_slopes: Vec<f64>) -> Self {
        self.quench_slopes = quench_slopes;
        self
    }

    /// Set pause quench slopes.
    #[must_use]
    pub fn with_pause_quench_slopes(mut self, slopes: Vec<f64>) -> Self {
        self.pause_quench_slopes = slopes;
        self
    }

    /// Set start.
    #[must_use]
    pub const fn with_start(mut self, start: StartRange) -> Self {
        self.start = start;
        self
    }

    /// Set read count.
    #[must_use]
    pub const fn with_read_count(mut self, read_count: usize) -> Self {
        self.read_count = read_count;
        self
    }

    /// Set anneal mode.
    #[must_use]
    pub const fn with_anneal_mode(mut self, mode: AnnealMode) -> Self {
        self.anneal_mode = mode;
        self
    }

    /// Set chain grid.
    #[must_use]
    pub fn with_chain_grid(mut self, chain_grid: ChainGrid) -> Self {
        self.chain_grid = chain_grid;
        self
    }

    /// Secondary knobs swept for `mode`.
    #[must_use]
    pub fn knobs(&self, mode: AnnealMode) -> Vec<Knob> {
        match mode {
            AnnealMode::Pause => self
                .pause_durations
                .iter()
                .map(|&duration| Knob::Pause { duration })
                .collect(),
            AnnealMode::Quench => self
                .quench_slopes
                .iter()
                .map(|&slope| Knob::Quench { slope })
                .collect(),
            AnnealMode::PauseAndQuench => self
                .pause_durations
                .iter()
                .zip(&self.pause_quench_slopes)
                .map(|(&pause, &slope)| Knob::PauseAndQuench { pause, slope })
                .collect(),
        }
    }

    /// Sweep grid for `mode`.
    #[must_use]
    pub fn grid(&self, mode: AnnealMode) -> super::SweepGrid {
        super::SweepGrid::new(self.anneal_times.clone(), self.knobs(mode), self.start)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.anneal_times.is_empty() {
            return Err(Error::Configuration("anneal_times must not be empty".into()));
        }
        if self.read_count == 0 {
            return Err(Error::Configuration("read_count must be positive".into()));
        }
        if !(self.delta_s > 0.0 && self.delta_s < 1.0) {
            return Err(Error::Configuration(format!(
                "delta_s must be in (0, 1), got {}",
                self.delta_s
            )));
        }
        if self.pause_durations.len() != self.pause_quench_slopes.len() {
            return Err(Error::Configuration(format!(
                "pause_durations ({}) and pause_quench_slopes ({}) must pair up",
                self.pause_durations.len(),
                self.pause_quench_slopes.len()
            )));
        }
        self.start.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TuningConfig::default();
        assert_eq!(config.read_count, 2000);
        assert_eq!(config.anneal_mode, AnnealMode::PauseAndQuench);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_start_range_values() {
        let values = StartRange::new(0.3, 0.5, 3).values();
        assert_eq!(values.len(), 3);
        assert!((values[0] - 0.3).abs() < 1e-12);
        assert!((values[1] - 0.4).abs() < 1e-12);
        assert!((values[2] - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_start_range_single_point() {
        assert_eq!(StartRange::new(0.5, 0.5, 1).values(), vec![0.5]);
    }

    #[test]
    fn test_start_range_validate() {
        assert!(StartRange::new(0.6, 0.4, 3).validate().is_err());
        assert!(StartRange::new(0.0, 0.4, 3).validate().is_err());
        assert!(StartRange::new(0.3, 0.4, 0).validate().is_err());
    }

    #[test]
    fn test_pause_and_quench_knobs_are_zipped() {
        let knobs = TuningConfig::default().knobs(AnnealMode::PauseAndQuench);
        assert_eq!(knobs.len(), 3);
        assert_eq!(
            knobs[1],
            Knob::PauseAndQuench {
                pause: 80.0,
                slope: 0.8
            }
        );
    }

    #[test]
    fn test_unpaired_pause_quench_rejected() {
        let config = TuningConfig::default().with_pause_quench_slopes(vec![1.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chain_grid_scaled() {
        let values = ChainGrid::Scaled {
            factors: vec![0.5, 2.0],
        }
        .values(3.0);
        assert_eq!(values, vec![1.5, 6.0]);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: TuningConfig =
            serde_json::from_str(r#"{"read_count": 100, "anneal_mode": "quench"}"#).unwrap();
        assert_eq!(config.read_count, 100);
        assert_eq!(config.anneal_mode, AnnealMode::Quench);
        assert_eq!(config.anneal_times, vec![10.0, 50.0, 150.0]);
    }
}
