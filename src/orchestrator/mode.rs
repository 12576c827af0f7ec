use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fixed experiment protocols, numbered 0 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// 0: simulated annealing only
    Simulated,
    /// 1: QPU with live tuning
    Qpu,
    /// 2: hybrid only
    Hybrid,
    /// 3: simulated annealing, then QPU with live tuning
    SimulatedQpu,
    /// 4: simulated annealing, then hybrid
    SimulatedHybrid,
    /// 5: QPU with the best stored parameters
    BestQpu,
    /// 6: hybrid with the best stored chain strength
    BestHybrid,
    /// 7: simulated annealing, then best-parameter QPU
    SimulatedBestQpu,
    /// 8: simulated annealing, then best-parameter hybrid
    SimulatedBestHybrid,
}

impl ExecutionMode {
    /// All modes, in code order.
    pub const ALL: [Self; 9] = [
        Self::Simulated,
        Self::Qpu,
        Self::Hybrid,
        Self::SimulatedQpu,
        Self::SimulatedHybrid,
        Self::BestQpu,
        Self::BestHybrid,
        Self::SimulatedBestQpu,
        Self::SimulatedBestHybrid,
    ];

    /// Numeric code of the mode.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Simulated => 0,
            Self::Qpu => 1,
            Self::Hybrid => 2,
            Self::SimulatedQpu => 3,
            Self::SimulatedHybrid => 4,
            Self::BestQpu => 5,
            Self::BestHybrid => 6,
            Self::SimulatedBestQpu => 7,
            Self::SimulatedBestHybrid => 8,
        }
    }

    /// Whether simulated annealing runs first.
    #[must_use]
    pub const fn runs_simulated(self) -> bool {
        matches!(
            self,
            Self::Simulated
                | Self::SimulatedQpu
                | Self::SimulatedHybrid
                | Self::SimulatedBestQpu
                | Self::SimulatedBestHybrid
        )
    }

    /// The hardware step, if any.
    #[must_use]
    pub const fn hardware_step(self) -> Option<HardwareStep> {
        match self {
            Self::Simulated => None,
            Self::Qpu | Self::SimulatedQpu => Some(HardwareStep::TunedQpu),
            Self::Hybrid | Self::SimulatedHybrid => Some(HardwareStep::Hybrid),
            Self::BestQpu | Self::SimulatedBestQpu => Some(HardwareStep::BestQpu),
            Self::BestHybrid | Self::SimulatedBestHybrid => Some(HardwareStep::BestHybrid),
        }
    }
}

impl TryFrom<i64> for ExecutionMode {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| i64::from(mode.code()) == code)
            .ok_or_else(|| {
                Error::Configuration(format!("unknown execution mode {code}, expected 0-8"))
            })
    }
}

impl TryFrom<u8> for ExecutionMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::try_from(i64::from(code))
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Simulated => "Simulated Annealing",
            Self::Qpu => "QPU",
            Self::Hybrid => "Hybrid",
            Self::SimulatedQpu => "Simulated-QPU",
            Self::SimulatedHybrid => "Simulated-Hybrid",
            Self::BestQpu => "Best QPU",
            Self::BestHybrid => "Best Hybrid",
            Self::SimulatedBestQpu => "Simulated-Best QPU",
            Self::SimulatedBestHybrid => "Simulated-Best Hybrid",
        };
        f.write_str(name)
    }
}

/// Hardware part of an execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareStep {
    /// Tune chain and/or schedule on the QPU, then solve
    TunedQpu,
    /// Hybrid solve with the experiment's chain strength
    Hybrid,
    /// QPU solve with resolved best parameters
    BestQpu,
    /// Hybrid solve with the resolved best chain strength
    BestHybrid,
}

/// Which QPU parameters are tuned live before a QPU solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningSelector {
    /// 0: chain strength and schedule
    #[default]
    Both,
    /// 1: chain strength only
    ChainOnly,
    /// 2: schedule only
    ScheduleOnly,
    /// 3: neither
    None,
}

impl TuningSelector {
    /// Whether the chain strength is tuned.
    #[must_use]
    pub const fn tunes_chain(self) -> bool {
        matches!(self, Self::Both | Self::ChainOnly)
    }

    /// Whether the schedule is tuned.
    #[must_use]
    pub const fn tunes_schedule(self) -> bool {
        matches!(self, Self::Both | Self::ScheduleOnly)
    }
}

impl TryFrom<i64> for TuningSelector {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Both),
            1 => Ok(Self::ChainOnly),
            2 => Ok(Self::ScheduleOnly),
            3 => Ok(Self::None),
            other => Err(Error::Configuration(format!(
                "unknown tuning selector {other}, expected 0-3"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_codes() {
        for (i, mode) in ExecutionMode::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(mode.code()), i);
            assert_eq!(ExecutionMode::try_from(mode.code()).unwrap(), mode);
        }
    }

    #[test]
    fn test_invalid_mode() {
        assert!(matches!(
            ExecutionMode::try_from(9_i64),
            Err(Error::Configuration(_))
        ));
        assert!(ExecutionMode::try_from(-1_i64).is_err());
    }

    #[test]
    fn test_mode_composition() {
        assert!(ExecutionMode::SimulatedBestHybrid.runs_simulated());
        assert_eq!(
            ExecutionMode::SimulatedBestHybrid.hardware_step(),
            Some(HardwareStep::BestHybrid)
        );
        assert!(!ExecutionMode::Qpu.runs_simulated());
        assert_eq!(ExecutionMode::Simulated.hardware_step(), None);
    }

    #[test]
    fn test_tuning_selector() {
        assert_eq!(TuningSelector::try_from(2_i64).unwrap(), TuningSelector::ScheduleOnly);
        assert!(TuningSelector::try_from(4_i64).is_err());
        assert!(TuningSelector::ChainOnly.tunes_chain());
        assert!(!TuningSelector::ChainOnly.tunes_schedule());
        assert!(!TuningSelector::None.tunes_chain());
    }
}
