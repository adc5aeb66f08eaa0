//! Well solution data types.

use rf_core::{Ijk, VolumeRate, m3ps};
use serde::{Deserialize, Serialize};

use crate::layout::TYPE_ABSENT;

/// One well-to-cell connection with its reservoir volume rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// 0 for the main grid, N for the N-th local grid.
    pub grid_index: usize,
    /// Cartesian cell location, 0-based.
    pub ijk: Ijk,
    /// Reservoir volume rate in m³/s; positive for production, negative for injection.
    pub reservoir_inflow_rate: f64,
}

impl Completion {
    pub fn reservoir_inflow(&self) -> VolumeRate {
        m3ps(self.reservoir_inflow_rate)
    }
}

/// Merged solution data of one well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellData {
    pub name: String,
    pub is_injector_well: bool,
    pub completions: Vec<Completion>,
}

impl WellData {
    /// Sum of the retained completion rates, m³/s.
    pub fn total_reservoir_inflow_rate(&self) -> f64 {
        self.completions
            .iter()
            .map(|c| c.reservoir_inflow_rate)
            .sum()
    }
}

/// Injected phase of an injection well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjectorPhase {
    Oil,
    Water,
    Gas,
    /// Any other non-producer type code, kept as stored.
    Other(i32),
}

/// Producer/injector classification of a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WellKind {
    Producer,
    Injector(InjectorPhase),
}

impl WellKind {
    /// Decode a stored well type code; `None` for a well absent from the grid.
    ///
    /// Every present well that is not a producer is an injector.
    pub fn from_type_code(code: i32) -> Option<Self> {
        match code {
            TYPE_ABSENT => None,
            1 => Some(Self::Producer),
            2 => Some(Self::Injector(InjectorPhase::Oil)),
            3 => Some(Self::Injector(InjectorPhase::Water)),
            4 => Some(Self::Injector(InjectorPhase::Gas)),
            other => Some(Self::Injector(InjectorPhase::Other(other))),
        }
    }

    pub fn type_code(self) -> i32 {
        match self {
            Self::Producer => 1,
            Self::Injector(InjectorPhase::Oil) => 2,
            Self::Injector(InjectorPhase::Water) => 3,
            Self::Injector(InjectorPhase::Gas) => 4,
            Self::Injector(InjectorPhase::Other(code)) => code,
        }
    }

    pub fn is_injector(self) -> bool {
        matches!(self, Self::Injector(_))
    }
}

/// A well as decoded from a single grid, before filtering and merging.
#[derive(Debug, Clone, PartialEq)]
pub struct GridWell {
    pub name: String,
    pub kind: WellKind,
    pub completions: Vec<Completion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_round_trip() {
        for code in 1..=4 {
            let kind = WellKind::from_type_code(code).unwrap();
            assert_eq!(kind.type_code(), code);
        }
        assert_eq!(WellKind::from_type_code(0), None);
        assert_eq!(
            WellKind::from_type_code(7),
            Some(WellKind::Injector(InjectorPhase::Other(7)))
        );
        assert_eq!(WellKind::from_type_code(-2).map(WellKind::type_code), Some(-2));
        assert!(!WellKind::Producer.is_injector());
        assert!(WellKind::Injector(InjectorPhase::Gas).is_injector());
    }

    #[test]
    fn total_rate_sums_completions() {
        let well = WellData {
            name: "P1".into(),
            is_injector_well: false,
            completions: vec![
                Completion {
                    grid_index: 0,
                    ijk: Ijk::new(0, 0, 0),
                    reservoir_inflow_rate: 2.0,
                },
                Completion {
                    grid_index: 1,
                    ijk: Ijk::new(1, 0, 0),
                    reservoir_inflow_rate: 0.5,
                },
            ],
        };
        assert_eq!(well.total_reservoir_inflow_rate(), 2.5);
        assert_eq!(rf_core::as_m3ps(well.completions[1].reservoir_inflow()), 0.5);
    }
}
