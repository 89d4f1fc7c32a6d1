//! State Aggregator
//!
//! Folds per-dimension bands into three composite states using worst-case
//! composition. Family-specific bands are translated through fixed tables.

use scenario_core::{worst_of, StateBand};
use serde::{Deserialize, Serialize};

use crate::bands::{ArrGrowthBand, BurnPressure, MarginBand};

/// Composite posture of the business, recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    pub financial: StateBand,
    pub operational: StateBand,
    pub execution: StateBand,
}

impl SystemState {
    pub fn compose(
        runway: StateBand,
        burn: BurnPressure,
        margin: MarginBand,
        risk: StateBand,
    ) -> Self {
        Self {
            financial: max_band([runway, burn_to_state(burn)]),
            operational: max_band([margin_to_state(margin), capped_burn_to_state(burn)]),
            execution: risk,
        }
    }

    pub fn is_all_stable(&self) -> bool {
        self.worst() == StateBand::Stable
    }

    pub fn worst(&self) -> StateBand {
        max_band([self.financial, self.operational, self.execution])
    }

    /// True when flags and questions should be suppressed entirely.
    ///
    /// Growth does not feed any composite state, so a lagging growth band
    /// keeps the system out of the nominal case on its own.
    pub fn is_nominal(&self, growth: ArrGrowthBand) -> bool {
        self.is_all_stable() && !growth.is_lagging()
    }
}

fn max_band<const N: usize>(bands: [StateBand; N]) -> StateBand {
    worst_of(bands).unwrap_or(StateBand::Stable)
}

pub fn burn_to_state(burn: BurnPressure) -> StateBand {
    match burn {
        BurnPressure::Down | BurnPressure::Flat => StateBand::Stable,
        BurnPressure::UpModerate => StateBand::Moderate,
        BurnPressure::UpElevated => StateBand::Elevated,
        BurnPressure::UpHigh => StateBand::High,
    }
}

/// Burn as seen by the operational state: never worse than ELEVATED.
pub fn capped_burn_to_state(burn: BurnPressure) -> StateBand {
    match burn {
        BurnPressure::Down | BurnPressure::Flat => StateBand::Stable,
        BurnPressure::UpModerate => StateBand::Moderate,
        BurnPressure::UpElevated | BurnPressure::UpHigh => StateBand::Elevated,
    }
}

pub fn margin_to_state(margin: MarginBand) -> StateBand {
    match margin {
        MarginBand::Strong | MarginBand::Stable => StateBand::Stable,
        MarginBand::Elevated | MarginBand::Unknown => StateBand::Moderate,
        MarginBand::Weak => StateBand::Elevated,
    }
}
