use scenario_core::{MetricSnapshot, StateBand};

use crate::bands::{change_ratio, ArrGrowthBand, BurnPressure, MarginBand};
use crate::config::BandThresholds;
use crate::state::SystemState;

/// Movement of the current snapshot against its baseline.
///
/// Ratios are `None` whenever the baseline cannot serve as a denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDeltas {
    /// Months
    pub runway: f64,
    pub burn_ratio: Option<f64>,
    /// Percentage points
    pub arr_growth: Option<f64>,
    /// Percentage points
    pub margin: f64,
    /// Score points
    pub risk: f64,
    pub cash_ratio: Option<f64>,
}

impl MetricDeltas {
    pub fn between(current: &MetricSnapshot, baseline: &MetricSnapshot) -> Self {
        let arr_growth = if current.arr_growth_pct.is_finite() && baseline.arr_growth_pct.is_finite()
        {
            Some(current.arr_growth_pct - baseline.arr_growth_pct)
        } else {
            None
        };

        Self {
            runway: finite_or_zero(current.runway_months - baseline.runway_months),
            burn_ratio: change_ratio(current.burn_rate_monthly, baseline.burn_rate_monthly),
            arr_growth,
            margin: finite_or_zero(current.gross_margin_pct - baseline.gross_margin_pct),
            risk: finite_or_zero(current.risk_score - baseline.risk_score),
            cash_ratio: change_ratio(current.cash_position, baseline.cash_position),
        }
    }

    pub fn arr_growth_drop(&self) -> f64 {
        self.arr_growth.map(|d| -d).unwrap_or(0.0)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Every band the candidate rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSet {
    pub runway: StateBand,
    pub risk: StateBand,
    pub burn: BurnPressure,
    pub growth: ArrGrowthBand,
    pub margin: MarginBand,
}

impl BandSet {
    pub fn classify(
        thresholds: &BandThresholds,
        current: &MetricSnapshot,
        baseline: &MetricSnapshot,
    ) -> Self {
        Self {
            runway: thresholds.runway_band(current.runway_months),
            risk: thresholds.risk_band(current.risk_score),
            burn: thresholds
                .burn_pressure_band(current.burn_rate_monthly, baseline.burn_rate_monthly),
            growth: thresholds.arr_growth_band(current.arr_growth_pct),
            margin: thresholds.gross_margin_band(current.gross_margin_pct),
        }
    }
}

/// Input to every candidate rule.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    pub current: &'a MetricSnapshot,
    pub baseline: &'a MetricSnapshot,
    pub deltas: MetricDeltas,
    pub bands: BandSet,
    pub state: SystemState,
}

impl<'a> SignalContext<'a> {
    pub fn new(
        thresholds: &BandThresholds,
        current: &'a MetricSnapshot,
        baseline: &'a MetricSnapshot,
    ) -> Self {
        let bands = BandSet::classify(thresholds, current, baseline);
        let state = SystemState::compose(bands.runway, bands.burn, bands.margin, bands.risk);
        Self {
            current,
            baseline,
            deltas: MetricDeltas::between(current, baseline),
            bands,
            state,
        }
    }

    pub fn is_nominal(&self) -> bool {
        self.state.is_nominal(self.bands.growth)
    }
}
