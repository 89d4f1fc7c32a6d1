//! Band Classifier
//!
//! Maps individual metrics onto ordinal bands. Every function is total: NaN,
//! infinities and zero denominators resolve to a fixed band instead of
//! propagating into later comparisons.

use scenario_core::StateBand;
use serde::{Deserialize, Serialize};

use crate::config::BandThresholds;

/// Direction and strength of burn movement against baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BurnPressure {
    Down,
    Flat,
    UpModerate,
    UpElevated,
    UpHigh,
}

impl BurnPressure {
    pub fn is_rising(&self) -> bool {
        matches!(
            self,
            BurnPressure::UpModerate | BurnPressure::UpElevated | BurnPressure::UpHigh
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArrGrowthBand {
    Unknown,
    Contracting,
    Weak,
    Healthy,
    Strong,
}

impl ArrGrowthBand {
    /// Growth below the healthy floor.
    pub fn is_lagging(&self) -> bool {
        matches!(self, ArrGrowthBand::Contracting | ArrGrowthBand::Weak)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginBand {
    Unknown,
    Weak,
    Elevated,
    Stable,
    Strong,
}

impl MarginBand {
    pub fn is_pressured(&self) -> bool {
        matches!(self, MarginBand::Weak | MarginBand::Elevated)
    }
}

impl BandThresholds {
    pub fn runway_band(&self, months: f64) -> StateBand {
        if months.is_nan() {
            return StateBand::Moderate;
        }
        if months < self.runway_high_below {
            StateBand::High
        } else if months < self.runway_elevated_below {
            StateBand::Elevated
        } else if months < self.runway_moderate_below {
            StateBand::Moderate
        } else {
            StateBand::Stable
        }
    }

    pub fn risk_band(&self, score: f64) -> StateBand {
        if score.is_nan() {
            return StateBand::Moderate;
        }
        if score < self.risk_moderate_from {
            StateBand::Stable
        } else if score < self.risk_elevated_from {
            StateBand::Moderate
        } else if score < self.risk_high_from {
            StateBand::Elevated
        } else {
            StateBand::High
        }
    }

    pub fn burn_pressure_band(&self, current: f64, baseline: f64) -> BurnPressure {
        let Some(ratio) = change_ratio(current, baseline) else {
            return BurnPressure::Flat;
        };
        if ratio <= self.burn_down_at_most {
            BurnPressure::Down
        } else if ratio < self.burn_up_moderate_from {
            BurnPressure::Flat
        } else if ratio < self.burn_up_elevated_from {
            BurnPressure::UpModerate
        } else if ratio < self.burn_up_high_from {
            BurnPressure::UpElevated
        } else {
            BurnPressure::UpHigh
        }
    }

    pub fn arr_growth_band(&self, pct: f64) -> ArrGrowthBand {
        if !pct.is_finite() {
            ArrGrowthBand::Unknown
        } else if pct < 0.0 {
            ArrGrowthBand::Contracting
        } else if pct < self.arr_growth_healthy_from {
            ArrGrowthBand::Weak
        } else if pct < self.arr_growth_strong_from {
            ArrGrowthBand::Healthy
        } else {
            ArrGrowthBand::Strong
        }
    }

    pub fn gross_margin_band(&self, pct: f64) -> MarginBand {
        if !pct.is_finite() {
            MarginBand::Unknown
        } else if pct < self.margin_elevated_from {
            MarginBand::Weak
        } else if pct < self.margin_stable_from {
            MarginBand::Elevated
        } else if pct < self.margin_strong_from {
            MarginBand::Stable
        } else {
            MarginBand::Strong
        }
    }
}

/// `(current - baseline) / baseline`, or `None` when the baseline is not a
/// positive finite number or the current value is not finite.
pub fn change_ratio(current: f64, baseline: f64) -> Option<f64> {
    if !current.is_finite() || !baseline.is_finite() || baseline <= 0.0 {
        return None;
    }
    Some((current - baseline) / baseline)
}

pub fn runway_band(months: f64) -> StateBand {
    BandThresholds::STANDARD.runway_band(months)
}

pub fn risk_band(score: f64) -> StateBand {
    BandThresholds::STANDARD.risk_band(score)
}

pub fn burn_pressure_band(current: f64, baseline: f64) -> BurnPressure {
    BandThresholds::STANDARD.burn_pressure_band(current, baseline)
}

pub fn arr_growth_band(pct: f64) -> ArrGrowthBand {
    BandThresholds::STANDARD.arr_growth_band(pct)
}

pub fn gross_margin_band(pct: f64) -> MarginBand {
    BandThresholds::STANDARD.gross_margin_band(pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runway_band_boundaries() {
        assert_eq!(runway_band(0.0), StateBand::High);
        assert_eq!(runway_band(5.99), StateBand::High);
        assert_eq!(runway_band(6.0), StateBand::Elevated);
        assert_eq!(runway_band(11.99), StateBand::Elevated);
        assert_eq!(runway_band(12.0), StateBand::Moderate);
        assert_eq!(runway_band(17.99), StateBand::Moderate);
        assert_eq!(runway_band(18.0), StateBand::Stable);
        assert_eq!(runway_band(60.0), StateBand::Stable);
    }

    #[test]
    fn test_runway_band_non_finite() {
        assert_eq!(runway_band(f64::NAN), StateBand::Moderate);
        assert_eq!(runway_band(f64::INFINITY), StateBand::Stable);
        assert_eq!(runway_band(f64::NEG_INFINITY), StateBand::High);
    }

    #[test]
    fn test_risk_band_boundaries() {
        assert_eq!(risk_band(0.0), StateBand::Stable);
        assert_eq!(risk_band(29.9), StateBand::Stable);
        assert_eq!(risk_band(30.0), StateBand::Moderate);
        assert_eq!(risk_band(54.9), StateBand::Moderate);
        assert_eq!(risk_band(55.0), StateBand::Elevated);
        assert_eq!(risk_band(74.9), StateBand::Elevated);
        assert_eq!(risk_band(75.0), StateBand::High);
        assert_eq!(risk_band(100.0), StateBand::High);
        assert_eq!(risk_band(f64::NAN), StateBand::Moderate);
    }

    #[test]
    fn test_burn_pressure_boundaries() {
        let base = 100_000.0;
        assert_eq!(burn_pressure_band(92_000.0, base), BurnPressure::Down);
        assert_eq!(burn_pressure_band(92_001.0, base), BurnPressure::Flat);
        assert_eq!(burn_pressure_band(100_000.0, base), BurnPressure::Flat);
        assert_eq!(burn_pressure_band(102_999.0, base), BurnPressure::Flat);
        assert_eq!(burn_pressure_band(103_000.0, base), BurnPressure::UpModerate);
        assert_eq!(burn_pressure_band(108_000.0, base), BurnPressure::UpElevated);
        assert_eq!(burn_pressure_band(114_999.0, base), BurnPressure::UpElevated);
        assert_eq!(burn_pressure_band(115_000.0, base), BurnPressure::UpHigh);
    }

    #[test]
    fn test_burn_pressure_degenerate_baseline() {
        assert_eq!(burn_pressure_band(50_000.0, 0.0), BurnPressure::Flat);
        assert_eq!(burn_pressure_band(50_000.0, -10.0), BurnPressure::Flat);
        assert_eq!(burn_pressure_band(f64::NAN, 100.0), BurnPressure::Flat);
        assert_eq!(burn_pressure_band(100.0, f64::INFINITY), BurnPressure::Flat);
    }

    #[test]
    fn test_arr_growth_band() {
        assert_eq!(arr_growth_band(f64::NAN), ArrGrowthBand::Unknown);
        assert_eq!(arr_growth_band(f64::INFINITY), ArrGrowthBand::Unknown);
        assert_eq!(arr_growth_band(-0.1), ArrGrowthBand::Contracting);
        assert_eq!(arr_growth_band(0.0), ArrGrowthBand::Weak);
        assert_eq!(arr_growth_band(9.99), ArrGrowthBand::Weak);
        assert_eq!(arr_growth_band(10.0), ArrGrowthBand::Healthy);
        assert_eq!(arr_growth_band(25.0), ArrGrowthBand::Strong);
    }

    #[test]
    fn test_gross_margin_band() {
        assert_eq!(gross_margin_band(49.9), MarginBand::Weak);
        assert_eq!(gross_margin_band(50.0), MarginBand::Elevated);
        assert_eq!(gross_margin_band(65.0), MarginBand::Stable);
        assert_eq!(gross_margin_band(79.9), MarginBand::Stable);
        assert_eq!(gross_margin_band(80.0), MarginBand::Strong);
        assert_eq!(gross_margin_band(f64::NAN), MarginBand::Unknown);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = BandThresholds {
            runway_moderate_below: 24.0,
            ..BandThresholds::STANDARD
        };
        assert_eq!(thresholds.runway_band(20.0), StateBand::Moderate);
        assert_eq!(runway_band(20.0), StateBand::Stable);
    }
}
