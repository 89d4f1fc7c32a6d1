//! Engine Configuration
//!
//! Every cut-point used by the classifiers, selectors and finding gates lives
//! here. The values are domain constants calibrated against the planning
//! dashboard; change them here rather than inline.

use serde::{Deserialize, Serialize};

/// Cut-points for the per-dimension band classifiers.
///
/// Each threshold is the lower bound of the worse-or-better band named in the
/// field; comparisons are closed-open, so a value sitting exactly on a
/// threshold belongs to the band that starts there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    /// Runway below this is HIGH
    pub runway_high_below: f64,
    /// Runway below this is ELEVATED
    pub runway_elevated_below: f64,
    /// Runway below this is MODERATE, at or above it STABLE
    pub runway_moderate_below: f64,

    /// Risk score at or above this is MODERATE
    pub risk_moderate_from: f64,
    /// Risk score at or above this is ELEVATED
    pub risk_elevated_from: f64,
    /// Risk score at or above this is HIGH
    pub risk_high_from: f64,

    /// Burn change ratio at or below this is DOWN
    pub burn_down_at_most: f64,
    /// Burn change ratio at or above this is UP_MODERATE
    pub burn_up_moderate_from: f64,
    /// Burn change ratio at or above this is UP_ELEVATED
    pub burn_up_elevated_from: f64,
    /// Burn change ratio at or above this is UP_HIGH
    pub burn_up_high_from: f64,

    /// ARR growth (%) at or above this is HEALTHY
    pub arr_growth_healthy_from: f64,
    /// ARR growth (%) at or above this is STRONG
    pub arr_growth_strong_from: f64,

    /// Gross margin (%) at or above this is ELEVATED (below is WEAK)
    pub margin_elevated_from: f64,
    /// Gross margin (%) at or above this is STABLE
    pub margin_stable_from: f64,
    /// Gross margin (%) at or above this is STRONG
    pub margin_strong_from: f64,
}

impl BandThresholds {
    pub const STANDARD: BandThresholds = BandThresholds {
        runway_high_below: 6.0,
        runway_elevated_below: 12.0,
        runway_moderate_below: 18.0,

        risk_moderate_from: 30.0,
        risk_elevated_from: 55.0,
        risk_high_from: 75.0,

        burn_down_at_most: -0.08,
        burn_up_moderate_from: 0.03,
        burn_up_elevated_from: 0.08,
        burn_up_high_from: 0.15,

        arr_growth_healthy_from: 10.0,
        arr_growth_strong_from: 25.0,

        margin_elevated_from: 50.0,
        margin_stable_from: 65.0,
        margin_strong_from: 80.0,
    };
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Inclusive size bounds for one output collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && len <= self.max
    }
}

/// Output-size contract of the classification report.
pub struct SelectionLimits;

impl SelectionLimits {
    pub const ASSUMPTION_FLAGS: Bounds = Bounds::new(0, 2);
    pub const STRATEGIC_QUESTIONS: Bounds = Bounds::new(0, 2);
    pub const RISKS: Bounds = Bounds::new(1, 3);
    pub const STRENGTHS: Bounds = Bounds::new(3, 3);
    pub const VULNERABILITIES: Bounds = Bounds::new(3, 3);
    pub const PRIORITIES: Bounds = Bounds::new(3, 3);
    pub const OBSERVATIONS: Bounds = Bounds::new(2, 4);
    pub const ATTENTION: Bounds = Bounds::new(2, 3);

    /// Entries each family contributes to the observation list
    pub const OBSERVATIONS_PER_FAMILY: usize = 2;
}

/// Severity gates for the quantified findings path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FindingThresholds {
    /// Survival rate (fraction) at or above: positive / neutral / warning
    pub survival_positive_from: f64,
    pub survival_neutral_from: f64,
    pub survival_warning_from: f64,

    /// Median runway (months) at or above: positive / neutral / warning
    pub runway_positive_from: f64,
    pub runway_neutral_from: f64,
    pub runway_warning_from: f64,

    /// Cash P10 at or above this share of P50 is positive
    pub cash_floor_positive_ratio: f64,
    /// Cash P90-P10 spread above this multiple of P50 is a warning
    pub cash_spread_warning_ratio: f64,

    /// ARR P10/P50 ratio at or above: positive / neutral / warning
    pub arr_downside_positive_from: f64,
    pub arr_downside_neutral_from: f64,
    pub arr_downside_warning_from: f64,

    /// Burn fragility index at or above: neutral / warning / critical
    pub fragility_neutral_from: f64,
    pub fragility_warning_from: f64,
    pub fragility_critical_from: f64,

    /// Elasticity at or above this marks a lever the plan leans on heavily
    pub lever_dominant_elasticity: f64,

    /// Valuation (P90-P10)/P50 spread at most: positive / neutral / warning
    pub valuation_spread_positive_to: f64,
    pub valuation_spread_neutral_to: f64,
    pub valuation_spread_warning_to: f64,

    /// Confidence score at or above: positive / neutral / warning
    pub confidence_positive_from: f64,
    pub confidence_neutral_from: f64,
    pub confidence_warning_from: f64,
}

impl FindingThresholds {
    pub const STANDARD: FindingThresholds = FindingThresholds {
        survival_positive_from: 0.90,
        survival_neutral_from: 0.75,
        survival_warning_from: 0.50,

        runway_positive_from: 24.0,
        runway_neutral_from: 18.0,
        runway_warning_from: 12.0,

        cash_floor_positive_ratio: 0.5,
        cash_spread_warning_ratio: 1.5,

        arr_downside_positive_from: 0.8,
        arr_downside_neutral_from: 0.6,
        arr_downside_warning_from: 0.4,

        fragility_neutral_from: 30.0,
        fragility_warning_from: 50.0,
        fragility_critical_from: 70.0,

        lever_dominant_elasticity: 1.0,

        valuation_spread_positive_to: 0.5,
        valuation_spread_neutral_to: 1.0,
        valuation_spread_warning_to: 2.0,

        confidence_positive_from: 75.0,
        confidence_neutral_from: 50.0,
        confidence_warning_from: 30.0,
    };
}

impl Default for FindingThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Delta gates shared by the candidate rules.
pub struct Triggers;

impl Triggers {
    /// ARR growth drop, percentage points
    pub const GROWTH_DROP: f64 = 5.0;
    pub const GROWTH_DROP_SEVERE: f64 = 10.0;
    /// ARR growth gain, percentage points
    pub const GROWTH_GAIN: f64 = 5.0;

    /// Runway change, months
    pub const RUNWAY_LOSS: f64 = 3.0;
    pub const RUNWAY_LOSS_SEVERE: f64 = 6.0;
    pub const RUNWAY_GAIN: f64 = 3.0;
    /// Runway long enough to count as a deep cushion, months
    pub const RUNWAY_DEEP: f64 = 24.0;

    /// Risk score change, points
    pub const RISK_JUMP: f64 = 10.0;
    pub const RISK_JUMP_SEVERE: f64 = 20.0;
    pub const RISK_RELIEF: f64 = 10.0;

    /// Gross margin drop, percentage points
    pub const MARGIN_DROP: f64 = 5.0;
    pub const MARGIN_DROP_SEVERE: f64 = 10.0;

    /// Cash change ratio against baseline
    pub const CASH_DRAWDOWN: f64 = -0.20;
    pub const CASH_DRAWDOWN_SEVERE: f64 = -0.40;
}
