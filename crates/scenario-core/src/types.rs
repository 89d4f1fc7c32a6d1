use serde::{Deserialize, Deserializer, Serialize};

use crate::traits::Ordinal;

/// Point-in-time financial and operational metrics for one scenario.
///
/// Every field reads `null` or an absent key as unknown (NaN); the band
/// classifiers resolve unknowns to fixed bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub runway_months: f64,
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub cash_position: f64,
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub burn_rate_monthly: f64,
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub arr: f64,
    /// May be NaN or infinite when growth is unknown.
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub arr_growth_pct: f64,
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub gross_margin_pct: f64,
    /// 0 to 100, higher is worse
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub risk_score: f64,
    #[serde(default = "unknown_metric", deserialize_with = "metric_or_unknown")]
    pub enterprise_value: f64,
}

fn unknown_metric() -> f64 {
    f64::NAN
}

fn metric_or_unknown<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl MetricSnapshot {
    /// A snapshot sitting comfortably inside every stable band.
    pub fn nominal() -> Self {
        Self {
            runway_months: 24.0,
            cash_position: 4_800_000.0,
            burn_rate_monthly: 200_000.0,
            arr: 6_000_000.0,
            arr_growth_pct: 18.0,
            gross_margin_pct: 72.0,
            risk_score: 20.0,
            enterprise_value: 48_000_000.0,
        }
    }
}

/// P10 / P50 / P90 of a simulated distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileTriple {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Percentile summary of a Monte-Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub iterations: u32,
    pub horizon_months: u32,
    /// Share of paths (0.0 to 1.0) that never exhaust cash within the horizon
    pub survival_rate: f64,
    pub arr: PercentileTriple,
    pub cash: PercentileTriple,
    pub runway: PercentileTriple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClassification {
    Low,
    Moderate,
    High,
    Critical,
}

/// Named contribution to the overall risk profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub name: String,
    /// Share of total risk, 0.0 to 1.0
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub classification: RiskClassification,
    pub value_at_risk: f64,
    /// 0 to 100
    pub tail_risk_score: f64,
    /// 0 to 100
    pub burn_fragility_index: f64,
    /// 0 to 100
    pub volatility_index: f64,
    #[serde(default)]
    pub drivers: Vec<RiskDriver>,
}

/// One lever from the sensitivity analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityFactor {
    pub label: String,
    pub elasticity_score: f64,
    /// Change in survival rate (fraction) when the lever moves favourably
    pub delta_survival: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationSummary {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDriver {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    /// 0 to 100
    pub score: f64,
    #[serde(default)]
    pub drivers: Vec<ConfidenceDriver>,
}

/// Everything the quantified findings path reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAnalysisSnapshot {
    pub simulation: SimulationSummary,
    pub risk_profile: RiskProfile,
    /// Ranked strongest lever first
    #[serde(default)]
    pub sensitivity: Vec<SensitivityFactor>,
    #[serde(default)]
    pub valuation: Option<ValuationSummary>,
    pub confidence: ConfidenceScore,
}

/// Operational severity used by the classification path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateBand {
    Stable,
    Moderate,
    Elevated,
    High,
}

impl StateBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateBand::Stable => "STABLE",
            StateBand::Moderate => "MODERATE",
            StateBand::Elevated => "ELEVATED",
            StateBand::High => "HIGH",
        }
    }
}

impl Ordinal for StateBand {
    fn rank(&self) -> u8 {
        match self {
            StateBand::Stable => 0,
            StateBand::Moderate => 1,
            StateBand::Elevated => 2,
            StateBand::High => 3,
        }
    }
}

/// Outcome severity used by the quantified findings path.
///
/// Deliberately separate from [`StateBand`]; each pipeline owns its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Positive,
    Neutral,
    Warning,
    Critical,
}

impl Ordinal for FindingSeverity {
    fn rank(&self) -> u8 {
        match self {
            FindingSeverity::Positive => 0,
            FindingSeverity::Neutral => 1,
            FindingSeverity::Warning => 2,
            FindingSeverity::Critical => 3,
        }
    }
}
