//! Quantified findings
//!
//! Turns a simulation analysis into an ordered list of severity-graded
//! findings. Slots whose driving value is missing or non-finite are omitted.
//! Every number in a narrative is produced by [`CitationSet::cite`].

use scenario_core::{Citation, FindingSeverity, RiskClassification, SystemAnalysisSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::citations::CitationSet;
use crate::config::FindingThresholds;
use crate::format::{
    format_count, format_currency, format_elasticity, format_months, format_percent, format_score,
    format_signed_percent,
};

use scenario_core::FindingSeverity::{Critical, Neutral, Positive, Warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Survival,
    Runway,
    Cash,
    Arr,
    RiskProfile,
    BurnFragility,
    TopLever,
    Valuation,
    Confidence,
}

impl FindingCategory {
    /// Slot order of the findings list.
    pub const ALL: [FindingCategory; 9] = [
        FindingCategory::Survival,
        FindingCategory::Runway,
        FindingCategory::Cash,
        FindingCategory::Arr,
        FindingCategory::RiskProfile,
        FindingCategory::BurnFragility,
        FindingCategory::TopLever,
        FindingCategory::Valuation,
        FindingCategory::Confidence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Survival => "survival",
            FindingCategory::Runway => "runway",
            FindingCategory::Cash => "cash",
            FindingCategory::Arr => "arr",
            FindingCategory::RiskProfile => "risk_profile",
            FindingCategory::BurnFragility => "burn_fragility",
            FindingCategory::TopLever => "top_lever",
            FindingCategory::Valuation => "valuation",
            FindingCategory::Confidence => "confidence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantifiedFinding {
    pub id: String,
    pub category: FindingCategory,
    pub severity: FindingSeverity,
    pub narrative: String,
    pub citations: Vec<Citation>,
}

impl QuantifiedFinding {
    fn new(
        category: FindingCategory,
        severity: FindingSeverity,
        narrative: String,
        citations: CitationSet,
    ) -> Self {
        Self {
            id: format!("finding-{}", category.as_str().replace('_', "-")),
            category,
            severity,
            narrative,
            citations: citations.into_vec(),
        }
    }
}

/// Extract findings with the standard thresholds.
pub fn extract_findings(analysis: &SystemAnalysisSnapshot) -> Vec<QuantifiedFinding> {
    extract_findings_with(analysis, &FindingThresholds::STANDARD)
}

pub fn extract_findings_with(
    analysis: &SystemAnalysisSnapshot,
    thresholds: &FindingThresholds,
) -> Vec<QuantifiedFinding> {
    let slots = [
        survival(analysis, thresholds),
        runway(analysis, thresholds),
        cash(analysis, thresholds),
        arr(analysis, thresholds),
        risk_profile(analysis),
        burn_fragility(analysis, thresholds),
        top_lever(analysis, thresholds),
        valuation(analysis, thresholds),
        confidence(analysis, thresholds),
    ];

    let findings: Vec<QuantifiedFinding> = slots.into_iter().flatten().collect();
    debug!(
        findings = findings.len(),
        omitted = FindingCategory::ALL.len() - findings.len(),
        "Extracted quantified findings"
    );
    findings
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Higher is better; thresholds descend.
fn grade_rising(value: f64, positive_from: f64, neutral_from: f64, warning_from: f64) -> FindingSeverity {
    if value >= positive_from {
        Positive
    } else if value >= neutral_from {
        Neutral
    } else if value >= warning_from {
        Warning
    } else {
        Critical
    }
}

/// Higher is worse; thresholds ascend.
fn grade_falling(value: f64, neutral_from: f64, warning_from: f64, critical_from: f64) -> FindingSeverity {
    if value >= critical_from {
        Critical
    } else if value >= warning_from {
        Warning
    } else if value >= neutral_from {
        Neutral
    } else {
        Positive
    }
}

fn survival(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let sim = &a.simulation;
    let rate = finite(sim.survival_rate)?;
    let severity = grade_rising(
        rate,
        t.survival_positive_from,
        t.survival_neutral_from,
        t.survival_warning_from,
    );

    let mut cites = CitationSet::new();
    let pct = cites.cite("Survival rate", format_percent(rate));
    let horizon = cites.cite("Simulation horizon", format_months(f64::from(sim.horizon_months)));
    let narrative = if sim.iterations > 0 {
        let paths = cites.cite("Simulated paths", format_count(sim.iterations));
        match severity {
            Positive => format!("{pct} of {paths} simulated paths keep cash positive over {horizon}, so the plan holds up well against downside outcomes."),
            Neutral => format!("{pct} of {paths} simulated paths survive {horizon}. Most outcomes hold, but a meaningful minority run out of cash."),
            Warning => format!("Only {pct} of {paths} simulated paths survive {horizon}. The plan depends on conditions breaking its way."),
            Critical => format!("Just {pct} of {paths} simulated paths survive {horizon}. Running out of cash is the more likely outcome."),
        }
    } else {
        match severity {
            Positive => format!("Survival across {horizon} sits at {pct}, comfortably protected against downside scenarios."),
            Neutral => format!("Survival across {horizon} sits at {pct}; the plan is workable but carries visible downside."),
            Warning => format!("Survival across {horizon} falls to {pct}, leaving little margin for missed targets."),
            Critical => format!("Survival across {horizon} is only {pct}, which makes a cash shortfall the central case."),
        }
    };
    Some(QuantifiedFinding::new(FindingCategory::Survival, severity, narrative, cites))
}

fn runway(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let triple = &a.simulation.runway;
    let median = finite(triple.p50)?;
    let severity = grade_rising(
        median,
        t.runway_positive_from,
        t.runway_neutral_from,
        t.runway_warning_from,
    );

    let mut cites = CitationSet::new();
    let p50 = cites.cite("Runway P50", format_months(median));
    let narrative = match finite(triple.p10) {
        Some(downside) => {
            let p10 = cites.cite("Runway P10", format_months(downside));
            match severity {
                Positive => format!("Median runway is {p50} and the downside case still reaches {p10}, well clear of a forced raise."),
                Neutral => format!("Median runway is {p50}, with a downside case of {p10}. Fundraising can follow the plan rather than lead it."),
                Warning => format!("Median runway is {p50} and the downside case shortens to {p10}. Financing preparation should start now."),
                Critical => format!("Median runway is only {p50}, and the downside case leaves {p10}. Cash preservation is urgent."),
            }
        }
        None => match severity {
            Positive => format!("Median runway of {p50} gives the plan ample time to execute."),
            Neutral => format!("Median runway of {p50} is adequate, though not generous."),
            Warning => format!("Median runway of {p50} leaves limited time before financing becomes necessary."),
            Critical => format!("Median runway of {p50} puts the business close to a cash-out."),
        },
    };
    Some(QuantifiedFinding::new(FindingCategory::Runway, severity, narrative, cites))
}

fn cash(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let triple = &a.simulation.cash;
    let median = finite(triple.p50)?;
    let floor = finite(triple.p10);
    let ceiling = finite(triple.p90);

    let severity = match floor {
        _ if median <= 0.0 => Critical,
        Some(low) if low <= 0.0 => Critical,
        Some(low) if low / median >= t.cash_floor_positive_ratio => Positive,
        Some(low) => match ceiling {
            Some(high) if (high - low) / median > t.cash_spread_warning_ratio => Warning,
            _ => Neutral,
        },
        None => Neutral,
    };

    let mut cites = CitationSet::new();
    let p50 = cites.cite("Cash P50", format_currency(median));
    let narrative = match (floor, ceiling) {
        (Some(low), Some(high)) => {
            let p10 = cites.cite("Cash P10", format_currency(low));
            let p90 = cites.cite("Cash P90", format_currency(high));
            match severity {
                Positive => format!("Median ending cash is {p50}, and even the downside case retains {p10}. The balance sheet absorbs shocks well."),
                Neutral => format!("Ending cash centres on {p50}, ranging from {p10} in the downside case to {p90} in the upside case."),
                Warning => format!("Ending cash is widely dispersed, from {p10} to {p90} around a median of {p50}. Outcomes hinge on execution."),
                Critical => format!("The downside case ends with {p10} in cash against a median of {p50}, so a shortfall is a live possibility."),
            }
        }
        (Some(low), None) => {
            let p10 = cites.cite("Cash P10", format_currency(low));
            match severity {
                Positive | Neutral => format!("Median ending cash is {p50}, with {p10} in the downside case."),
                Warning | Critical => format!("Median ending cash is {p50}, but the downside case falls to {p10}."),
            }
        }
        _ => match severity {
            Critical => format!("Median ending cash is {p50}, leaving no reserve in the central case."),
            _ => format!("Median ending cash is {p50}; downside figures were not reported."),
        },
    };
    Some(QuantifiedFinding::new(FindingCategory::Cash, severity, narrative, cites))
}

fn arr(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let triple = &a.simulation.arr;
    let median = finite(triple.p50)?;
    let floor = finite(triple.p10);

    let severity = match floor {
        _ if median <= 0.0 => Critical,
        Some(low) => grade_rising(
            low / median,
            t.arr_downside_positive_from,
            t.arr_downside_neutral_from,
            t.arr_downside_warning_from,
        ),
        None => Neutral,
    };

    let mut cites = CitationSet::new();
    let p50 = cites.cite("ARR P50", format_currency(median));
    let narrative = match floor {
        Some(low) => {
            let p10 = cites.cite("ARR P10", format_currency(low));
            let upside = finite(triple.p90).map(|high| cites.cite("ARR P90", format_currency(high)));
            match (severity, upside) {
                (Positive, Some(p90)) => format!("Median ARR reaches {p50} with a tight range from {p10} to {p90}. Revenue is the steadiest part of the plan."),
                (Positive, None) => format!("Median ARR reaches {p50} and the downside case holds at {p10}."),
                (Neutral, Some(p90)) => format!("Median ARR is {p50}, spanning {p10} to {p90}. Revenue outcomes are reasonably predictable."),
                (Neutral, None) => format!("Median ARR is {p50}, with a downside case of {p10}."),
                (Warning, Some(p90)) => format!("ARR could land anywhere from {p10} to {p90} around a median of {p50}. Revenue visibility is limited."),
                (Warning, None) => format!("Median ARR is {p50}, but the downside case slips to {p10}."),
                (Critical, _) => format!("The downside case leaves ARR at {p10} against a median of {p50}, so revenue cannot be relied on to fund the plan."),
            }
        }
        None => match severity {
            Critical => format!("Median ARR of {p50} does not yet support the plan."),
            _ => format!("Median ARR is {p50}; the downside range was not reported."),
        },
    };
    Some(QuantifiedFinding::new(FindingCategory::Arr, severity, narrative, cites))
}

fn risk_profile(a: &SystemAnalysisSnapshot) -> Option<QuantifiedFinding> {
    let profile = &a.risk_profile;
    let tail = finite(profile.tail_risk_score)?;
    let severity = match profile.classification {
        RiskClassification::Low => Positive,
        RiskClassification::Moderate => Neutral,
        RiskClassification::High => Warning,
        RiskClassification::Critical => Critical,
    };

    let mut cites = CitationSet::new();
    let score = cites.cite("Tail risk score", format_score(tail));
    let var = finite(profile.value_at_risk).map(|v| cites.cite("Value at risk", format_currency(v)));
    let lead = profile
        .drivers
        .iter()
        .filter(|d| d.contribution.is_finite())
        .max_by(|x, y| x.contribution.total_cmp(&y.contribution))
        .map(|d| {
            (
                cites.cite("Top risk driver", d.name.clone()),
                cites.cite("Top risk driver share", format_percent(d.contribution)),
            )
        });

    let opening = match (severity, &var) {
        (Positive, Some(var)) => format!("Risk is low, with a tail risk score of {score} and value at risk of {var}."),
        (Positive, None) => format!("Risk is low, with a tail risk score of {score}."),
        (Neutral, Some(var)) => format!("Risk is moderate: tail risk scores {score} and value at risk stands at {var}."),
        (Neutral, None) => format!("Risk is moderate, with a tail risk score of {score}."),
        (Warning, Some(var)) => format!("Risk is high. Tail risk scores {score} and value at risk reaches {var}."),
        (Warning, None) => format!("Risk is high, with a tail risk score of {score}."),
        (Critical, Some(var)) => format!("Risk is critical. Tail risk scores {score} and value at risk reaches {var}."),
        (Critical, None) => format!("Risk is critical, with a tail risk score of {score}."),
    };
    let narrative = match lead {
        Some((name, share)) => format!("{opening} The largest driver is {name}, at {share} of total risk."),
        None => opening,
    };
    Some(QuantifiedFinding::new(FindingCategory::RiskProfile, severity, narrative, cites))
}

fn burn_fragility(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let index = finite(a.risk_profile.burn_fragility_index)?;
    let severity = grade_falling(
        index,
        t.fragility_neutral_from,
        t.fragility_warning_from,
        t.fragility_critical_from,
    );

    let mut cites = CitationSet::new();
    let fragility = cites.cite("Burn fragility index", format_score(index));
    let narrative = match finite(a.risk_profile.volatility_index) {
        Some(vol) => {
            let volatility = cites.cite("Volatility index", format_score(vol));
            match severity {
                Positive => format!("Burn fragility is {fragility} with volatility at {volatility}; spending can flex without threatening runway."),
                Neutral => format!("Burn fragility of {fragility} and volatility of {volatility} leave modest room for cost overruns."),
                Warning => format!("Burn fragility has reached {fragility} with volatility at {volatility}. Small overruns now move runway noticeably."),
                Critical => format!("Burn fragility of {fragility} and volatility of {volatility} mean minor spending slips could break the plan."),
            }
        }
        None => match severity {
            Positive => format!("Burn fragility is low at {fragility}."),
            Neutral => format!("Burn fragility sits at {fragility}, a manageable level."),
            Warning => format!("Burn fragility of {fragility} makes runway sensitive to overruns."),
            Critical => format!("Burn fragility of {fragility} leaves almost no tolerance for overruns."),
        },
    };
    Some(QuantifiedFinding::new(FindingCategory::BurnFragility, severity, narrative, cites))
}

fn top_lever(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let lever = a.sensitivity.first()?;
    let elasticity = finite(lever.elasticity_score)?;
    let delta = finite(lever.delta_survival);
    let dominant = elasticity >= t.lever_dominant_elasticity;

    let severity = match delta {
        Some(d) if dominant && d >= 0.0 => Positive,
        Some(d) if dominant && d <= -0.10 => Critical,
        Some(d) if d < 0.0 => Warning,
        _ => Neutral,
    };

    let mut cites = CitationSet::new();
    let label = cites.cite("Top lever", lever.label.clone());
    let score = cites.cite("Elasticity", format_elasticity(elasticity));
    let narrative = match delta {
        Some(d) => {
            let shift = cites.cite("Survival change", format_signed_percent(d));
            match severity {
                Positive => format!("{label} is the strongest lever, with elasticity of {score}; moving it shifts survival by {shift}."),
                Neutral => format!("{label} ranks first among the levers at elasticity {score}, shifting survival by {shift}."),
                Warning => format!("{label} leads the sensitivity ranking at {score}, and its movement shifts survival by {shift}."),
                Critical => format!("The plan leans heavily on {label}: elasticity is {score} and survival shifts by {shift} when it moves."),
            }
        }
        None => format!("{label} is the most sensitive lever, with elasticity of {score}."),
    };
    Some(QuantifiedFinding::new(FindingCategory::TopLever, severity, narrative, cites))
}

fn valuation(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let v = a.valuation.as_ref()?;
    let median = finite(v.p50)?;
    let (low, high) = (finite(v.p10), finite(v.p90));

    let severity = match (low, high) {
        _ if median <= 0.0 => Critical,
        (Some(low), Some(high)) => {
            let spread = (high - low) / median;
            if spread <= t.valuation_spread_positive_to {
                Positive
            } else if spread <= t.valuation_spread_neutral_to {
                Neutral
            } else if spread <= t.valuation_spread_warning_to {
                Warning
            } else {
                Critical
            }
        }
        _ => Neutral,
    };

    let mut cites = CitationSet::new();
    let p50 = cites.cite("Valuation P50", format_currency(median));
    let narrative = match (low, high) {
        (Some(low), Some(high)) => {
            let p10 = cites.cite("Valuation P10", format_currency(low));
            let p90 = cites.cite("Valuation P90", format_currency(high));
            let quartiles = match (finite(v.p25), finite(v.p75)) {
                (Some(q1), Some(q3)) => Some((
                    cites.cite("Valuation P25", format_currency(q1)),
                    cites.cite("Valuation P75", format_currency(q3)),
                )),
                _ => None,
            };
            match (severity, quartiles) {
                (Positive, Some((p25, p75))) => format!("Valuation centres on {p50}, with the middle half of outcomes between {p25} and {p75} and a full range of {p10} to {p90}."),
                (Positive, None) => format!("Valuation centres on {p50} within a narrow range of {p10} to {p90}."),
                (Neutral, Some((p25, p75))) => format!("Valuation centres on {p50}; most outcomes fall between {p25} and {p75}, within a range of {p10} to {p90}."),
                (Neutral, None) => format!("Valuation centres on {p50}, ranging from {p10} to {p90}."),
                (Warning, _) => format!("Valuation is uncertain: a median of {p50} sits inside a wide range from {p10} to {p90}."),
                (Critical, _) => format!("Valuation outcomes run from {p10} to {p90} around {p50}, too wide to anchor a financing conversation."),
            }
        }
        _ => match severity {
            Critical => format!("Median valuation of {p50} offers no support for new financing."),
            _ => format!("Median valuation is {p50}; the outcome range was not reported."),
        },
    };
    Some(QuantifiedFinding::new(FindingCategory::Valuation, severity, narrative, cites))
}

fn confidence(a: &SystemAnalysisSnapshot, t: &FindingThresholds) -> Option<QuantifiedFinding> {
    let score = finite(a.confidence.score)?;
    let severity = grade_rising(
        score,
        t.confidence_positive_from,
        t.confidence_neutral_from,
        t.confidence_warning_from,
    );

    let mut cites = CitationSet::new();
    let overall = cites.cite("Confidence score", format_score(score));
    let weakest = a
        .confidence
        .drivers
        .iter()
        .filter(|d| d.score.is_finite())
        .min_by(|x, y| x.score.total_cmp(&y.score))
        .map(|d| {
            (
                cites.cite("Weakest confidence driver", d.name.clone()),
                cites.cite("Weakest confidence driver score", format_score(d.score)),
            )
        });

    let narrative = match (severity, weakest) {
        (Positive, Some((name, low))) => format!("Model confidence is {overall}. Even the weakest input, {name}, scores {low}."),
        (Positive, None) => format!("Model confidence is {overall}; the inputs support firm conclusions."),
        (Neutral, Some((name, low))) => format!("Model confidence is {overall}, held back mainly by {name} at {low}."),
        (Neutral, None) => format!("Model confidence is {overall}, adequate for directional planning."),
        (Warning, Some((name, low))) => format!("Model confidence is only {overall}, with {name} scoring {low}. Treat these findings as provisional."),
        (Warning, None) => format!("Model confidence is only {overall}; treat these findings as provisional."),
        (Critical, Some((name, low))) => format!("Model confidence is {overall} and {name} scores {low}. Improve the inputs before acting on these results."),
        (Critical, None) => format!("Model confidence is {overall}, too low to act on these results without better inputs."),
    };
    Some(QuantifiedFinding::new(FindingCategory::Confidence, severity, narrative, cites))
}


#[cfg(test)]
mod tests {
    use super::fixtures::{distressed_analysis, healthy_analysis};
    use super::*;
    use crate::citations::is_backed_by;

    #[test]
    fn test_full_slot_order() {
        let categories: Vec<_> = extract_findings(&healthy_analysis())
            .into_iter()
            .map(|f| f.category)
            .collect();
        assert_eq!(categories, FindingCategory::ALL.to_vec());
    }

    #[test]
    fn test_healthy_severities() {
        for finding in extract_findings(&healthy_analysis()) {
            assert_eq!(finding.severity, Positive, "{}", finding.narrative);
        }
    }

    #[test]
    fn test_distressed_severities() {
        let findings = extract_findings(&distressed_analysis());
        let severity = |category: FindingCategory| {
            findings
                .iter()
                .find(|f| f.category == category)
                .map(|f| f.severity)
        };
        assert_eq!(severity(FindingCategory::Survival), Some(Critical));
        assert_eq!(severity(FindingCategory::Runway), Some(Critical));
        assert_eq!(severity(FindingCategory::Cash), Some(Critical));
        assert_eq!(severity(FindingCategory::Arr), Some(Critical));
        assert_eq!(severity(FindingCategory::RiskProfile), Some(Critical));
        assert_eq!(severity(FindingCategory::BurnFragility), Some(Critical));
        assert_eq!(severity(FindingCategory::TopLever), Some(Critical));
        assert_eq!(severity(FindingCategory::Valuation), None);
        assert_eq!(severity(FindingCategory::Confidence), Some(Critical));
    }

    #[test]
    fn test_optional_sections_are_omitted() {
        let mut analysis = healthy_analysis();
        analysis.sensitivity.clear();
        analysis.valuation = None;
        let categories: Vec<_> = extract_findings(&analysis).into_iter().map(|f| f.category).collect();
        assert_eq!(categories.len(), 7);
        assert!(!categories.contains(&FindingCategory::TopLever));
        assert!(!categories.contains(&FindingCategory::Valuation));
    }

    #[test]
    fn test_non_finite_driver_omits_slot() {
        let mut analysis = healthy_analysis();
        analysis.simulation.survival_rate = f64::NAN;
        analysis.simulation.runway.p50 = f64::INFINITY;
        let findings = extract_findings(&analysis);
        assert_eq!(findings[0].category, FindingCategory::Cash);
        assert!(findings.iter().all(|f| !f.narrative.contains("NaN") && !f.narrative.contains("inf")));
    }

    #[test]
    fn test_narratives_are_backed_by_citations() {
        for analysis in [healthy_analysis(), distressed_analysis()] {
            for finding in extract_findings(&analysis) {
                assert!(
                    is_backed_by(&finding.narrative, &finding.citations),
                    "{}: {}",
                    finding.id,
                    finding.narrative
                );
            }
        }
    }

    #[test]
    fn test_survival_narrative_cites_rate() {
        let findings = extract_findings(&healthy_analysis());
        let survival = &findings[0];
        assert!(survival.narrative.starts_with("94.0% of 5000 simulated paths"));
        assert_eq!(survival.id, "finding-survival");
        assert_eq!(survival.citations[0].value, "94.0%");
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = FindingThresholds {
            survival_positive_from: 0.99,
            ..FindingThresholds::STANDARD
        };
        let findings = extract_findings_with(&healthy_analysis(), &strict);
        assert_eq!(findings[0].severity, Neutral);
    }
}
