//! Invariant Enforcer
//!
//! Last pass over qualitative output. Strips stray digits and re-clamps every
//! collection to its bounds, independent of how the report was produced.

use regex::Regex;
use scenario_core::{ScenarioError, ScenarioResult};
use tracing::warn;

use crate::candidates::{PRIORITY_FILLERS, STRENGTH_FILLERS, VULNERABILITY_FILLERS};
use crate::classifier::{ClassificationReport, RiskItem, StrategicQuestion};
use crate::config::{Bounds, SelectionLimits};
use crate::selector::pad_with_fillers;

lazy_static::lazy_static! {
    static ref DIGIT: Regex = Regex::new(r"\d").expect("digit pattern is valid");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
}

pub fn contains_digit(text: &str) -> bool {
    DIGIT.is_match(text)
}

/// Remove every decimal digit and collapse the whitespace left behind.
pub fn strip_digits(text: &str) -> String {
    if !contains_digit(text) {
        return text.to_string();
    }
    let stripped = DIGIT.replace_all(text, "");
    let collapsed = WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned();
    warn!(original = text, repaired = %collapsed, "Stripped digits from qualitative text");
    collapsed
}

fn clean_texts(texts: Vec<String>) -> Vec<String> {
    texts
        .iter()
        .map(|t| strip_digits(t))
        .filter(|t| !t.is_empty())
        .collect()
}

fn clamp(field: &str, items: &mut Vec<String>, bounds: Bounds, fillers: &[&str]) {
    let before = items.len();
    items.truncate(bounds.max);
    pad_with_fillers(items, bounds.min, fillers);
    if items.len() != before {
        warn!(field, before, after = items.len(), "Re-clamped collection to its bounds");
    }
}

/// Repair a report so every qualitative contract holds.
pub fn enforce(report: ClassificationReport) -> ClassificationReport {
    let ClassificationReport {
        system_state,
        observations,
        risks,
        attention,
        assumption_flags,
        strategic_questions,
    } = report;

    let mut observations = clean_texts(observations);
    let observation_fillers: Vec<&str> = STRENGTH_FILLERS
        .iter()
        .chain(VULNERABILITY_FILLERS)
        .copied()
        .collect();
    clamp("observations", &mut observations, SelectionLimits::OBSERVATIONS, &observation_fillers);

    let mut attention = clean_texts(attention);
    clamp("attention", &mut attention, SelectionLimits::ATTENTION, PRIORITY_FILLERS);

    let mut assumption_flags = clean_texts(assumption_flags);
    clamp("assumption_flags", &mut assumption_flags, SelectionLimits::ASSUMPTION_FLAGS, &[]);

    let mut risks: Vec<RiskItem> = risks
        .into_iter()
        .map(|risk| RiskItem {
            title: strip_digits(&risk.title),
            driver: strip_digits(&risk.driver),
            impact: strip_digits(&risk.impact),
            severity: risk.severity,
        })
        .filter(|risk| !risk.title.is_empty())
        .collect();
    risks.truncate(SelectionLimits::RISKS.max);
    if risks.is_empty() {
        warn!("No risks survived enforcement, emitting the no dominant risk item");
        risks.push(RiskItem::no_dominant_risk());
    }

    let mut strategic_questions: Vec<StrategicQuestion> = strategic_questions
        .into_iter()
        .map(|q| StrategicQuestion {
            question: strip_digits(&q.question),
            answer: strip_digits(&q.answer),
        })
        .filter(|q| !q.question.is_empty())
        .collect();
    strategic_questions.truncate(SelectionLimits::STRATEGIC_QUESTIONS.max);

    ClassificationReport {
        system_state,
        observations,
        risks,
        attention,
        assumption_flags,
        strategic_questions,
    }
}

/// Report every violated contract without repairing anything.
pub fn check(report: &ClassificationReport) -> ScenarioResult<()> {
    let mut violations = Vec::new();

    let sizes = [
        ("observations", report.observations.len(), SelectionLimits::OBSERVATIONS),
        ("risks", report.risks.len(), SelectionLimits::RISKS),
        ("attention", report.attention.len(), SelectionLimits::ATTENTION),
        ("assumptionFlags", report.assumption_flags.len(), SelectionLimits::ASSUMPTION_FLAGS),
        (
            "strategicQuestions",
            report.strategic_questions.len(),
            SelectionLimits::STRATEGIC_QUESTIONS,
        ),
    ];
    for (field, len, bounds) in sizes {
        if !bounds.contains(len) {
            violations.push(format!(
                "{field} has {len} entries, expected {} to {}",
                bounds.min, bounds.max
            ));
        }
    }

    let mut texts: Vec<(&str, &str)> = Vec::new();
    texts.extend(report.observations.iter().map(|t| ("observations", t.as_str())));
    texts.extend(report.attention.iter().map(|t| ("attention", t.as_str())));
    texts.extend(report.assumption_flags.iter().map(|t| ("assumptionFlags", t.as_str())));
    for risk in &report.risks {
        texts.push(("risks.title", risk.title.as_str()));
        texts.push(("risks.driver", risk.driver.as_str()));
        texts.push(("risks.impact", risk.impact.as_str()));
    }
    for question in &report.strategic_questions {
        texts.push(("strategicQuestions.question", question.question.as_str()));
        texts.push(("strategicQuestions.answer", question.answer.as_str()));
    }
    for (field, text) in texts {
        if contains_digit(text) {
            violations.push(format!("{field} contains a digit: {text:?}"));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ScenarioError::InvariantViolation(violations))
    }
}
