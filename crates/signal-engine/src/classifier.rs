//! Classification pipeline
//!
//! Snapshot pair in, bounded qualitative report out. Every report passes
//! through the enforcer before it is returned.

use scenario_core::{MetricSnapshot, Ordinal, StateBand};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidates::{
    QuestionTemplate, RiskTemplate, ASSUMPTION_FLAGS, NO_DOMINANT_RISK, PRIORITIES,
    PRIORITY_FILLERS, RISKS, STRATEGIC_QUESTIONS, STRENGTHS, STRENGTH_FILLERS, VULNERABILITIES,
    VULNERABILITY_FILLERS,
};
use crate::config::{BandThresholds, SelectionLimits};
use crate::context::SignalContext;
use crate::enforcer;
use crate::selector::{generate, pad_with_fillers, select_texts, select_top};
use crate::state::SystemState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskItem {
    pub title: String,
    pub driver: String,
    pub impact: String,
    pub severity: StateBand,
}

impl RiskItem {
    pub fn from_template(template: &RiskTemplate, severity: StateBand) -> Self {
        Self {
            title: template.title.to_string(),
            driver: template.driver.to_string(),
            impact: template.impact.to_string(),
            severity,
        }
    }

    /// Placeholder used when no risk concern triggers.
    pub fn no_dominant_risk() -> Self {
        Self::from_template(&NO_DOMINANT_RISK, StateBand::Stable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicQuestion {
    pub question: String,
    pub answer: String,
}

impl From<QuestionTemplate> for StrategicQuestion {
    fn from(template: QuestionTemplate) -> Self {
        Self {
            question: template.question.to_string(),
            answer: template.answer.to_string(),
        }
    }
}

/// Qualitative output of the classification path. Contains no digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    pub system_state: SystemState,
    pub observations: Vec<String>,
    pub risks: Vec<RiskItem>,
    pub attention: Vec<String>,
    pub assumption_flags: Vec<String>,
    pub strategic_questions: Vec<StrategicQuestion>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    thresholds: BandThresholds,
}

impl Classifier {
    pub fn new(thresholds: BandThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, current: &MetricSnapshot, baseline: &MetricSnapshot) -> ClassificationReport {
        let ctx = SignalContext::new(&self.thresholds, current, baseline);
        debug!(
            financial = ctx.state.financial.as_str(),
            operational = ctx.state.operational.as_str(),
            execution = ctx.state.execution.as_str(),
            growth = ?ctx.bands.growth,
            "Composed system state"
        );

        let (assumption_flags, strategic_questions) = if ctx.is_nominal() {
            debug!("Nominal state, suppressing assumption flags and strategic questions");
            (Vec::new(), Vec::new())
        } else {
            (
                owned(select_texts(ASSUMPTION_FLAGS, &ctx, SelectionLimits::ASSUMPTION_FLAGS)),
                select_texts(STRATEGIC_QUESTIONS, &ctx, SelectionLimits::STRATEGIC_QUESTIONS)
                    .into_iter()
                    .map(StrategicQuestion::from)
                    .collect(),
            )
        };

        let report = ClassificationReport {
            system_state: ctx.state,
            observations: owned(compose_observations(&ctx)),
            risks: select_risks(&ctx),
            attention: owned(compose_attention(&ctx)),
            assumption_flags,
            strategic_questions,
        };
        debug!(
            observations = report.observations.len(),
            risks = report.risks.len(),
            attention = report.attention.len(),
            assumption_flags = report.assumption_flags.len(),
            strategic_questions = report.strategic_questions.len(),
            "Classification complete"
        );

        enforcer::enforce(report)
    }
}

/// Classify with the standard thresholds.
pub fn classify(current: &MetricSnapshot, baseline: &MetricSnapshot) -> ClassificationReport {
    Classifier::default().classify(current, baseline)
}

fn owned(texts: Vec<&'static str>) -> Vec<String> {
    texts.into_iter().map(str::to_string).collect()
}

fn select_risks(ctx: &SignalContext<'_>) -> Vec<RiskItem> {
    let picked = select_top(generate(RISKS, ctx), SelectionLimits::RISKS.max);
    if picked.is_empty() {
        return vec![RiskItem::no_dominant_risk()];
    }
    picked
        .iter()
        .map(|c| RiskItem::from_template(&c.text, RiskTemplate::severity_for(c.score)))
        .collect()
}

/// Stressed systems lead with vulnerabilities, everything else with strengths.
fn compose_observations(ctx: &SignalContext<'_>) -> Vec<&'static str> {
    let per_family = SelectionLimits::OBSERVATIONS_PER_FAMILY;
    let strengths = select_texts(STRENGTHS, ctx, SelectionLimits::STRENGTHS);
    let vulnerabilities = select_texts(VULNERABILITIES, ctx, SelectionLimits::VULNERABILITIES);

    let stressed = ctx.state.worst().rank() >= StateBand::Elevated.rank();
    let (lead, trail, fillers) = if stressed {
        (vulnerabilities, strengths, VULNERABILITY_FILLERS)
    } else {
        (strengths, vulnerabilities, STRENGTH_FILLERS)
    };

    let mut observations: Vec<&'static str> = lead.into_iter().take(per_family).collect();
    observations.extend(trail.into_iter().take(per_family));
    pad_with_fillers(&mut observations, SelectionLimits::OBSERVATIONS.min, fillers);
    observations
}

fn compose_attention(ctx: &SignalContext<'_>) -> Vec<&'static str> {
    let mut priorities = select_texts(PRIORITIES, ctx, SelectionLimits::PRIORITIES);
    pad_with_fillers(&mut priorities, SelectionLimits::PRIORITIES.min, PRIORITY_FILLERS);
    priorities.truncate(SelectionLimits::ATTENTION.max);
    priorities
}
