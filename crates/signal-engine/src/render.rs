//! Narrative Renderer
//!
//! Quantified blocks carry citations and literal numbers. Qualitative blocks
//! come from a classification report and never contain a digit.

use scenario_core::{FindingSeverity, NarrativeBlock, NarrativeOutput};
use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationReport;
use crate::enforcer::strip_digits;
use crate::findings::{FindingCategory, QuantifiedFinding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Quantified,
    Qualitative,
}

impl RenderMode {
    /// Quantified blocks are the only ones that carry a severity.
    pub fn of(block: &NarrativeBlock) -> Self {
        if block.severity.is_some() {
            RenderMode::Quantified
        } else {
            RenderMode::Qualitative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Quantified => "quantified",
            RenderMode::Qualitative => "qualitative",
        }
    }
}

pub fn headline(category: FindingCategory, severity: FindingSeverity) -> &'static str {
    use FindingCategory as C;
    use FindingSeverity::{Critical, Neutral, Positive, Warning};

    match (category, severity) {
        (C::Survival, Positive) => "Survival odds are strong",
        (C::Survival, Neutral) => "Survival odds are workable",
        (C::Survival, Warning) => "Survival odds are thin",
        (C::Survival, Critical) => "Survival is at risk",

        (C::Runway, Positive) => "Runway is comfortable",
        (C::Runway, Neutral) => "Runway is adequate",
        (C::Runway, Warning) => "Runway is tightening",
        (C::Runway, Critical) => "Runway is critically short",

        (C::Cash, Positive) => "Cash reserves are resilient",
        (C::Cash, Neutral) => "Cash outcomes are steady",
        (C::Cash, Warning) => "Cash outcomes are volatile",
        (C::Cash, Critical) => "Cash could run out",

        (C::Arr, Positive) => "Revenue outlook is dependable",
        (C::Arr, Neutral) => "Revenue outlook is reasonable",
        (C::Arr, Warning) => "Revenue outlook is uncertain",
        (C::Arr, Critical) => "Revenue downside is severe",

        (C::RiskProfile, Positive) => "Risk profile is low",
        (C::RiskProfile, Neutral) => "Risk profile is moderate",
        (C::RiskProfile, Warning) => "Risk profile is high",
        (C::RiskProfile, Critical) => "Risk profile is critical",

        (C::BurnFragility, Positive) => "Burn is resilient",
        (C::BurnFragility, Neutral) => "Burn has some slack",
        (C::BurnFragility, Warning) => "Burn is fragile",
        (C::BurnFragility, Critical) => "Burn leaves no tolerance",

        (C::TopLever, Positive) => "A strong lever is available",
        (C::TopLever, Neutral) => "Primary lever identified",
        (C::TopLever, Warning) => "Primary lever cuts both ways",
        (C::TopLever, Critical) => "Plan hinges on one lever",

        (C::Valuation, Positive) => "Valuation range is tight",
        (C::Valuation, Neutral) => "Valuation range is moderate",
        (C::Valuation, Warning) => "Valuation range is wide",
        (C::Valuation, Critical) => "Valuation is poorly anchored",

        (C::Confidence, Positive) => "Findings rest on solid inputs",
        (C::Confidence, Neutral) => "Findings are directionally sound",
        (C::Confidence, Warning) => "Findings are provisional",
        (C::Confidence, Critical) => "Findings need better inputs",
    }
}

/// Deterministic quantified narrative, one block per finding.
pub fn render_findings(findings: &[QuantifiedFinding]) -> NarrativeOutput {
    let blocks = findings
        .iter()
        .map(|finding| NarrativeBlock {
            id: finding.id.clone(),
            category: finding.category.as_str().to_string(),
            severity: Some(finding.severity),
            headline: headline(finding.category, finding.severity).to_string(),
            body: finding.narrative.clone(),
            citations: finding.citations.clone(),
        })
        .collect();
    NarrativeOutput::deterministic(blocks)
}

fn qualitative_block(category: &str, headline: &str, sentences: Vec<String>) -> Option<NarrativeBlock> {
    if sentences.is_empty() {
        return None;
    }
    Some(NarrativeBlock {
        id: format!("report-{category}"),
        category: category.to_string(),
        severity: None,
        headline: headline.to_string(),
        body: strip_digits(&sentences.join(" ")),
        citations: Vec::new(),
    })
}

fn sentence(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(['.', '?', '!']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Qualitative blocks for a classification report; empty families are skipped.
pub fn render_report(report: &ClassificationReport) -> Vec<NarrativeBlock> {
    let risks = report
        .risks
        .iter()
        .map(|r| format!("{}: {} {}", r.title, sentence(&r.driver), sentence(&r.impact)))
        .collect();
    let questions = report
        .strategic_questions
        .iter()
        .map(|q| format!("{} {}", sentence(&q.question), sentence(&q.answer)))
        .collect();

    [
        qualitative_block(
            "observations",
            "Key observations",
            report.observations.iter().map(|t| sentence(t)).collect(),
        ),
        qualitative_block("risks", "Risk outlook", risks),
        qualitative_block(
            "attention",
            "Where to focus",
            report.attention.iter().map(|t| sentence(t)).collect(),
        ),
        qualitative_block(
            "assumptions",
            "Assumptions to revisit",
            report.assumption_flags.iter().map(|t| sentence(t)).collect(),
        ),
        qualitative_block("questions", "Strategic questions", questions),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::candidates::fixtures;
    use crate::findings::{extract_findings, fixtures::healthy_analysis};
    use scenario_core::{MetricSnapshot, NarrativeSource};

    #[test]
    fn test_headlines_are_digit_free() {
        let severities = [
            FindingSeverity::Positive,
            FindingSeverity::Neutral,
            FindingSeverity::Warning,
            FindingSeverity::Critical,
        ];
        for category in FindingCategory::ALL {
            for severity in severities {
                let text = headline(category, severity);
                assert!(!text.chars().any(|c| c.is_ascii_digit()), "{text}");
                assert!(text.split_whitespace().count() <= 12);
            }
        }
    }

    #[test]
    fn test_render_findings_copies_citations() {
        let findings = extract_findings(&healthy_analysis());
        let output = render_findings(&findings);
        assert_eq!(output.source, NarrativeSource::Deterministic);
        assert_eq!(output.blocks.len(), findings.len());
        for (block, finding) in output.blocks.iter().zip(&findings) {
            assert_eq!(block.id, finding.id);
            assert_eq!(block.body, finding.narrative);
            assert_eq!(block.citations, finding.citations);
            assert_eq!(RenderMode::of(block), RenderMode::Quantified);
        }
    }

    #[test]
    fn test_nominal_report_skips_empty_families() {
        let snapshot = MetricSnapshot::nominal();
        let blocks = render_report(&classify(&snapshot, &snapshot));
        let categories: Vec<_> = blocks.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, vec!["observations", "risks", "attention"]);
    }

    #[test]
    fn test_stress_report_blocks_are_qualitative() {
        let (current, baseline) = (fixtures::stressed(), fixtures::baseline());
        let blocks = render_report(&classify(&current, &baseline));
        assert_eq!(blocks.len(), 5);
        for block in &blocks {
            assert_eq!(RenderMode::of(block), RenderMode::Qualitative);
            assert!(block.citations.is_empty());
            assert!(!block.body.chars().any(|c| c.is_numeric()));
            assert!(!block.headline.chars().any(|c| c.is_numeric()));
        }
    }

    #[test]
    fn test_sentence_terminates_once() {
        assert_eq!(sentence("Done."), "Done.");
        assert_eq!(sentence("Is it?"), "Is it?");
        assert_eq!(sentence("Open ended "), "Open ended.");
    }
}
