use async_trait::async_trait;
use scenario_core::{NarrativeBlock, SystemAnalysisSnapshot};
use serde::{Deserialize, Serialize};

use crate::error::NarrativeResult;

/// Context sent with each quantified block.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancementRequest<'a> {
    pub question: String,
    pub block: &'a NarrativeBlock,
    pub current: &'a SystemAnalysisSnapshot,
    pub baseline: Option<&'a SystemAnalysisSnapshot>,
    pub compare: bool,
}

impl<'a> EnhancementRequest<'a> {
    pub fn for_block(
        block: &'a NarrativeBlock,
        current: &'a SystemAnalysisSnapshot,
        baseline: Option<&'a SystemAnalysisSnapshot>,
    ) -> Self {
        let subject = block.category.replace('_', " ");
        let question = if baseline.is_some() {
            format!("How has the {subject} picture changed against the baseline, and what does it mean for the plan?")
        } else {
            format!("What does the {subject} finding mean for the plan?")
        };
        Self {
            question,
            block,
            current,
            baseline,
            compare: baseline.is_some(),
        }
    }
}

/// Structured reply expected from the service. Unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NarrativeResponse {
    pub headline: String,
    pub answer: String,
    pub key_metrics: Vec<String>,
    pub drivers: Vec<String>,
    pub confidence: String,
}

/// Backend-agnostic interface for narrative enhancement.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    async fn enhance_block(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse>;

    fn backend_name(&self) -> &'static str;
}
