use serde::{Deserialize, Serialize};

use crate::types::FindingSeverity;

/// A literal value backing a number that appears in prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub label: String,
    pub value: String,
}

/// Presentation-ready unit of narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeBlock {
    pub id: String,
    pub category: String,
    /// Only set for quantified blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<FindingSeverity>,
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeSource {
    #[serde(rename = "deterministic")]
    Deterministic,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeOutput {
    pub source: NarrativeSource,
    pub blocks: Vec<NarrativeBlock>,
}

impl NarrativeOutput {
    pub fn deterministic(blocks: Vec<NarrativeBlock>) -> Self {
        Self {
            source: NarrativeSource::Deterministic,
            blocks,
        }
    }
}
