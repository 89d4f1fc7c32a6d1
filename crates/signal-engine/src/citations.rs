//! Citation Builder
//!
//! The only path by which a number enters quantified prose: `cite` records the
//! formatted value and hands back the exact string to embed.

use regex::Regex;
use scenario_core::Citation;

lazy_static::lazy_static! {
    static ref NUMERIC_TOKEN: Regex =
        Regex::new(r"[-+]?\$?\d+(?:\.\d+)?(?:/100|[KMB%])?").expect("numeric token pattern is valid");
}

/// Formatted numbers in `text`, in order of appearance.
pub fn numeric_tokens(text: &str) -> Vec<&str> {
    NUMERIC_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationSet {
    citations: Vec<Citation>,
}

impl CitationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `label` and return it for interpolation.
    pub fn cite(&mut self, label: &str, value: String) -> String {
        let exists = self
            .citations
            .iter()
            .any(|c| c.label == label && c.value == value);
        if !exists {
            self.citations.push(Citation {
                label: label.to_string(),
                value: value.clone(),
            });
        }
        value
    }

    pub fn into_vec(self) -> Vec<Citation> {
        self.citations
    }
}

/// True when every number in `text` appears among the numbers of `citations`.
pub fn is_backed_by(text: &str, citations: &[Citation]) -> bool {
    let cited: Vec<&str> = citations
        .iter()
        .flat_map(|c| numeric_tokens(&c.value))
        .collect();
    numeric_tokens(text).iter().all(|token| cited.contains(token))
}
