pub mod client;
pub mod enhancer;
pub mod error;
pub mod provider;
pub mod validation;

pub use client::OpenAiNarrativeClient;
pub use enhancer::NarrativeEnhancer;
pub use error::{NarrativeError, NarrativeResult};
pub use provider::{EnhancementRequest, NarrativeProvider, NarrativeResponse};
pub use validation::validate_response;

use std::time::Duration;

/// Configuration for the optional narrative enhancement service
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Budget for the whole enhancement attempt, not per block
    pub timeout: Duration,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("NARRATIVE_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            api_url: std::env::var("NARRATIVE_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: std::env::var("NARRATIVE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("NARRATIVE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(
                std::env::var("NARRATIVE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8),
            ),
        }
    }
}

impl NarrativeConfig {
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("enabled-ish"));
    }

    #[test]
    fn test_disabled_config() {
        assert!(!NarrativeConfig::disabled().enabled);
    }
}
