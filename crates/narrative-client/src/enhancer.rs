use std::sync::Arc;
use std::time::Duration;

use scenario_core::{NarrativeBlock, NarrativeOutput, NarrativeSource, SystemAnalysisSnapshot};
use signal_engine::RenderMode;

use crate::client::OpenAiNarrativeClient;
use crate::error::{NarrativeError, NarrativeResult};
use crate::provider::{EnhancementRequest, NarrativeProvider};
use crate::validation::validate_response;
use crate::NarrativeConfig;

/// Optional rewrite of deterministic narrative through an external service.
///
/// Either every quantified block is enhanced and validated, or the
/// deterministic output is returned untouched.
#[derive(Clone)]
pub struct NarrativeEnhancer {
    provider: Option<Arc<dyn NarrativeProvider>>,
    timeout: Duration,
}

impl NarrativeEnhancer {
    pub fn new(provider: Arc<dyn NarrativeProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
        }
    }

    /// Build from config, falling back to a disabled enhancer if the client
    /// cannot be constructed.
    pub fn from_config(config: &NarrativeConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        match OpenAiNarrativeClient::new(config) {
            Ok(client) => Self::new(Arc::new(client), config.timeout),
            Err(e) => {
                tracing::warn!("Narrative enhancement unavailable ({}), using deterministic output", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn enhance(
        &self,
        deterministic: NarrativeOutput,
        current: &SystemAnalysisSnapshot,
        baseline: Option<&SystemAnalysisSnapshot>,
    ) -> NarrativeOutput {
        let Some(provider) = self.provider.as_deref() else {
            return deterministic;
        };

        let attempt = tokio::time::timeout(
            self.timeout,
            enhance_blocks(provider, &deterministic.blocks, current, baseline),
        )
        .await
        .unwrap_or(Err(NarrativeError::Timeout));

        match attempt {
            Ok(blocks) => {
                tracing::debug!(
                    backend = provider.backend_name(),
                    blocks = blocks.len(),
                    "Narrative enhanced"
                );
                NarrativeOutput {
                    source: NarrativeSource::OpenAi,
                    blocks,
                }
            }
            Err(e) => {
                tracing::warn!(
                    backend = provider.backend_name(),
                    "Narrative enhancement failed ({}), falling back to deterministic output",
                    e
                );
                deterministic
            }
        }
    }
}

async fn enhance_blocks(
    provider: &dyn NarrativeProvider,
    blocks: &[NarrativeBlock],
    current: &SystemAnalysisSnapshot,
    baseline: Option<&SystemAnalysisSnapshot>,
) -> NarrativeResult<Vec<NarrativeBlock>> {
    let mut enhanced = Vec::with_capacity(blocks.len());
    for block in blocks {
        if RenderMode::of(block) != RenderMode::Quantified {
            enhanced.push(block.clone());
            continue;
        }

        let request = EnhancementRequest::for_block(block, current, baseline);
        let response = provider.enhance_block(&request).await?;
        validate_response(&response, block)?;

        enhanced.push(NarrativeBlock {
            headline: response.headline.trim().to_string(),
            body: response.answer.trim().to_string(),
            ..block.clone()
        });
    }
    Ok(enhanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NarrativeResponse;
    use async_trait::async_trait;
    use scenario_core::{
        Citation, ConfidenceScore, FindingSeverity, PercentileTriple, RiskClassification,
        RiskProfile, SimulationSummary,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn analysis() -> SystemAnalysisSnapshot {
        let triple = PercentileTriple {
            p10: 1.0,
            p50: 2.0,
            p90: 3.0,
        };
        SystemAnalysisSnapshot {
            simulation: SimulationSummary {
                iterations: 1_000,
                horizon_months: 24,
                survival_rate: 0.8,
                arr: triple,
                cash: triple,
                runway: triple,
            },
            risk_profile: RiskProfile {
                classification: RiskClassification::Moderate,
                value_at_risk: 100_000.0,
                tail_risk_score: 40.0,
                burn_fragility_index: 35.0,
                volatility_index: 30.0,
                drivers: Vec::new(),
            },
            sensitivity: Vec::new(),
            valuation: None,
            confidence: ConfidenceScore {
                score: 60.0,
                drivers: Vec::new(),
            },
        }
    }

    fn quantified(id: &str, value: &str) -> NarrativeBlock {
        NarrativeBlock {
            id: id.to_string(),
            category: "runway".to_string(),
            severity: Some(FindingSeverity::Neutral),
            headline: "Runway is adequate".to_string(),
            body: format!("Median runway is {value}."),
            citations: vec![Citation {
                label: "Runway P50".to_string(),
                value: value.to_string(),
            }],
        }
    }

    fn qualitative() -> NarrativeBlock {
        NarrativeBlock {
            id: "report-attention".to_string(),
            category: "attention".to_string(),
            severity: None,
            headline: "Where to focus".to_string(),
            body: "Keep reviewing runway and burn against plan every month.".to_string(),
            citations: Vec::new(),
        }
    }

    fn deterministic() -> NarrativeOutput {
        NarrativeOutput::deterministic(vec![
            quantified("finding-runway", "20 months"),
            qualitative(),
            quantified("finding-runway-downside", "14 months"),
        ])
    }

    /// Restates the first citation faithfully.
    struct FaithfulProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NarrativeProvider for FaithfulProvider {
        async fn enhance_block(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let value = &request.block.citations[0].value;
            Ok(NarrativeResponse {
                headline: "Runway leaves room to execute".to_string(),
                answer: format!("The plan funds {value} of operations. That is enough to reach the next milestone."),
                key_metrics: vec![value.clone()],
                drivers: vec!["Stable burn".to_string()],
                confidence: "medium".to_string(),
            })
        }

        fn backend_name(&self) -> &'static str {
            "faithful"
        }
    }

    /// Changes the figure it was given.
    struct TamperingProvider;

    #[async_trait]
    impl NarrativeProvider for TamperingProvider {
        async fn enhance_block(&self, _request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse> {
            Ok(NarrativeResponse {
                headline: "Runway is longer than it looks".to_string(),
                answer: "The plan funds 30 months of operations. That is plenty.".to_string(),
                key_metrics: vec!["30 months".to_string()],
                drivers: Vec::new(),
                confidence: "high".to_string(),
            })
        }

        fn backend_name(&self) -> &'static str {
            "tampering"
        }
    }

    /// Fails once it has served `healthy` blocks.
    struct FlakyProvider {
        healthy: usize,
        inner: FaithfulProvider,
    }

    #[async_trait]
    impl NarrativeProvider for FlakyProvider {
        async fn enhance_block(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse> {
            if self.inner.calls.load(Ordering::SeqCst) >= self.healthy {
                return Err(NarrativeError::ServiceUnavailable("Status: 503".to_string()));
            }
            self.inner.enhance_block(request).await
        }

        fn backend_name(&self) -> &'static str {
            "flaky"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl NarrativeProvider for SlowProvider {
        async fn enhance_block(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            FaithfulProvider {
                calls: AtomicUsize::new(0),
            }
            .enhance_block(request)
            .await
        }

        fn backend_name(&self) -> &'static str {
            "slow"
        }
    }

    /// Returns a confidence outside the allowed set.
    struct OffSchemaProvider;

    #[async_trait]
    impl NarrativeProvider for OffSchemaProvider {
        async fn enhance_block(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse> {
            let mut response = FaithfulProvider {
                calls: AtomicUsize::new(0),
            }
            .enhance_block(request)
            .await?;
            response.confidence = "certain".to_string();
            Ok(response)
        }

        fn backend_name(&self) -> &'static str {
            "off-schema"
        }
    }

    #[tokio::test]
    async fn test_disabled_returns_deterministic() {
        let enhancer = NarrativeEnhancer::disabled();
        assert!(!enhancer.is_enabled());
        let output = enhancer.enhance(deterministic(), &analysis(), None).await;
        assert_eq!(output, deterministic());
    }

    #[tokio::test]
    async fn test_disabled_config_builds_disabled_enhancer() {
        let enhancer = NarrativeEnhancer::from_config(&NarrativeConfig {
            enabled: false,
            api_url: "http://localhost:9999".to_string(),
            api_key: None,
            model: "test".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(!enhancer.is_enabled());
    }

    #[tokio::test]
    async fn test_successful_enhancement_keeps_identity_and_citations() {
        let provider = Arc::new(FaithfulProvider {
            calls: AtomicUsize::new(0),
        });
        let enhancer = NarrativeEnhancer::new(provider.clone(), Duration::from_secs(2));
        let original = deterministic();
        let output = enhancer.enhance(original.clone(), &analysis(), None).await;

        assert_eq!(output.source, NarrativeSource::OpenAi);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(output.blocks.len(), original.blocks.len());
        for (enhanced, before) in output.blocks.iter().zip(&original.blocks) {
            assert_eq!(enhanced.id, before.id);
            assert_eq!(enhanced.category, before.category);
            assert_eq!(enhanced.severity, before.severity);
            assert_eq!(enhanced.citations, before.citations);
        }
        assert_eq!(output.blocks[0].headline, "Runway leaves room to execute");
        assert_eq!(output.blocks[1], original.blocks[1]);
    }

    #[tokio::test]
    async fn test_tampered_numbers_fall_back() {
        let enhancer = NarrativeEnhancer::new(Arc::new(TamperingProvider), Duration::from_secs(2));
        let output = enhancer.enhance(deterministic(), &analysis(), None).await;
        assert_eq!(output, deterministic());
    }

    #[tokio::test]
    async fn test_partial_failure_is_never_merged() {
        let provider = FlakyProvider {
            healthy: 1,
            inner: FaithfulProvider {
                calls: AtomicUsize::new(0),
            },
        };
        let enhancer = NarrativeEnhancer::new(Arc::new(provider), Duration::from_secs(2));
        let output = enhancer.enhance(deterministic(), &analysis(), None).await;
        assert_eq!(output.source, NarrativeSource::Deterministic);
        assert_eq!(output, deterministic());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let enhancer = NarrativeEnhancer::new(Arc::new(SlowProvider), Duration::from_millis(50));
        let output = enhancer.enhance(deterministic(), &analysis(), None).await;
        assert_eq!(output, deterministic());
    }

    #[tokio::test]
    async fn test_invalid_schema_falls_back() {
        let enhancer = NarrativeEnhancer::new(Arc::new(OffSchemaProvider), Duration::from_secs(2));
        let output = enhancer.enhance(deterministic(), &analysis(), Some(&analysis())).await;
        assert_eq!(output, deterministic());
    }

    #[test]
    fn test_request_compares_only_with_baseline() {
        let block = quantified("finding-runway", "20 months");
        let current = analysis();
        let single = EnhancementRequest::for_block(&block, &current, None);
        assert!(!single.compare);
        let compared = EnhancementRequest::for_block(&block, &current, Some(&current));
        assert!(compared.compare);
        assert!(compared.question.contains("baseline"));
    }
}
