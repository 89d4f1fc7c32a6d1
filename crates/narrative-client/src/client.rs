use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, NarrativeResult};
use crate::provider::{EnhancementRequest, NarrativeProvider, NarrativeResponse};
use crate::NarrativeConfig;

const SYSTEM_PROMPT: &str = "You rewrite one financial finding for a planning audience. \
Hard rules: never alter, round, add or remove any number; every figure you mention must appear \
verbatim in the block's citations; do not change citations. \
Reply with a single JSON object and nothing else, with exactly these fields: \
headline (at most twelve words), answer (two to four sentences), key_metrics (array of cited values), \
drivers (array of short phrases), confidence (one of high, medium, low).";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// OpenAI-compatible chat completions backend.
#[derive(Clone)]
pub struct OpenAiNarrativeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiNarrativeClient {
    pub fn new(config: &NarrativeConfig) -> NarrativeResult<Self> {
        if !config.enabled {
            return Err(NarrativeError::Disabled);
        }
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| NarrativeError::ServiceUnavailable("NARRATIVE_API_KEY is not set".to_string()))?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn build_request(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<ChatCompletionRequest<'_>> {
        Ok(ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: serde_json::to_string(request)?,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: 0.2,
        })
    }
}

fn parse_completion(body: ChatCompletionResponse) -> NarrativeResult<NarrativeResponse> {
    let content = body
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| NarrativeError::InvalidResponse("no choices returned".to_string()))?;
    Ok(serde_json::from_str::<NarrativeResponse>(content.trim())?)
}

#[async_trait]
impl NarrativeProvider for OpenAiNarrativeClient {
    async fn enhance_block(&self, request: &EnhancementRequest<'_>) -> NarrativeResult<NarrativeResponse> {
        let payload = self.build_request(request)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NarrativeError::ServiceUnavailable(format!(
                "Status: {}",
                response.status()
            )));
        }

        let body = response.json::<ChatCompletionResponse>().await?;
        parse_completion(body)
    }

    fn backend_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> NarrativeConfig {
        NarrativeConfig {
            enabled: true,
            api_url: "http://localhost:9999/v1/".to_string(),
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_new_requires_enabled_and_key() {
        let disabled = NarrativeConfig {
            enabled: false,
            ..config()
        };
        assert!(matches!(
            OpenAiNarrativeClient::new(&disabled),
            Err(NarrativeError::Disabled)
        ));

        let keyless = NarrativeConfig {
            api_key: None,
            ..config()
        };
        assert!(OpenAiNarrativeClient::new(&keyless).is_err());

        let client = OpenAiNarrativeClient::new(&config()).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v1");
        assert_eq!(client.backend_name(), "openai");
    }

    #[test]
    fn test_parse_completion() {
        let body: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"headline\":\"Runway holds\",\"answer\":\"One. Two.\",\"key_metrics\":[],\"drivers\":[],\"confidence\":\"low\"}"
                }
            }]
        }))
        .unwrap();
        let parsed = parse_completion(body).unwrap();
        assert_eq!(parsed.headline, "Runway holds");
        assert_eq!(parsed.confidence, "low");
    }

    #[test]
    fn test_parse_completion_rejects_prose_and_empty() {
        let prose: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Runway looks fine." } }]
        }))
        .unwrap();
        assert!(matches!(parse_completion(prose), Err(NarrativeError::Serialization(_))));

        let empty = ChatCompletionResponse { choices: Vec::new() };
        assert!(matches!(parse_completion(empty), Err(NarrativeError::InvalidResponse(_))));
    }
}
