//! OpenAI API client implementation
//!
//! Implements the LlmClient trait on top of the Responses API, including
//! strict structured output via `text.format`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the configured environment variable and
    /// resolves the model (env override first).
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(provider = %config.provider, base_url = %config.base_url, "from_config: called");
        let api_key = config
            .api_key()
            .map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.resolved_model(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Model this client sends requests for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request body for the Responses API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut input = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        input.extend(request.messages.iter().map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        }));

        let mut body = serde_json::json!({
            "model": self.model,
            "input": input,
            "max_output_tokens": request.max_tokens.min(self.max_tokens),
        });

        if let Some(format) = &request.response_format {
            debug!(name = %format.name, "build_request_body: structured output");
            body["text"] = serde_json::json!({
                "format": {
                    "type": "json_schema",
                    "name": format.name,
                    "schema": format.schema,
                    "strict": format.strict,
                }
            });
        }

        body
    }

    /// Parse the Responses API payload
    ///
    /// Mirrors the SDK's `output_text`: the concatenation of every
    /// `output_text` part across message outputs.
    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(status = ?api_response.status, outputs = api_response.output.len(), "parse_response: called");
        let mut text = String::new();
        let mut refused = false;

        for output in api_response.output.into_iter().filter(|o| o.kind == "message") {
            for part in output.content {
                match part.kind.as_str() {
                    "output_text" => text.push_str(part.text.as_deref().unwrap_or_default()),
                    "refusal" => {
                        warn!(refusal = ?part.refusal, "parse_response: model refused");
                        refused = true;
                    }
                    other => debug!(%other, "parse_response: skipping content part"),
                }
            }
        }

        let stop_reason = if refused {
            StopReason::Refusal
        } else {
            StopReason::from_incomplete_reason(api_response.incomplete_details.as_ref().and_then(|d| d.reason.as_deref()))
        };

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            })
            .unwrap_or_default();

        CompletionResponse {
            content: if text.is_empty() { None } else { Some(text) },
            stop_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/responses", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("complete: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        debug!("complete: success");
        let api_response: OpenAIResponse = response.json().await?;
        Ok(self.parse_response(api_response))
    }
}

// OpenAI Responses API types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    status: Option<String>,
    #[serde(default)]
    output: Vec<OpenAIOutput>,
    incomplete_details: Option<OpenAIIncompleteDetails>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIOutput {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OpenAIContentPart>,
}

#[derive(Debug, Deserialize)]
struct OpenAIContentPart {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIIncompleteDetails {
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;
    use crate::schema::trip_plan_json_schema;

    fn client(max_tokens: u32) -> OpenAIClient {
        OpenAIClient {
            model: "gpt-4o".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let request = CompletionRequest {
            system_prompt: "You are helpful".to_string(),
            messages: vec![Message::user("Hello")],
            response_format: None,
            max_tokens: 1000,
        };

        let body = client(8192).build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_output_tokens"], 1000);
        assert_eq!(body["input"][0]["role"], "system");
        assert_eq!(body["input"][0]["content"], "You are helpful");
        assert_eq!(body["input"][1]["role"], "user");
        assert!(body.get("text").is_none());
    }

    #[test]
    fn test_build_request_body_structured_output() {
        let request = CompletionRequest {
            system_prompt: "plan".to_string(),
            messages: vec![Message::user("{}")],
            response_format: Some(trip_plan_json_schema()),
            max_tokens: 1000,
        };

        let body = client(8192).build_request_body(&request);

        assert_eq!(body["text"]["format"]["type"], "json_schema");
        assert_eq!(body["text"]["format"]["name"], "tripPlanV3");
        assert_eq!(body["text"]["format"]["strict"], true);
        assert_eq!(body["text"]["format"]["schema"]["additionalProperties"], false);
    }

    #[test]
    fn test_max_tokens_capped() {
        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            response_format: None,
            max_tokens: 5000,
        };

        let body = client(1000).build_request_body(&request);
        assert_eq!(body["max_output_tokens"], 1000);
    }

    #[test]
    fn test_parse_response_concatenates_output_text() {
        let api: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "status": "completed",
            "output": [
                { "type": "reasoning", "content": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "{\"a\":" },
                    { "type": "output_text", "text": "1}" }
                ]}
            ],
            "usage": { "input_tokens": 10, "output_tokens": 4 }
        }))
        .unwrap();

        let response = client(1000).parse_response(api);

        assert_eq!(response.content.as_deref(), Some("{\"a\":1}"));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total(), 14);
    }

    #[test]
    fn test_parse_response_without_text() {
        let api: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "status": "incomplete",
            "output": [],
            "incomplete_details": { "reason": "max_output_tokens" }
        }))
        .unwrap();

        let response = client(1000).parse_response(api);

        assert!(response.content.is_none());
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
    }

    #[test]
    fn test_parse_response_refusal() {
        let api: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "output": [
                { "type": "message", "content": [ { "type": "refusal", "refusal": "no" } ] }
            ]
        }))
        .unwrap();

        let response = client(1000).parse_response(api);
        assert!(response.content.is_none());
        assert_eq!(response.stop_reason, StopReason::Refusal);
    }
}
