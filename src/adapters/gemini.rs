use crate::config::{RelayConfig, API_KEY_VAR};
use crate::domain::model::{GenerateRequest, GenerateResponse};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// `generateContent` client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &RelayConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &RelayConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RelayError::ConfigurationMissing {
                field: API_KEY_VAR.to_string(),
            })?;

        let endpoint = self.endpoint(&request.model);
        tracing::debug!("Making Gemini API request to: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&WireRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini API responded with status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("Gemini API error body: {}", body);
            return Err(RelayError::UpstreamError {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let wire: WireResponse = serde_json::from_str(&body)?;
        Ok(wire.into())
    }
}

/// Gemini wraps failures as `{"error": {"message": ...}}`; anything else is
/// passed on as raw text.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    system_instruction: WireContent<'a>,
    generation_config: WireGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    temperature: f32,
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

impl<'a> From<&'a GenerateRequest> for WireRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            contents: vec![WireContent {
                role: Some("user"),
                parts: vec![WirePart {
                    text: &request.user_text,
                }],
            }],
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart {
                    text: &request.system_instruction,
                }],
            },
            generation_config: WireGenerationConfig {
                temperature: request.temperature,
                response_mime_type: &request.response_mime_type,
                response_schema: &request.response_schema,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireCandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    block_reason: Option<String>,
}

impl WireCandidate {
    fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

impl From<WireResponse> for GenerateResponse {
    fn from(wire: WireResponse) -> Self {
        let candidates = wire
            .candidates
            .iter()
            .filter_map(|candidate| {
                let text = candidate.text();
                if text.trim().is_empty() {
                    tracing::debug!(
                        "Dropping empty candidate (finish reason: {})",
                        candidate.finish_reason.as_deref().unwrap_or("unknown")
                    );
                    None
                } else {
                    Some(text)
                }
            })
            .collect();

        Self {
            candidates,
            block_reason: wire.prompt_feedback.and_then(|feedback| feedback.block_reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
        let config = RelayConfig {
            api_key: api_key.map(str::to_string),
            ..RelayConfig::default()
        }
        .with_api_base(server.url("/v1beta/"));
        GeminiClient::new(&config)
    }

    fn sample_request() -> GenerateRequest {
        prompt::build_request(&RelayConfig::new("unused"), "¿El café deshidrata?")
    }

    #[tokio::test]
    async fn test_generate_sends_expected_payload() {
        let server = MockServer::start();
        let request = sample_request();

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent")
                .header("x-goog-api-key", "test-key")
                .json_body_partial(
                    json!({
                        "contents": [{"role": "user", "parts": [{"text": "¿El café deshidrata?"}]}],
                        "generationConfig": {"responseMimeType": "application/json"}
                    })
                    .to_string(),
                );
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"myth\": \"x\"}"}]},
                    "finishReason": "STOP"
                }]
            }));
        });

        let response = client_for(&server, Some("test-key"))
            .generate(&request)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(response.candidates, vec!["{\"myth\": \"x\"}".to_string()]);
        assert_eq!(response.block_reason, None);
    }

    #[tokio::test]
    async fn test_generate_passes_through_upstream_error() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(403).json_body(json!({
                "error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}
            }));
        });

        let err = client_for(&server, Some("bad-key"))
            .generate(&sample_request())
            .await
            .unwrap_err();

        api_mock.assert();
        match err {
            RelayError::UpstreamError { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_non_json_error_body_is_kept_verbatim() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(503).body("Service Unavailable");
        });

        let err = client_for(&server, Some("k"))
            .generate(&sample_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 503);
        assert!(err.user_friendly_message().contains("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_generate_without_key_makes_no_call() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({}));
        });

        let err = client_for(&server, None)
            .generate(&sample_request())
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::ConfigurationMissing { .. }));
        api_mock.assert_hits(0);
    }

    #[test]
    fn test_wire_response_conversion() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [
                    {"text": "pensando...", "thought": true},
                    {"text": "{\"a\":"},
                    {"text": "1}"}
                ]}},
                {"finishReason": "SAFETY"},
                {"content": {"parts": [{"text": "   "}]}}
            ],
            "promptFeedback": {"blockReason": "OTHER"}
        }))
        .unwrap();

        let response = GenerateResponse::from(wire);
        assert_eq!(response.candidates, vec!["{\"a\":1}".to_string()]);
        assert_eq!(response.block_reason.as_deref(), Some("OTHER"));
    }

    #[test]
    fn test_blocked_prompt_has_no_candidates() {
        let wire: WireResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();

        let response = GenerateResponse::from(wire);
        assert!(response.candidates.is_empty());
        assert_eq!(response.block_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_upstream_message() {
        assert_eq!(
            upstream_message(r#"{"error": {"message": "quota"}}"#),
            "quota"
        );
        assert_eq!(upstream_message(" plain text \n"), "plain text");
        assert_eq!(upstream_message(r#"{"unexpected": true}"#), r#"{"unexpected": true}"#);
    }
}
