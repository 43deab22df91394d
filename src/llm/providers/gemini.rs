//! Gemini `generateContent` provider.
//!
//! One round-trip per call: POST the prompt plus a `generationConfig` carrying
//! the JSON response schema, extract the first candidate's text. All Gemini
//! wire types are private to this module — callers never see them.
//!
//! The API key is captured at construction (from `GEMINI_API_KEY`) but only
//! checked per request, so a keyless process still boots and serves the UI.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::swot::AnalysisError;

const API_KEY_HEADER: &str = "x-goog-api-key";

// ── Public provider ───────────────────────────────────────────────────────────

/// Adapter for the Gemini REST `models/{model}:generateContent` endpoint.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Build a provider from config values and an optional API key.
    ///
    /// `api_key` may be `None`; requests then fail with
    /// [`AnalysisError::MissingApiKey`] before any network I/O.
    pub fn new(config: &GeminiConfig, api_key: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` constrained by `schema` and return the reply text.
    pub async fn generate_text(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, AnalysisError> {
        let key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model
        );

        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Gemini HTTP request failed (transport)");
                AnalysisError::Request(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to deserialize Gemini response envelope");
                AnalysisError::Request(format!("failed to parse response body: {e}"))
            })?;

        let text = parsed
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AnalysisError::Request("empty or missing content in response".into()))?;

        debug!(reply_len = text.len(), "received Gemini reply");
        Ok(text)
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

// Error envelope returned by the Gemini API on non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AnalysisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(&body) {
        let api_status = env
            .error
            .status
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        format!("HTTP {status}{api_status}: {}", env.error.message)
    } else {
        format!("HTTP {status}: {body}")
    };

    error!(%status, %message, "Gemini request returned HTTP error");
    Err(AnalysisError::Request(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swot;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-2.5-flash".into(),
            temperature: 0.2,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let provider = GeminiProvider::new(&config(), None).unwrap();
        let err = provider
            .generate_text("prompt", &swot::response_schema())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingApiKey));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn request_payload_wire_shape() {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".into(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: "application/json".into(),
                response_schema: swot::response_schema(),
            },
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(v["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn response_envelope_extracts_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":1}"}],"role":"model"},"finishReason":"STOP"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[test]
    fn error_envelope_parses() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let env: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(env.error.message, "quota exceeded");
        assert_eq!(env.error.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
    }
}
