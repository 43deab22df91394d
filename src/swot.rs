//! SWOT analysis request service.
//!
//! [`generate`] is the one operation: build the schema-constrained prompt,
//! dispatch it to the configured provider, then parse and structurally
//! validate the reply. All-or-nothing — a reply that fails any step yields an
//! [`AnalysisError`], never a partial result.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::llm::SwotProvider;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("failed to generate SWOT analysis: {0}")]
    Request(String),

    #[error("model reply is not valid JSON: {0}")]
    Parse(String),

    #[error("invalid SWOT analysis format received from API: {0}")]
    Format(String),
}

impl AnalysisError {
    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::MissingApiKey => "config",
            AnalysisError::Request(_) => "upstream",
            AnalysisError::Parse(_) | AnalysisError::Format(_) => "invalid_format",
        }
    }
}

// ── Result type ───────────────────────────────────────────────────────────────

/// One SWOT analysis: four ordered lists of bullet points, typically 3–5 each.
///
/// Constructed only by [`parse_and_validate`] — a value of this type has
/// already passed structural validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

const FIELDS: [&str; 4] = ["strengths", "weaknesses", "opportunities", "threats"];

// ── Prompt & schema ───────────────────────────────────────────────────────────

/// Natural-language instruction sent as the user message.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "Generate a concise SWOT analysis for the following company or idea: \
         \"{topic}\". Provide 3-5 bullet points for each category."
    )
}

/// Gemini `responseSchema` constraining the model to the four-field object.
pub fn response_schema() -> Value {
    let category = |what: &str| {
        json!({
            "type": "ARRAY",
            "description": format!("A list of 3-5 {what} for the given topic."),
            "items": { "type": "STRING" },
        })
    };
    json!({
        "type": "OBJECT",
        "properties": {
            "strengths": category("strengths"),
            "weaknesses": category("weaknesses"),
            "opportunities": category("potential opportunities"),
            "threats": category("potential threats"),
        },
        "required": FIELDS,
    })
}

// ── Parsing & validation ──────────────────────────────────────────────────────

/// Parse a raw reply body and check its shape.
///
/// The validation bar is deliberately structural: each of the four fields must
/// be present and array-typed. Element counts are not range-checked against
/// the advertised 3–5.
pub fn parse_and_validate(body: &str) -> Result<SwotAnalysis, AnalysisError> {
    let parsed: Value =
        serde_json::from_str(body.trim()).map_err(|e| AnalysisError::Parse(e.to_string()))?;

    for field in FIELDS {
        let ok = parsed.get(field).map(Value::is_array).unwrap_or(false);
        if !ok {
            return Err(AnalysisError::Format(format!(
                "field '{field}' missing or not an array in: {parsed}"
            )));
        }
    }

    serde_json::from_value(parsed.clone())
        .map_err(|e| AnalysisError::Format(format!("{e} in: {parsed}")))
}

// ── Service entry point ───────────────────────────────────────────────────────

/// Run one analysis round-trip for `topic`.
///
/// The caller is responsible for trimming and rejecting empty input — this
/// function assumes a non-empty topic. One request in, one validated result
/// or one error out; no retries, no caching.
pub async fn generate(provider: &SwotProvider, topic: &str) -> Result<SwotAnalysis, AnalysisError> {
    let prompt = build_prompt(topic);
    let schema = response_schema();

    let body = provider.generate_text(&prompt, &schema).await?;
    debug!(reply_len = body.len(), "provider reply received");

    parse_and_validate(&body)
}
