//! Dummy provider — replies with a canned body, no network, no key.
//! Used for tests and keyless local runs (`provider = "dummy"` in config).

use serde_json::Value;

use crate::swot::AnalysisError;

#[derive(Debug, Clone)]
pub struct DummyProvider {
    reply: Result<String, String>,
}

impl DummyProvider {
    /// A provider that answers every topic with a fixed four-category body.
    pub fn new() -> Self {
        Self::with_body(
            r#"{
  "strengths": ["Responds instantly", "Works offline", "Costs nothing"],
  "weaknesses": ["Ignores the topic entirely", "Always says the same thing"],
  "opportunities": ["Swap in a real provider via config"],
  "threats": ["Being mistaken for actual analysis"]
}"#,
        )
    }

    /// Reply with exactly `body` — tests drive the parser/validator with this.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            reply: Ok(body.into()),
        }
    }

    /// Fail every call with a request error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
        }
    }

    pub async fn generate_text(
        &self,
        _prompt: &str,
        _schema: &Value,
    ) -> Result<String, AnalysisError> {
        match &self.reply {
            Ok(body) => Ok(body.clone()),
            Err(msg) => Err(AnalysisError::Request(msg.clone())),
        }
    }
}

impl Default for DummyProvider {
    fn default() -> Self {
        Self::new()
    }
}
