//! LLM provider abstraction.
//!
//! `SwotProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency;
//! tests swap in the dummy backend through the same seam.

pub mod providers;

use serde_json::Value;

use crate::config::LlmConfig;
use crate::error::AppError;
use crate::swot::AnalysisError;

use providers::dummy::DummyProvider;
use providers::gemini::GeminiProvider;

/// All available provider backends.
#[derive(Debug, Clone)]
pub enum SwotProvider {
    Gemini(GeminiProvider),
    Dummy(DummyProvider),
}

impl SwotProvider {
    /// Build the provider named in config. `api_key` comes from
    /// `GEMINI_API_KEY` env — never TOML.
    pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<Self, AppError> {
        match config.provider.as_str() {
            "gemini" => Ok(SwotProvider::Gemini(GeminiProvider::new(
                &config.gemini,
                api_key,
            )?)),
            "dummy" => Ok(SwotProvider::Dummy(DummyProvider::new())),
            other => Err(AppError::Config(format!("unknown llm provider: {other}"))),
        }
    }

    /// Send `prompt` constrained by `schema` and return the raw reply text.
    pub async fn generate_text(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, AnalysisError> {
        match self {
            SwotProvider::Gemini(p) => p.generate_text(prompt, schema).await,
            SwotProvider::Dummy(p) => p.generate_text(prompt, schema).await,
        }
    }

    /// Provider name for logs and the health endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            SwotProvider::Gemini(_) => "gemini",
            SwotProvider::Dummy(_) => "dummy",
        }
    }

    /// Model identifier for logs and the health endpoint.
    pub fn model(&self) -> &str {
        match self {
            SwotProvider::Gemini(p) => p.model(),
            SwotProvider::Dummy(_) => "canned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            gemini: GeminiConfig {
                api_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
                model: "gemini-2.5-flash".into(),
                temperature: 0.2,
                timeout_seconds: 60,
            },
        }
    }

    #[test]
    fn builds_named_providers() {
        let gemini = SwotProvider::build(&llm_config("gemini"), Some("k".into())).unwrap();
        assert_eq!(gemini.name(), "gemini");
        assert_eq!(gemini.model(), "gemini-2.5-flash");

        let dummy = SwotProvider::build(&llm_config("dummy"), None).unwrap();
        assert_eq!(dummy.name(), "dummy");
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        let err = SwotProvider::build(&llm_config("claude"), None).unwrap_err();
        assert!(err.to_string().contains("unknown llm provider: claude"));
    }
}
