//! Configuration loading with env-var overrides.
//!
//! Reads an optional TOML file (`config/default.toml` by default) and applies
//! `SWOTGEN_BIND` and `SWOTGEN_LOG_LEVEL` env overrides. The Gemini API key
//! comes from the `GEMINI_API_KEY` env var only — never from TOML. Its absence
//! is not a startup error: the server boots keyless and surfaces the missing
//! credential per request.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

// ── Resolved config ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to, e.g. `127.0.0.1:8080`.
    pub bind: String,
    pub log_level: String,
    pub llm: LlmConfig,
    /// `GEMINI_API_KEY` at startup, if set.
    pub llm_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider backend: `"gemini"` or `"dummy"`.
    pub provider: String,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────
//
// Every field is optional in the file; defaults fill the gaps so an empty
// file (or no file at all) yields a runnable config.

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct RawLlm {
    #[serde(default = "default_provider")]
    provider: String,
    #[serde(default)]
    gemini: RawGemini,
}

#[derive(Debug, Deserialize)]
struct RawGemini {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_provider() -> String {
    "gemini".to_string()
}
fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_timeout_seconds() -> u64 {
    60
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gemini: RawGemini::default(),
        }
    }
}

impl Default for RawGemini {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from the given path, or `config/default.toml`, then apply
/// env-var overrides. If no path is given and `config/default.toml` does not
/// exist, all defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let bind_override = env::var("SWOTGEN_BIND").ok();
    let log_level_override = env::var("SWOTGEN_LOG_LEVEL").ok();
    let api_key = env::var("GEMINI_API_KEY").ok();

    let raw = match config_path {
        Some(path) => read_raw(Path::new(path))?,
        None => {
            let default_path = Path::new("config/default.toml");
            if default_path.exists() {
                read_raw(default_path)?
            } else {
                RawConfig::default()
            }
        }
    };

    Ok(resolve(
        raw,
        bind_override.as_deref(),
        log_level_override.as_deref(),
        api_key,
    ))
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
    api_key: Option<String>,
) -> Result<Config, AppError> {
    let raw = read_raw(path)?;
    Ok(resolve(raw, bind_override, log_level_override, api_key))
}

fn read_raw(path: &Path) -> Result<RawConfig, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))
}

fn resolve(
    raw: RawConfig,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
    api_key: Option<String>,
) -> Config {
    Config {
        bind: bind_override.unwrap_or(&raw.server.bind).to_string(),
        log_level: log_level_override.unwrap_or(&raw.server.log_level).to_string(),
        llm: LlmConfig {
            provider: raw.llm.provider,
            gemini: GeminiConfig {
                api_base_url: raw.llm.gemini.api_base_url,
                model: raw.llm.gemini.model,
                temperature: raw.llm.gemini.temperature,
                timeout_seconds: raw.llm.gemini.timeout_seconds,
            },
        },
        llm_api_key: api_key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn empty_file_yields_defaults() {
        let f = write_config("");
        let cfg = load_from(f.path(), None, None, None).unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:8080");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.gemini.model, "gemini-2.5-flash");
        assert_eq!(cfg.llm.gemini.timeout_seconds, 60);
        assert!(cfg.llm_api_key.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let f = write_config(
            r#"
[server]
bind = "0.0.0.0:9090"
log_level = "debug"

[llm]
provider = "dummy"

[llm.gemini]
model = "gemini-2.0-flash"
temperature = 0.7
"#,
        );
        let cfg = load_from(f.path(), None, None, None).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:9090");
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.llm.provider, "dummy");
        assert_eq!(cfg.llm.gemini.model, "gemini-2.0-flash");
        assert_eq!(cfg.llm.gemini.temperature, 0.7);
        // untouched fields keep defaults
        assert_eq!(cfg.llm.gemini.timeout_seconds, 60);
    }

    #[test]
    fn env_overrides_beat_file_values() {
        let f = write_config("[server]\nbind = \"0.0.0.0:9090\"\nlog_level = \"debug\"\n");
        let cfg = load_from(f.path(), Some("127.0.0.1:7777"), Some("trace"), None).unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:7777");
        assert_eq!(cfg.log_level, "trace");
    }

    #[test]
    fn api_key_is_carried_through() {
        let f = write_config("");
        let cfg = load_from(f.path(), None, None, Some("test-key".into())).unwrap();
        assert_eq!(cfg.llm_api_key.as_deref(), Some("test-key"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_from(Path::new("/nonexistent/swotgen.toml"), None, None, None).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let f = write_config("[server\nbind = ");
        let err = load_from(f.path(), None, None, None).unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }
}
