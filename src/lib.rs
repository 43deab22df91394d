//! swotgen — AI-powered SWOT analysis generator.
//!
//! A single-page web form backed by Gemini's `generateContent` endpoint.
//! Library layout:
//!
//! - [`swot`] — the analysis request service (prompt, schema, validation)
//! - [`llm`] — provider backends (gemini, dummy)
//! - [`server`] — axum presentation layer (UI page + `/api/analyze`)
//! - [`config`] / [`logger`] / [`error`] — ambient plumbing

pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod server;
pub mod swot;
