//! Axum handlers for `/api/*` routes.
//!
//! This is the normalization boundary for failures: whatever the analysis
//! service returns, the client only ever sees `{"error": code, "message":
//! text}` plus a status code. The page renders `message` verbatim.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::swot::{self, AnalysisError};

use super::AppState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct AnalyzeRequest {
    topic: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn error_status(e: &AnalysisError) -> StatusCode {
    match e {
        AnalysisError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
        AnalysisError::Request(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::Parse(_) | AnalysisError::Format(_) => StatusCode::BAD_GATEWAY,
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health — liveness plus provider info.
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let body = json!({
        "status": "ok",
        "provider": state.provider().name(),
        "model": state.provider().model(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// POST /api/analyze — the "generate" action.
///
/// Empty-after-trim topics and overlapping requests are refused here, before
/// any provider call. The in-flight slot is held for the whole round-trip and
/// released when `_guard` drops.
pub(super) async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            json_error("empty_topic", "enter a company or idea to analyze"),
        )
            .into_response();
    }

    let Some(_guard) = state.try_begin() else {
        return (
            StatusCode::CONFLICT,
            json_error("busy", "an analysis is already in progress"),
        )
            .into_response();
    };

    match swot::generate(state.provider(), topic).await {
        Ok(analysis) => {
            info!(
                topic,
                strengths = analysis.strengths.len(),
                weaknesses = analysis.weaknesses.len(),
                opportunities = analysis.opportunities.len(),
                threats = analysis.threats.len(),
                "analysis complete"
            );
            (StatusCode::OK, Json(analysis)).into_response()
        }
        Err(e) => {
            warn!(topic, error = %e, "analysis failed");
            (error_status(&e), json_error(e.code(), e)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::SwotProvider;
    use crate::llm::providers::dummy::DummyProvider;
    use crate::server::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn post_analyze(topic: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "topic": topic }).to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn busy_slot_refuses_second_request() {
        let state = AppState::new(SwotProvider::Dummy(DummyProvider::new()));
        let router = build_router(state.clone());

        // Hold the slot as an outstanding request would.
        let _guard = state.try_begin().unwrap();

        let resp = router.oneshot(post_analyze("Tesla")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "busy");
    }

    #[tokio::test]
    async fn slot_reopens_after_a_request_settles() {
        let state = AppState::new(SwotProvider::Dummy(DummyProvider::failing("boom")));
        let router = build_router(state.clone());

        // A failed request must release the slot.
        let resp = router
            .clone()
            .oneshot(post_analyze("Tesla"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = router.oneshot(post_analyze("Tesla")).await.unwrap();
        assert_ne!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn missing_key_maps_to_config_error() {
        use crate::config::GeminiConfig;
        use crate::llm::providers::gemini::GeminiProvider;

        let gemini = GeminiProvider::new(
            &GeminiConfig {
                api_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
                model: "gemini-2.5-flash".into(),
                temperature: 0.2,
                timeout_seconds: 5,
            },
            None,
        )
        .unwrap();
        let router = build_router(AppState::new(SwotProvider::Gemini(gemini)));

        let resp = router.oneshot(post_analyze("Tesla")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "config");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("GEMINI_API_KEY")
        );
    }
}
