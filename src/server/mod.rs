//! Axum-based HTTP server — the presentation layer.
//!
//! Serves the single-page UI at `/` and the analysis API under `/api/`.
//! The existing [`CancellationToken`] is wired to axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! GET  /api/health   — liveness + provider info
//! POST /api/analyze  — the "generate" action
//! GET  /favicon.ico  → 204
//! GET  /             → single-page UI
//! ```

mod api;
mod ui;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::llm::SwotProvider;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — all fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<SwotProvider>,
    in_flight: Arc<AtomicBool>,
}

/// RAII release for the single-flight guard. Dropping it (success, failure,
/// or handler panic unwound by axum) re-opens the slot.
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AppState {
    pub fn new(provider: SwotProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn provider(&self) -> &SwotProvider {
        &self.provider
    }

    /// Claim the single outstanding-request slot.
    ///
    /// Returns `None` while a prior analysis has not settled — the caller
    /// must not issue a provider call in that case.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(self.in_flight.clone()))
    }
}

// ── Server loop ───────────────────────────────────────────────────────────────

pub async fn run(
    bind_addr: &str,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("server shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/analyze", post(api::analyze))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/", get(ui::index))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::DummyProvider;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let state = AppState::new(SwotProvider::Dummy(DummyProvider::new()));

        let first = state.try_begin().expect("slot should be free");
        assert!(state.try_begin().is_none(), "second claim must be refused");

        drop(first);
        assert!(state.try_begin().is_some(), "slot should re-open after drop");
    }
}
