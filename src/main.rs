//! swotgen — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Build the LLM provider
//!   6. Spawn Ctrl-C → shutdown signal watcher
//!   7. Run the HTTP server until shutdown

use tokio_util::sync::CancellationToken;
use tracing::info;

use swotgen::error::AppError;
use swotgen::llm::SwotProvider;
use swotgen::server::{self, AppState};
use swotgen::{config, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args()?;

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();

    logger::init(effective_log_level, force_cli_level)?;

    info!(
        bind = %config.bind,
        provider = %config.llm.provider,
        model = %config.llm.gemini.model,
        api_key_configured = config.llm_api_key.is_some(),
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let provider = SwotProvider::build(&config.llm, config.llm_api_key.clone())?;
    let state = AppState::new(provider);

    // Shared shutdown token — Ctrl-C cancels it, the server watches it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    server::run(&config.bind, state, shutdown).await
}

// ── CLI ───────────────────────────────────────────────────────────────────────

struct CliArgs {
    config_path: Option<String>,
    log_level: Option<&'static str>,
}

/// Minimal hand-rolled flag parsing: `-c/--config <path>`, `-v` (debug),
/// `-vv` (trace).
fn parse_cli_args() -> Result<CliArgs, AppError> {
    let mut args = CliArgs {
        config_path: None,
        log_level: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                args.config_path = Some(iter.next().ok_or_else(|| {
                    AppError::Config(format!("{arg} requires a path argument"))
                })?);
            }
            "-v" => args.log_level = Some("debug"),
            "-vv" => args.log_level = Some("trace"),
            other => {
                return Err(AppError::Config(format!("unknown argument: {other}")));
            }
        }
    }

    Ok(args)
}
