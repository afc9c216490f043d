//! Longform Script Builder: service entrypoint.
//! Boots the Axum HTTP server over the heuristic analysis engine.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use longform_script_builder::{api, devlog};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - LONGFORM_DEV_LOG=1
fn enable_dev_tracing() {
    if !devlog::dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("analysis=info,longform_script_builder=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables HEURISTICS_CONFIG_PATH / DEBUG_ROUTES from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let state = api::AppState::from_env()?;
    tracing::info!(
        angles = state.heuristics.ideas.angles.len(),
        "heuristic tables loaded"
    );
    let router = api::router(state);

    Ok(router.into())
}
