// src/api.rs
//! HTTP shell over the engine. Every request is an independent computation over the
//! shared, read-only heuristic tables.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::analyzer::{analyze_reference, score_thumbnail_file, AnalysisReport, ThumbnailReport};
use crate::config::Heuristics;
use crate::devlog;
use crate::error::EngineError;
use crate::ideas::{generate_ideas, Idea, DEFAULT_IDEA_COUNT};
use crate::input::ReferenceVideoInput;
use crate::metrics;
use crate::script::{assemble_script, ScriptRequest};
use crate::thumbnail::ThumbnailSource;

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";
const MAX_IDEAS: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub heuristics: Arc<Heuristics>,
}

impl AppState {
    pub fn new(heuristics: Arc<Heuristics>) -> Self {
        Self { heuristics }
    }

    /// Tables from `HEURISTICS_CONFIG_PATH` or the embedded defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(Heuristics::from_env()?)))
    }
}

fn debug_routes_enabled() -> bool {
    std::env::var(ENV_DEBUG_ROUTES).ok().as_deref() == Some("1")
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/ideas", post(ideas))
        .route("/script", post(script))
        .route("/thumbnail", post(thumbnail));

    if debug_routes_enabled() {
        match metrics::install() {
            Ok(handle) => app = app.merge(metrics::router(handle)),
            Err(e) => tracing::warn!(error = %e, "metrics recorder unavailable"),
        }
    }

    app.layer(CorsLayer::very_permissive()).with_state(state)
}

/* ---------- errors ---------- */

#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    /// Body or query string the extractors could not accept.
    Rejected(StatusCode, String),
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self::Rejected(r.status(), r.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        Self::Rejected(r.status(), r.body_text())
    }
}

/// `axum::Json` whose rejections render as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct Json<T>(T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
struct Query<T>(T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            Self::Engine(e) if e.is_validation() => {
                metrics::record_validation_error();
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::Engine(e @ EngineError::Decode { .. }) => {
                metrics::record_decode_error();
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            Self::Engine(
                e @ (EngineError::NoIdeaSelected
                | EngineError::IdeaOutOfRange { .. }
                | EngineError::InvalidGrid(_)),
            ) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Rejected(status, m) => {
                metrics::record_validation_error();
                (*status, m.clone())
            }
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        };
        (status, axum::Json(json!({ "error": msg }))).into_response()
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, EngineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("worker failed: {e}")))?
        .map_err(ApiError::from)
}

/* ---------- handlers ---------- */

#[derive(Debug, Deserialize)]
struct IdeasQuery {
    #[serde(default)]
    ideas: Option<usize>,
}

impl IdeasQuery {
    fn count(&self) -> usize {
        self.ideas.unwrap_or(DEFAULT_IDEA_COUNT).min(MAX_IDEAS)
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeResp {
    report: AnalysisReport,
    ideas: Vec<Idea>,
}

async fn analyze(
    State(state): State<AppState>,
    Query(q): Query<IdeasQuery>,
    Json(input): Json<ReferenceVideoInput>,
) -> Result<Json<AnalyzeResp>, ApiError> {
    let n = q.count();
    let h = state.heuristics.clone();
    let resp = blocking(move || {
        input.validate()?;
        let thumb = ThumbnailSource::resolve(&input.thumbnail, h.salience.max_side);
        let report = analyze_reference(&input, &h, &thumb)?;
        devlog::log_analysis(&input.title, &report);
        let ideas = generate_ideas(&input, &h, n);
        Ok(AnalyzeResp { report, ideas })
    })
    .await?;

    if matches!(resp.report.thumbnail, ThumbnailReport::Error { .. }) {
        metrics::record_decode_error();
    }
    metrics::record_analysis(resp.ideas.len());
    Ok(Json(resp))
}

async fn ideas(
    State(state): State<AppState>,
    Query(q): Query<IdeasQuery>,
    Json(input): Json<ReferenceVideoInput>,
) -> Result<Json<Vec<Idea>>, ApiError> {
    input.validate()?;
    let out = generate_ideas(&input, &state.heuristics, q.count());
    metrics::record_ideas(out.len());
    Ok(Json(out))
}

#[derive(Debug, Deserialize)]
struct ScriptReq {
    #[serde(default)]
    idea: Option<Idea>,
    #[serde(flatten)]
    request: ScriptRequest,
}

#[derive(Debug, Serialize)]
struct ScriptResp {
    script: String,
}

async fn script(
    State(state): State<AppState>,
    Json(body): Json<ScriptReq>,
) -> Result<Json<ScriptResp>, ApiError> {
    let script = assemble_script(body.idea.as_ref(), &body.request, &state.heuristics)?;
    metrics::record_script();
    Ok(Json(ScriptResp { script }))
}

#[derive(Debug, Deserialize)]
struct ThumbnailReq {
    path: String,
}

/// `{"kind":"image",...}` for a decodable file, `{"kind":"absent"}` when nothing is there.
async fn thumbnail(
    State(state): State<AppState>,
    Json(body): Json<ThumbnailReq>,
) -> Result<Json<ThumbnailReport>, ApiError> {
    let h = state.heuristics.clone();
    let report = blocking(move || score_thumbnail_file(Path::new(body.path.trim()), &h)).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: EngineError) -> StatusCode {
        ApiError::from(e).into_response().status()
    }

    #[test]
    fn engine_errors_map_to_statuses() {
        assert_eq!(
            status_of(EngineError::MissingField { field: "title" }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(EngineError::IdeaOutOfRange { index: 12, len: 10 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(EngineError::NoIdeaSelected),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(EngineError::Decode {
                path: "bad.png".into(),
                reason: "Invalid PNG signature.".into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(EngineError::Io(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
