// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const ANALYSES_TOTAL: &str = "longform_analyses_total";
pub const IDEAS_TOTAL: &str = "longform_ideas_generated_total";
pub const SCRIPTS_TOTAL: &str = "longform_scripts_assembled_total";
pub const VALIDATION_ERRORS_TOTAL: &str = "longform_validation_errors_total";
pub const DECODE_ERRORS_TOTAL: &str = "longform_thumbnail_decode_errors_total";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once per process and describe the series.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    HANDLE
        .get_or_try_init(|| {
            let handle = PrometheusBuilder::new().install_recorder()?;
            describe_counter!(ANALYSES_TOTAL, "Reference analyses completed.");
            describe_counter!(IDEAS_TOTAL, "Ideas generated across all requests.");
            describe_counter!(SCRIPTS_TOTAL, "Scripts assembled.");
            describe_counter!(
                VALIDATION_ERRORS_TOTAL,
                "Requests rejected for missing fields or malformed bodies."
            );
            describe_counter!(
                DECODE_ERRORS_TOTAL,
                "Thumbnail images that exist but could not be decoded."
            );
            Ok(handle)
        })
        .cloned()
}

pub fn record_analysis(ideas: usize) {
    counter!(ANALYSES_TOTAL).increment(1);
    counter!(IDEAS_TOTAL).increment(ideas as u64);
}

pub fn record_ideas(ideas: usize) {
    counter!(IDEAS_TOTAL).increment(ideas as u64);
}

pub fn record_script() {
    counter!(SCRIPTS_TOTAL).increment(1);
}

pub fn record_validation_error() {
    counter!(VALIDATION_ERRORS_TOTAL).increment(1);
}

pub fn record_decode_error() {
    counter!(DECODE_ERRORS_TOTAL).increment(1);
}

/// Router exposing `/metrics` in the Prometheus exposition format.
pub fn router<S>(handle: PrometheusHandle) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}
