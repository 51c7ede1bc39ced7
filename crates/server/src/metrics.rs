//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the LyricReel server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Task registry size and provider credentials (collected dynamically)
//! - Core generation metrics, registered from `lyricreel_core::metrics`

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "lyricreel_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lyricreel_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "lyricreel_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Registry Metrics (collected dynamically)
// =============================================================================

/// Tasks held in the registry.
pub static TASKS_TRACKED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("lyricreel_tasks_tracked", "Video tasks held in memory").unwrap()
});

/// Whether a provider API key is configured (1) or not (0).
pub static PROVIDER_CONFIGURED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "lyricreel_provider_configured",
        "Whether the provider API key is configured (1) or not (0)",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Registry
    registry.register(Box::new(TASKS_TRACKED.clone())).unwrap();
    registry
        .register(Box::new(PROVIDER_CONFIGURED.clone()))
        .unwrap();

    // Core metrics (generation, provider calls, tasks, uploads)
    for metric in lyricreel_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Update gauges from current application state before encoding.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(count) = state.task_store().len() {
        TASKS_TRACKED.set(count as i64);
    }
    PROVIDER_CONFIGURED.set(if state.provider_configured() { 1 } else { 0 });
}

static STATUS_PATH: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"^/api/status/[^/]+").unwrap());
/// Normalize a path for metric labels (replace task ids with a placeholder).
pub fn normalize_path(path: &str) -> String {
    STATUS_PATH
        .replace(path, "/api/status/{task_id}")
        .into_owned()
}
