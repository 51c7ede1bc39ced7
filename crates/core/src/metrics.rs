//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Provider calls (per operation, outcome and latency)
//! - Generation requests and the lyrics fallback
//! - Task status transitions
//! - Upload sweeping

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Provider Metrics
// =============================================================================

/// Provider requests by operation and outcome.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lyricreel_provider_requests_total",
            "Total requests sent to the media provider",
        ),
        &["operation", "result"], // result: "success", "error"
    )
    .unwrap()
});

/// Provider request latency.
pub static PROVIDER_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "lyricreel_provider_request_duration_seconds",
            "Media provider request duration in seconds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Generation Metrics
// =============================================================================

/// Generation requests by outcome.
pub static GENERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lyricreel_generations_total",
            "Generation requests handled by the orchestrator",
        ),
        &["result"], // "processing", "completed", "failed"
    )
    .unwrap()
});

/// Times the built-in lyrics replaced provider lyrics.
pub static LYRICS_FALLBACKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lyricreel_lyrics_fallbacks_total",
        "Lyrics generation failures recovered with built-in lyrics",
    )
    .unwrap()
});

/// Image status queries issued while resolving an image URL.
pub static IMAGE_POLLS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lyricreel_image_polls_total",
        "Image status queries issued by the orchestrator",
    )
    .unwrap()
});

// =============================================================================
// Task Metrics
// =============================================================================

/// Task status transitions.
pub static TASK_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lyricreel_task_transitions_total",
            "Generation task status transitions",
        ),
        &["to_status"],
    )
    .unwrap()
});

// =============================================================================
// Upload Metrics
// =============================================================================

/// Uploaded files removed by the sweeper.
pub static UPLOADS_SWEPT: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lyricreel_uploads_swept_total",
        "Expired upload files deleted by the sweeper",
    )
    .unwrap()
});

/// All core metrics, for registration in the server registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(PROVIDER_REQUEST_DURATION.clone()),
        Box::new(GENERATIONS_TOTAL.clone()),
        Box::new(LYRICS_FALLBACKS.clone()),
        Box::new(IMAGE_POLLS.clone()),
        Box::new(TASK_TRANSITIONS.clone()),
        Box::new(UPLOADS_SWEPT.clone()),
    ]
}
