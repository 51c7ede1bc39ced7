use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{generate, handlers, middleware::metrics_middleware, status};
use crate::state::AppState;

/// Room for multipart boundaries and the theme field on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.uploads().max_bytes() + FORM_OVERHEAD_BYTES;

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Generation
        .route(
            "/generate",
            post(generate::generate).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/status/{task_id}", get(status::get_status));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
