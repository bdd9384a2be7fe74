//! API Routes
//!
//! Configures the Axum router with all façade endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, health_handler, read_handler, remove_handler, replace_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// Auxiliary endpoints live under `/-/` so that no single-segment record key
/// can collide with them.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/:key",
            get(read_handler)
                .post(create_handler)
                .put(replace_handler)
                .delete(remove_handler),
        )
        .route("/-/stats", get(stats_handler))
        .route("/-/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
