//! Axum router configuration with middleware.
//!
//! API routes live under `/api`. When `server.web_dir` exists, it is served
//! for every other path with `index.html` as the SPA fallback; otherwise
//! unknown paths get a 503.

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/clear", post(handlers::session::clear))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages),
        );

    let web_dir = state.config.server.web_dir.clone();

    let router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .route("/favicon.ico", get(favicon));

    let router = if Path::new(&web_dir).is_dir() {
        let index_path = Path::new(&web_dir).join("index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        tracing::info!(path = %web_dir, "Static asset serving enabled");
        router.fallback_service(serve_dir)
    } else {
        tracing::debug!(path = %web_dir, "Asset directory missing, static serving disabled");
        router.fallback(assets_unavailable)
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /favicon.ico - no icon, answered quietly.
async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn assets_unavailable() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "Asset serving not available")
}
