//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS and request tracing. Static
//! segments (`/knowledge/search`, `/knowledge/summary/stats`) take
//! precedence over the `{id}` capture.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/help-requests",
            get(handlers::list_help_requests).post(handlers::create_help_request),
        )
        .route(
            "/help-requests/check-timeouts",
            post(handlers::check_timeouts),
        )
        .route("/help-requests/{id}", get(handlers::get_help_request))
        .route(
            "/knowledge",
            get(handlers::list_knowledge).post(handlers::create_knowledge_entry),
        )
        .route("/knowledge/search", get(handlers::search_knowledge))
        .route(
            "/knowledge/summary/stats",
            get(handlers::knowledge_summary),
        )
        .route("/knowledge/{id}", get(handlers::get_knowledge_entry))
        .route(
            "/supervisor/{id}/resolve",
            post(handlers::resolve_help_request),
        )
        .route(
            "/supervisor/dashboard/stats",
            get(handlers::dashboard_stats),
        )
        .route("/chat/{session_id}", post(handlers::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on the given address.
pub async fn start_server(
    state: AppState,
    host: &str,
    port: u16,
) -> Result<(), frontdesk_core::error::FrontdeskError> {
    let addr = format!("{}:{}", host, port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .await
        .map_err(|e| frontdesk_core::error::FrontdeskError::Io(e))?;
    Ok(())
}
