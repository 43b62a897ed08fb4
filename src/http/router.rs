//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Weekly playlist grid
        .route("/playlist", get(handlers::list_playlist))
        .route("/playlist", post(handlers::create_slot))
        .route("/playlist/{id}", put(handlers::update_slot))
        .route("/playlist/{id}", delete(handlers::delete_slot))
        .route("/playlist/reorder", post(handlers::reorder_playlist))
        .route("/playlist/csv", get(handlers::export_playlist_csv))
        .route("/playlist/csv", post(handlers::import_playlist_csv))
        // Song requests
        .route("/requests", get(handlers::list_requests))
        .route("/requests", post(handlers::create_request))
        .route("/requests/{id}/status", post(handlers::update_request_status))
        .route("/requests/new-count", get(handlers::new_request_count))
        // Broadcast schedules
        .route("/schedules", get(handlers::list_schedules))
        .route("/schedules", post(handlers::create_schedule))
        .route("/schedules/{id}", delete(handlers::delete_schedule))
        // Listener chat
        .route("/chat/messages", get(handlers::list_chat_messages))
        .route("/chat/messages", post(handlers::post_chat_message))
        .route("/chat/messages/{id}", delete(handlers::delete_chat_message))
        .route("/chat/moderation", get(handlers::list_chat_moderation));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Allow multi-megabyte CSV payloads during imports.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
