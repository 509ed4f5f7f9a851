use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Voice session control
        .route("/voice/start/:chat_id", post(handlers::start_voice))
        .route("/voice/mute", post(handlers::toggle_mute))
        .route("/voice/stop", post(handlers::stop_voice))
        .route("/voice/status", get(handlers::voice_status))
        // Chat list and selection
        .route(
            "/chats",
            get(handlers::list_chats).put(handlers::load_chats),
        )
        .route("/chats/search", put(handlers::set_search_query))
        .route("/chats/:chat_id/select", post(handlers::select_chat))
        // Current chat
        .route("/chat/messages", put(handlers::load_messages))
        .route("/chat/view", get(handlers::chat_view))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
