//! HTTP API for driving the chat client from a front-end
//!
//! This module provides a REST API over the voice session and chat state:
//! - POST /voice/start/:chat_id - Start a voice session
//! - POST /voice/mute - Toggle the microphone
//! - POST /voice/stop - End the voice session
//! - GET /voice/status - Query session status
//! - GET|PUT /chats - Filtered chat list / load chats
//! - POST /chats/:chat_id/select - Select a chat
//! - PUT /chat/messages - Load the current chat's messages
//! - GET /chat/view - Sorted view model of the current chat
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
