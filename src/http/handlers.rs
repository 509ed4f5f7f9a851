use super::state::AppState;
use crate::chat::{
    filter_chats, select_chat_assistant_view_model, select_filtered_chats, Chat, ChatAction,
    Message,
};
use crate::voice::{VoiceError, VoiceSnapshot};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatListQuery {
    /// Search text matched against topic and type
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub message: String,
    pub voice: VoiceSnapshot,
}

#[derive(Debug, Serialize)]
pub struct MuteResponse {
    pub muted: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn voice_error_response(e: &VoiceError) -> Response {
    let status = match e {
        VoiceError::AlreadyConnected | VoiceError::NotConnected => StatusCode::CONFLICT,
        VoiceError::ConnectionFailed(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, e.to_string())
}

// ============================================================================
// Voice
// ============================================================================

/// POST /voice/start/:chat_id
/// Start a voice session for a chat
pub async fn start_voice(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    info!("Starting voice chat for chat: {}", chat_id);

    match state.voice.start(&chat_id).await {
        Ok(()) => {
            state.chat.dispatch(ChatAction::VoiceChatEnabled).await;
            (
                StatusCode::OK,
                Json(VoiceResponse {
                    message: format!("Voice chat started for chat {}", chat_id),
                    voice: state.voice.snapshot(),
                }),
            )
                .into_response()
        }
        Err(VoiceError::AlreadyConnected) => {
            warn!("Voice chat already active");
            voice_error_response(&VoiceError::AlreadyConnected)
        }
        Err(e) => {
            error!("Failed to start voice chat: {}", e);
            state.chat.dispatch(ChatAction::VoiceChatDisabled).await;
            voice_error_response(&e)
        }
    }
}

/// POST /voice/mute
/// Toggle the microphone of the active session
pub async fn toggle_mute(State(state): State<AppState>) -> impl IntoResponse {
    match state.voice.toggle_mute() {
        Ok(muted) => (StatusCode::OK, Json(MuteResponse { muted })).into_response(),
        Err(e) => voice_error_response(&e),
    }
}

/// POST /voice/stop
/// End the voice session; succeeds even when none is active
pub async fn stop_voice(State(state): State<AppState>) -> impl IntoResponse {
    state.voice.cleanup();
    state.chat.dispatch(ChatAction::VoiceChatDisabled).await;

    (
        StatusCode::OK,
        Json(VoiceResponse {
            message: "Voice chat stopped".to_string(),
            voice: state.voice.snapshot(),
        }),
    )
}

/// GET /voice/status
pub async fn voice_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.voice.snapshot()))
}

// ============================================================================
// Chats
// ============================================================================

/// GET /chats?q=
/// Chats matching `q`, or the stored search query when absent
pub async fn list_chats(
    State(state): State<AppState>,
    Query(query): Query<ChatListQuery>,
) -> impl IntoResponse {
    let snapshot = state.chat.snapshot().await;
    let chats = match query.q {
        Some(q) => filter_chats(&snapshot.chats, &q),
        None => select_filtered_chats(&snapshot),
    };
    (StatusCode::OK, Json(chats))
}

/// PUT /chats/search
/// Store the search query; returns the chats it matches
pub async fn set_search_query(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    state
        .chat
        .dispatch(ChatAction::SearchQueryChanged(request.query))
        .await;

    let snapshot = state.chat.snapshot().await;
    (StatusCode::OK, Json(select_filtered_chats(&snapshot)))
}

/// PUT /chats
/// Replace the chat list with a snapshot from the chat service
pub async fn load_chats(
    State(state): State<AppState>,
    Json(chats): Json<Vec<Chat>>,
) -> impl IntoResponse {
    info!("Loaded {} chats", chats.len());
    state.chat.dispatch(ChatAction::ChatsLoaded(chats)).await;
    StatusCode::NO_CONTENT
}

/// POST /chats/:chat_id/select
pub async fn select_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    let chat = state
        .chat
        .snapshot()
        .await
        .chats
        .into_iter()
        .find(|c| c.id.as_deref() == Some(chat_id.as_str()));

    match chat {
        Some(chat) => {
            state.chat.dispatch(ChatAction::ChatSelected(chat)).await;
            StatusCode::NO_CONTENT.into_response()
        }
        None => {
            error!("Chat {} not found", chat_id);
            error_response(StatusCode::NOT_FOUND, format!("Chat {} not found", chat_id))
        }
    }
}

/// PUT /chat/messages
/// Replace the current chat's messages with a snapshot from the chat service
pub async fn load_messages(
    State(state): State<AppState>,
    Json(messages): Json<Vec<Message>>,
) -> impl IntoResponse {
    state.chat.dispatch(ChatAction::MessagesLoaded(messages)).await;
    StatusCode::NO_CONTENT
}

/// GET /chat/view
/// Display-ready view of the current chat
pub async fn chat_view(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.chat.snapshot().await;
    (StatusCode::OK, Json(select_chat_assistant_view_model(&snapshot)))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
