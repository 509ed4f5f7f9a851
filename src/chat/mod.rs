//! Chat state management
//!
//! This module holds the client-side chat model:
//! - Messages, chats and the voice streaming placeholders
//! - The transcript reconciler that folds voice transcripts into messages
//! - The page state reducer
//! - Selectors producing sorted, display-ready view models
//! - A shared store that follows a voice session's transcripts

mod list;
mod message;
mod reconcile;
mod selectors;
mod state;
mod store;

pub use list::{format_last_message_time, greeting_key, greeting_key_now, LastMessageTime};
pub use message::{
    Chat, ChatType, ChatUser, Message, MessageRole, Participant, AI_TEMP_MESSAGE_ID,
    NEW_MESSAGE_ID, VOICE_BOT_STREAMING_ID, VOICE_USER_STREAMING_ID,
};
pub use reconcile::{reconcile, reconcile_at, sort_by_creation};
pub use selectors::{
    chat_title_key, filter_chats, select_chat_assistant_view_model, select_filtered_chats,
    ChatAssistantViewModel, ChatMessage,
};
pub use state::{ChatAction, ChatState};
pub use store::ChatStore;
