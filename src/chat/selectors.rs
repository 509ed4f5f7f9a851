use super::message::{Chat, ChatType, Message, MessageRole};
use super::state::ChatState;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A message shaped for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub role: MessageRole,
    pub text: String,
    pub creation_date: DateTime<Utc>,
    pub user_name: Option<String>,
    /// Translation key used when no user name is known
    pub user_name_key: String,
    pub is_loading_info: bool,
    pub is_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAssistantViewModel {
    pub chats: Vec<Chat>,
    pub current_chat: Option<Chat>,
    pub current_messages: Option<Vec<ChatMessage>>,
    pub chat_title_key: String,
    pub selected_chat_mode: Option<ChatType>,
    pub voice_chat_enabled: bool,
}

/// Translation key for the header of a chat of the given type
pub fn chat_title_key(chat_type: Option<&ChatType>) -> &'static str {
    match chat_type {
        Some(ChatType::AiChat) => "CHAT.TITLE.AI",
        Some(ChatType::HumanGroupChat) => "CHAT.TITLE.GROUP",
        Some(ChatType::HumanDirectChat) => "CHAT.TITLE.DIRECT",
        Some(ChatType::Other(_)) | None => "CHAT.TITLE.DEFAULT",
    }
}

pub fn select_chat_assistant_view_model(state: &ChatState) -> ChatAssistantViewModel {
    let current_chat = state.current_chat.as_ref();

    let title_type = current_chat
        .map(|c| &c.chat_type)
        .or(state.selected_chat_mode.as_ref());

    let current_messages = state.current_messages.as_ref().map(|messages| {
        let mut view: Vec<ChatMessage> = messages
            .iter()
            .map(|m| to_chat_message(m, current_chat))
            .collect();
        // Vec::sort_by_key is stable, equal timestamps keep arrival order
        view.sort_by_key(|m| m.creation_date);
        view
    });

    ChatAssistantViewModel {
        chats: state.chats.clone(),
        current_chat: state.current_chat.clone(),
        current_messages,
        chat_title_key: chat_title_key(title_type).to_string(),
        selected_chat_mode: state.selected_chat_mode.clone(),
        voice_chat_enabled: state.voice_chat_enabled,
    }
}

fn to_chat_message(message: &Message, chat: Option<&Chat>) -> ChatMessage {
    let user_name = chat.and_then(|c| {
        c.participants
            .iter()
            .find(|p| Some(&p.id) == message.user_id.as_ref())
            .and_then(|p| p.user_name.as_deref())
            .map(|name| name.trim().to_string())
    });

    ChatMessage {
        id: message.id.clone(),
        role: message.role,
        text: message.text.clone(),
        creation_date: message.creation_date,
        user_name,
        user_name_key: format!("CHAT.PARTICIPANT.{}", message.role.as_str()),
        is_loading_info: message.is_loading_info,
        is_failed: message.is_failed,
    }
}

/// Chats whose topic or type contains the search query, ignoring case
pub fn select_filtered_chats(state: &ChatState) -> Vec<Chat> {
    filter_chats(&state.chats, &state.search_query)
}

pub fn filter_chats(chats: &[Chat], search_query: &str) -> Vec<Chat> {
    let query = search_query.trim().to_lowercase();
    if query.is_empty() {
        return chats.to_vec();
    }

    chats
        .iter()
        .filter(|chat| {
            chat.topic
                .as_deref()
                .is_some_and(|topic| topic.to_lowercase().contains(&query))
                || chat.chat_type.as_str().to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}
