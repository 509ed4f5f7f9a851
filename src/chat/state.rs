use super::message::{
    Chat, ChatType, ChatUser, Message, MessageRole, AI_TEMP_MESSAGE_ID, NEW_MESSAGE_ID,
};
use super::reconcile::reconcile_at;
use crate::voice::TranscriptEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-side state of the chat assistant page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub user: Option<ChatUser>,
    pub chats: Vec<Chat>,
    pub current_chat: Option<Chat>,
    pub current_messages: Option<Vec<Message>>,
    pub topic: String,
    pub selected_chat_mode: Option<ChatType>,
    pub chat_initialized: bool,
    pub search_query: String,
    pub voice_chat_enabled: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            user: None,
            chats: Vec::new(),
            current_chat: None,
            current_messages: None,
            topic: "chat-assistant".to_string(),
            selected_chat_mode: None,
            chat_initialized: false,
            search_query: String::new(),
            voice_chat_enabled: false,
        }
    }
}

/// Everything that can change [`ChatState`]
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    MessageSentForNewChat(Chat),
    ChatInitialized,
    MessageSent(String),
    MessageSendingFailed(String),
    ChatsLoaded(Vec<Chat>),
    MessagesLoaded(Vec<Message>),
    ChatSelected(Chat),
    ChatCreationSuccessful(Chat),
    ChatDeletionSuccessful(String),
    BackButtonClicked,
    NewChatClicked(ChatType),
    SearchQueryChanged(String),
    VoiceChatEnabled,
    VoiceChatDisabled,
    VoiceTranscriptReceived(TranscriptEvent),
}

impl ChatState {
    pub fn with_user(user: ChatUser) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    /// Apply an action, stamping any new messages with the current time
    pub fn reduce(self, action: ChatAction) -> Self {
        self.reduce_at(action, Utc::now())
    }

    pub fn reduce_at(self, action: ChatAction, now: DateTime<Utc>) -> Self {
        match action {
            ChatAction::MessageSentForNewChat(chat) => Self {
                current_chat: Some(chat),
                ..self
            },

            ChatAction::ChatInitialized => Self {
                chat_initialized: true,
                ..self
            },

            ChatAction::MessageSent(text) => {
                let mut loading =
                    Message::new(AI_TEMP_MESSAGE_ID, MessageRole::Assistant, "", now);
                loading.is_loading_info = true;

                let mut messages = vec![
                    Message::new(NEW_MESSAGE_ID, MessageRole::Human, text, now),
                    loading,
                ];
                messages.extend(self.settled_messages());

                Self {
                    current_messages: Some(messages),
                    ..self
                }
            }

            ChatAction::MessageSendingFailed(text) => {
                let mut failed = Message::new(NEW_MESSAGE_ID, MessageRole::Human, text, now);
                failed.is_failed = true;

                let mut messages = vec![failed];
                messages.extend(self.settled_messages());

                Self {
                    current_messages: Some(messages),
                    ..self
                }
            }

            ChatAction::ChatsLoaded(chats) => Self { chats, ..self },

            ChatAction::MessagesLoaded(messages) => Self {
                current_messages: Some(messages),
                ..self
            },

            ChatAction::ChatSelected(chat) | ChatAction::ChatCreationSuccessful(chat) => Self {
                current_chat: Some(chat),
                current_messages: Some(Vec::new()),
                ..self
            },

            ChatAction::ChatDeletionSuccessful(chat_id) => {
                let chats = self
                    .chats
                    .into_iter()
                    .filter(|c| c.id.as_deref() != Some(chat_id.as_str()))
                    .collect();

                Self {
                    current_chat: None,
                    chats,
                    current_messages: Some(Vec::new()),
                    ..self
                }
            }

            ChatAction::BackButtonClicked => Self {
                selected_chat_mode: None,
                current_chat: None,
                current_messages: Some(Vec::new()),
                search_query: String::new(),
                ..self
            },

            ChatAction::NewChatClicked(mode) => Self {
                current_chat: Some(Chat {
                    id: Some(NEW_MESSAGE_ID.to_string()),
                    topic: None,
                    chat_type: mode,
                    participants: Vec::new(),
                    modification_date: None,
                }),
                current_messages: Some(Vec::new()),
                ..self
            },

            ChatAction::SearchQueryChanged(search_query) => Self {
                search_query,
                ..self
            },

            ChatAction::VoiceChatEnabled => Self {
                voice_chat_enabled: true,
                ..self
            },

            ChatAction::VoiceChatDisabled => Self {
                voice_chat_enabled: false,
                ..self
            },

            // Unspoken bot text never reaches the list, so the state stays as-is
            ChatAction::VoiceTranscriptReceived(TranscriptEvent::Bot { spoken: false, .. }) => {
                self
            }

            ChatAction::VoiceTranscriptReceived(event) => {
                let current = self.current_messages.as_deref().unwrap_or_default();
                let messages = reconcile_at(current, &event, now);

                Self {
                    current_messages: Some(messages),
                    ..self
                }
            }
        }
    }

    /// Current messages without optimistic entries
    fn settled_messages(&self) -> Vec<Message> {
        self.current_messages
            .iter()
            .flatten()
            .filter(|m| !m.is_temp())
            .cloned()
            .collect()
    }
}
