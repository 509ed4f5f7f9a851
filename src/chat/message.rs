use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder id for the user's in-progress speech
pub const VOICE_USER_STREAMING_ID: &str = "voice-user-streaming";

/// Placeholder id for the bot's in-progress spoken reply
pub const VOICE_BOT_STREAMING_ID: &str = "voice-bot-streaming";

/// Id of an optimistic text message that has not been acknowledged yet
pub const NEW_MESSAGE_ID: &str = "new";

/// Id of the assistant's loading placeholder
pub const AI_TEMP_MESSAGE_ID: &str = "ai-temp";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageRole {
    Human,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Human => "HUMAN",
            MessageRole::Assistant => "ASSISTANT",
            MessageRole::System => "SYSTEM",
        }
    }
}

/// A single entry in a chat's message list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,

    #[serde(rename = "type")]
    pub role: MessageRole,

    pub text: String,

    /// Sole sort key for rendering
    pub creation_date: DateTime<Utc>,

    /// Author, resolved against the chat's participants for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Assistant reply is still being produced
    #[serde(default)]
    pub is_loading_info: bool,

    /// Sending this message failed and it can be retried
    #[serde(default)]
    pub is_failed: bool,
}

impl Message {
    pub fn new(id: impl Into<String>, role: MessageRole, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            role,
            text: text.into(),
            creation_date: at,
            user_id: None,
            is_loading_info: false,
            is_failed: false,
        }
    }

    /// Whether this entry is a voice streaming placeholder
    pub fn is_streaming(&self) -> bool {
        self.id == VOICE_USER_STREAMING_ID || self.id == VOICE_BOT_STREAMING_ID
    }

    /// Whether this entry is an optimistic text-chat entry
    pub fn is_temp(&self) -> bool {
        self.id == NEW_MESSAGE_ID || self.id.contains("temp")
    }
}

/// Kind of conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatType {
    #[serde(rename = "AI_CHAT")]
    AiChat,
    #[serde(rename = "HUMAN_DIRECT_CHAT")]
    HumanDirectChat,
    #[serde(rename = "HUMAN_GROUP_CHAT")]
    HumanGroupChat,
    /// Types introduced by newer back-ends
    #[serde(untagged)]
    Other(String),
}

impl ChatType {
    pub fn as_str(&self) -> &str {
        match self {
            ChatType::AiChat => "AI_CHAT",
            ChatType::HumanDirectChat => "HUMAN_DIRECT_CHAT",
            ChatType::HumanGroupChat => "HUMAN_GROUP_CHAT",
            ChatType::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub topic: Option<String>,

    #[serde(rename = "type")]
    pub chat_type: ChatType,

    #[serde(default)]
    pub participants: Vec<Participant>,

    #[serde(default)]
    pub modification_date: Option<DateTime<Utc>>,
}

impl Chat {
    pub fn new(id: impl Into<String>, topic: impl Into<String>, chat_type: ChatType) -> Self {
        Self {
            id: Some(id.into()),
            topic: Some(topic.into()),
            chat_type,
            participants: Vec::new(),
            modification_date: None,
        }
    }
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
}
