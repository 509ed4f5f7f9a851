use serde::{Deserialize, Serialize};

/// Connect request sent to the voice gateway
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectMessage {
    /// HTTP endpoint the gateway forwards to (`<base>/voice-bff/connect`)
    pub endpoint: String,
    pub access_token: String,
    pub language: String,
    pub timestamp: String, // RFC3339 timestamp
}

/// Gateway answer to a [`ConnectMessage`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectReply {
    pub ok: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Events published by the gateway on `voice.<session>.events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    BotReady,
    TrackStarted {
        track_id: String,
        kind: TrackKindMessage,
        participant_id: String,
        #[serde(default)]
        local: bool,
    },
    TrackStopped {
        track_id: String,
        participant_id: String,
        #[serde(default)]
        local: bool,
    },
    UserTranscript {
        text: String,
        #[serde(rename = "final")]
        is_final: bool,
    },
    BotOutput {
        text: String,
        #[serde(default)]
        spoken: bool,
    },
    MessageError {
        message: String,
    },
    Error {
        message: String,
    },
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKindMessage {
    Audio,
    Video,
}

/// Messages published by us on `voice.<session>.client`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename = "client_message")]
    App {
        msg_type: String,
        data: serde_json::Value,
    },
    Mic {
        enabled: bool,
    },
    Disconnect,
}
