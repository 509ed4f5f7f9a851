use super::media::MediaTrack;
use serde::{Deserialize, Serialize};

/// Transcript relayed from a voice session to the chat state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEvent {
    /// Speech-to-text of the user; partial until `is_final`
    User { text: String, is_final: bool },
    /// Bot output; only `spoken` text has actually been played
    Bot { text: String, spoken: bool },
}

impl TranscriptEvent {
    pub fn user(text: impl Into<String>, is_final: bool) -> Self {
        TranscriptEvent::User {
            text: text.into(),
            is_final,
        }
    }

    pub fn bot(text: impl Into<String>, spoken: bool) -> Self {
        TranscriptEvent::Bot {
            text: text.into(),
            spoken,
        }
    }

    /// The empty partial user transcript emitted when a session ends
    pub fn end_of_session() -> Self {
        Self::user("", false)
    }
}

/// Which side of the call a track belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOwner {
    pub id: String,
    pub local: bool,
}

/// Events pushed by a real-time client
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Connected,
    Disconnected,
    BotReady,
    TrackStarted {
        track: MediaTrack,
        participant: Option<TrackOwner>,
    },
    TrackStopped {
        track: MediaTrack,
        participant: Option<TrackOwner>,
    },
    UserTranscript { text: String, is_final: bool },
    BotOutput { text: String, spoken: bool },
    MessageError(String),
    Error(String),
}

/// Audio tracks currently known to a client
#[derive(Debug, Clone, Default)]
pub struct Tracks {
    /// Microphone track as published to the remote side
    pub user_audio: Option<MediaTrack>,
    /// Microphone track held by the local transport
    pub local_audio: Option<MediaTrack>,
    pub bot_audio: Option<MediaTrack>,
}
