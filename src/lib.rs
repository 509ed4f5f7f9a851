pub mod chat;
pub mod config;
pub mod http;
pub mod nats;
pub mod voice;

pub use chat::{reconcile, Chat, ChatAction, ChatState, ChatStore, Message, MessageRole};
pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{NatsClientFactory, NatsVoiceClient};
pub use voice::{
    ClientEvent, ClientFactory, LocalMicrophone, MediaDevices, RealtimeClient, TranscriptEvent,
    VoiceController, VoiceError, VoiceSettings, VoiceStatus,
};
