pub mod client;
pub mod messages;

pub use client::{NatsClientFactory, NatsVoiceClient, CONNECT_SUBJECT};
pub use messages::{ClientMessage, ConnectMessage, ConnectReply, ServerEvent};
