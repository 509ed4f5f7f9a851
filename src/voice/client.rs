use super::events::{ClientEvent, Tracks};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Channel a client pushes its events into
pub type ClientEventSender = mpsc::UnboundedSender<ClientEvent>;

/// Payload sent along with the connect request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    pub access_token: String,
    pub language: String,
}

/// Where and how to reach the voice back-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectRequest {
    pub endpoint: String,
    pub request_data: RequestData,
}

/// Real-time voice client
///
/// Implementations:
/// - NATS: talks to the voice gateway over NATS subjects
/// - Tests: scripted fakes
#[async_trait::async_trait]
pub trait RealtimeClient: Send + Sync {
    /// Prepare local devices before connecting
    async fn init_devices(&self) -> Result<()>;

    /// Enable or disable the outgoing microphone
    fn enable_mic(&self, enabled: bool);

    /// Ask the back-end to start a bot and connect to it
    async fn start_bot_and_connect(&self, request: ConnectRequest) -> Result<()>;

    /// Close the connection
    async fn disconnect(&self) -> Result<()>;

    /// Tracks the transport currently holds
    fn tracks(&self) -> Tracks;

    /// Send an application message to the bot
    async fn send_client_message(&self, msg_type: &str, data: serde_json::Value) -> Result<()>;

    /// Get client name for logging
    fn name(&self) -> &str;
}

/// Builds a fresh client for every session
pub trait ClientFactory: Send + Sync {
    fn create(&self, events: ClientEventSender) -> Box<dyn RealtimeClient>;
}
