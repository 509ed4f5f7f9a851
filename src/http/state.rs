use crate::chat::ChatStore;
use crate::voice::VoiceController;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single voice session of this client
    pub voice: VoiceController,

    /// Chat page state, also fed by the voice transcript follower
    pub chat: ChatStore,
}

impl AppState {
    pub fn new(voice: VoiceController, chat: ChatStore) -> Self {
        Self { voice, chat }
    }
}
