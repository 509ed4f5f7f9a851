use super::state::{ChatAction, ChatState};
use crate::voice::TranscriptEvent;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Shared chat state that actions are dispatched into
#[derive(Clone, Default)]
pub struct ChatStore {
    state: Arc<RwLock<ChatState>>,
}

impl ChatStore {
    pub fn new(initial: ChatState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn dispatch(&self, action: ChatAction) {
        let mut state = self.state.write().await;
        *state = std::mem::take(&mut *state).reduce(action);
    }

    pub async fn snapshot(&self) -> ChatState {
        self.state.read().await.clone()
    }

    /// Fold every transcript from a voice session into the current chat
    pub fn follow_transcripts(
        &self,
        mut transcripts: mpsc::UnboundedReceiver<TranscriptEvent>,
    ) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            info!("Transcript follower started");

            while let Some(event) = transcripts.recv().await {
                debug!("Transcript: {:?}", event);
                store
                    .dispatch(ChatAction::VoiceTranscriptReceived(event))
                    .await;
            }

            info!("Transcript follower stopped");
        })
    }
}
