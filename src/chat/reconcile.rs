//! Folding voice transcripts into a message list
//!
//! Streaming speech is shown through two placeholder entries, one per role.
//! A user placeholder is replaced on every partial transcript and promoted to
//! a permanent message once the transcript is final. A bot placeholder grows
//! with every spoken sentence and is made permanent as soon as the user
//! speaks again (or the session is torn down, which emits an empty user
//! transcript).

use super::message::{Message, MessageRole, VOICE_BOT_STREAMING_ID, VOICE_USER_STREAMING_ID};
use crate::voice::TranscriptEvent;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Apply a transcript event, stamping new entries with the current time
pub fn reconcile(messages: &[Message], event: &TranscriptEvent) -> Vec<Message> {
    reconcile_at(messages, event, Utc::now())
}

/// Apply a transcript event that arrived at `now`
///
/// Existing entries keep their relative order; new entries are appended.
pub fn reconcile_at(
    messages: &[Message],
    event: &TranscriptEvent,
    now: DateTime<Utc>,
) -> Vec<Message> {
    match event {
        TranscriptEvent::User { text, is_final } => {
            let mut next = finalize_bot(messages);

            if *is_final {
                next.push(Message::new(
                    permanent_id(MessageRole::Human),
                    MessageRole::Human,
                    text.clone(),
                    now,
                ));
            } else if !text.is_empty() {
                next.push(Message::new(
                    VOICE_USER_STREAMING_ID,
                    MessageRole::Human,
                    text.clone(),
                    now,
                ));
            }

            next
        }

        // Text that has not been played yet would run ahead of the audio
        TranscriptEvent::Bot { spoken: false, .. } => messages.to_vec(),

        TranscriptEvent::Bot { text, spoken: true } => {
            let mut next = messages.to_vec();

            match next.iter_mut().find(|m| m.id == VOICE_BOT_STREAMING_ID) {
                Some(existing) => {
                    existing.text.push(' ');
                    existing.text.push_str(text);
                }
                None => next.push(Message::new(
                    VOICE_BOT_STREAMING_ID,
                    MessageRole::Assistant,
                    text.clone(),
                    now,
                )),
            }

            next
        }
    }
}

/// Drop the user placeholder and give the bot placeholder a permanent id
fn finalize_bot(messages: &[Message]) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| m.id != VOICE_USER_STREAMING_ID)
        .map(|m| {
            if m.id == VOICE_BOT_STREAMING_ID {
                Message {
                    id: permanent_id(MessageRole::Assistant),
                    ..m.clone()
                }
            } else {
                m.clone()
            }
        })
        .collect()
}

fn permanent_id(role: MessageRole) -> String {
    let prefix = match role {
        MessageRole::Human => "voice-user",
        MessageRole::Assistant | MessageRole::System => "voice-bot",
    };
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Stable sort by creation date, oldest first
pub fn sort_by_creation(messages: &mut [Message]) {
    messages.sort_by_key(|m| m.creation_date);
}
