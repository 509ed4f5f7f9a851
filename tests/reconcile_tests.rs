// Tests for folding voice transcripts into a message list

use chrono::{DateTime, Duration, TimeZone, Utc};
use voice_chat::chat::{
    reconcile, reconcile_at, sort_by_creation, Message, MessageRole, VOICE_BOT_STREAMING_ID,
    VOICE_USER_STREAMING_ID,
};
use voice_chat::voice::TranscriptEvent;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap() + Duration::seconds(secs)
}

fn bot_streaming(text: &str) -> Message {
    Message::new(VOICE_BOT_STREAMING_ID, MessageRole::Assistant, text, t(0))
}

#[test]
fn test_spoken_bot_text_starts_streaming_entry() {
    let messages = reconcile(&[], &TranscriptEvent::bot("hello", true));

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, VOICE_BOT_STREAMING_ID);
    assert_eq!(messages[0].text, "hello");
    assert_eq!(messages[0].role, MessageRole::Assistant);
}

#[test]
fn test_spoken_bot_text_appends_to_streaming_entry() {
    let prev = vec![bot_streaming("hello")];

    let messages = reconcile(&prev, &TranscriptEvent::bot("world", true));

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, VOICE_BOT_STREAMING_ID);
    assert_eq!(messages[0].text, "hello world");
    assert_eq!(messages[0].creation_date, t(0), "Appending keeps the original timestamp");
}

#[test]
fn test_unspoken_bot_text_is_ignored() {
    let prev = vec![bot_streaming("hello")];

    let messages = reconcile(&prev, &TranscriptEvent::bot("not yet played", false));

    assert_eq!(messages, prev);
}

#[test]
fn test_partial_user_transcript_replaces_placeholder() {
    let first = reconcile_at(&[], &TranscriptEvent::user("wh", false), t(1));
    let second = reconcile_at(&first, &TranscriptEvent::user("what time", false), t(2));

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, VOICE_USER_STREAMING_ID);
    assert_eq!(second[0].role, MessageRole::Human);
    assert_eq!(second[0].text, "what time");
    assert_eq!(second[0].creation_date, t(2));
}

#[test]
fn test_final_user_transcript_becomes_permanent() {
    let partial = reconcile_at(&[], &TranscriptEvent::user("what time", false), t(1));
    let messages = reconcile_at(&partial, &TranscriptEvent::user("what time is it", true), t(2));

    assert_eq!(messages.len(), 1);
    assert!(messages[0].id.starts_with("voice-user-"));
    assert!(!messages[0].is_streaming());
    assert_eq!(messages[0].text, "what time is it");
}

#[test]
fn test_user_speech_finalizes_bot_entry() {
    let prev = vec![bot_streaming("It is noon.")];

    let messages = reconcile_at(&prev, &TranscriptEvent::user("thanks", false), t(5));

    assert_eq!(messages.len(), 2);
    assert!(messages[0].id.starts_with("voice-bot-"));
    assert_ne!(messages[0].id, VOICE_BOT_STREAMING_ID);
    assert_eq!(messages[0].text, "It is noon.");
    assert_eq!(messages[1].id, VOICE_USER_STREAMING_ID);
}

#[test]
fn test_end_of_session_signal_finalizes_without_new_entry() {
    let prev = vec![bot_streaming("hi")];

    let messages = reconcile(&prev, &TranscriptEvent::end_of_session());

    assert_eq!(messages.len(), 1);
    assert_ne!(messages[0].id, VOICE_BOT_STREAMING_ID);
    assert_eq!(messages[0].text, "hi");
}

#[test]
fn test_end_of_session_signal_drops_user_placeholder() {
    let prev = reconcile_at(&[], &TranscriptEvent::user("half a sent", false), t(1));

    let messages = reconcile(&prev, &TranscriptEvent::end_of_session());

    assert!(messages.is_empty());
}

#[test]
fn test_final_without_bot_entry_is_fine() {
    let messages = reconcile(&[], &TranscriptEvent::user("hi", true));

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::Human);
}

#[test]
fn test_duplicate_finals_are_not_deduplicated() {
    let once = reconcile(&[], &TranscriptEvent::user("hi", true));
    let twice = reconcile(&once, &TranscriptEvent::user("hi", true));

    assert_eq!(twice.len(), 2);
    assert_eq!(twice[0].text, "hi");
    assert_eq!(twice[1].text, "hi");
    assert_ne!(twice[0].id, twice[1].id);
}

#[test]
fn test_existing_messages_keep_their_order() {
    let prev = vec![
        Message::new("m3", MessageRole::Human, "third", t(3)),
        Message::new("m1", MessageRole::Assistant, "first", t(1)),
    ];

    let messages = reconcile_at(&prev, &TranscriptEvent::user("new", true), t(0));

    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(&ids[..2], &["m3", "m1"]);
}

#[test]
fn test_sort_by_creation_orders_oldest_first() {
    let mut messages = vec![
        Message::new("c", MessageRole::Human, "", t(3)),
        Message::new("a", MessageRole::Human, "", t(1)),
        Message::new("b", MessageRole::Human, "", t(2)),
    ];

    sort_by_creation(&mut messages);

    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_sort_by_creation_is_stable() {
    let mut messages = vec![
        Message::new("x", MessageRole::Human, "", t(1)),
        Message::new("y", MessageRole::Assistant, "", t(1)),
        Message::new("w", MessageRole::Human, "", t(0)),
    ];

    sort_by_creation(&mut messages);

    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["w", "x", "y"]);
}
