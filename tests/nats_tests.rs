use voice_chat::nats::client::{client_subject, events_subject};
use voice_chat::nats::messages::TrackKindMessage;
use voice_chat::nats::{ClientMessage, ConnectMessage, ConnectReply, ServerEvent, CONNECT_SUBJECT};

#[test]
fn test_subjects() {
    assert_eq!(CONNECT_SUBJECT, "voice-bff.connect");
    assert_eq!(events_subject("abc"), "voice.abc.events");
    assert_eq!(client_subject("abc"), "voice.abc.client");
}

#[test]
fn test_connect_message_serialization() {
    let msg = ConnectMessage {
        endpoint: "https://chat.example.com/voice-bff/connect".to_string(),
        access_token: "token".to_string(),
        language: "en".to_string(),
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"access_token\":\"token\""));
    assert!(json.contains("\"language\":\"en\""));
    assert!(json.contains("voice-bff/connect"));
}

#[test]
fn test_connect_reply_accepted() {
    let reply: ConnectReply =
        serde_json::from_str(r#"{"ok": true, "session_id": "s-1"}"#).unwrap();

    assert!(reply.ok);
    assert_eq!(reply.session_id.as_deref(), Some("s-1"));
    assert!(reply.error.is_none());
}

#[test]
fn test_connect_reply_refused() {
    let reply: ConnectReply =
        serde_json::from_str(r#"{"ok": false, "error": "invalid token"}"#).unwrap();

    assert!(!reply.ok);
    assert!(reply.session_id.is_none());
    assert_eq!(reply.error.as_deref(), Some("invalid token"));
}

#[test]
fn test_user_transcript_event() {
    let json = r#"{"type": "user_transcript", "text": "Hello world", "final": true}"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ServerEvent::UserTranscript {
            text: "Hello world".to_string(),
            is_final: true,
        }
    );
}

#[test]
fn test_bot_output_defaults_to_unspoken() {
    let json = r#"{"type": "bot_output", "text": "Sure."}"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ServerEvent::BotOutput {
            text: "Sure.".to_string(),
            spoken: false,
        }
    );
}

#[test]
fn test_track_started_event() {
    let json = r#"{
        "type": "track_started",
        "track_id": "t-7",
        "kind": "audio",
        "participant_id": "bot"
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    match event {
        ServerEvent::TrackStarted {
            track_id,
            kind,
            participant_id,
            local,
        } => {
            assert_eq!(track_id, "t-7");
            assert_eq!(kind, TrackKindMessage::Audio);
            assert_eq!(participant_id, "bot");
            assert!(!local);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_unit_events() {
    let ready: ServerEvent = serde_json::from_str(r#"{"type": "bot_ready"}"#).unwrap();
    assert_eq!(ready, ServerEvent::BotReady);

    let gone: ServerEvent = serde_json::from_str(r#"{"type": "disconnected"}"#).unwrap();
    assert_eq!(gone, ServerEvent::Disconnected);
}

#[test]
fn test_unknown_event_is_rejected() {
    let result = serde_json::from_str::<ServerEvent>(r#"{"type": "metrics", "ttfb": 12}"#);
    assert!(result.is_err());
}

#[test]
fn test_client_messages() {
    let app = ClientMessage::App {
        msg_type: "chat_meta".to_string(),
        data: serde_json::json!({"chatId": "c-1"}),
    };
    let json = serde_json::to_value(&app).unwrap();
    assert_eq!(json["type"], "client_message");
    assert_eq!(json["msg_type"], "chat_meta");
    assert_eq!(json["data"]["chatId"], "c-1");

    let mic = serde_json::to_value(ClientMessage::Mic { enabled: false }).unwrap();
    assert_eq!(mic, serde_json::json!({"type": "mic", "enabled": false}));

    let bye = serde_json::to_value(ClientMessage::Disconnect).unwrap();
    assert_eq!(bye, serde_json::json!({"type": "disconnect"}));
}
