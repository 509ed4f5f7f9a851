// Scripted real-time client and devices for driving VoiceController in tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};
use voice_chat::voice::{
    ClientEvent, ClientEventSender, ClientFactory, ConnectRequest, MediaDevices, MediaStream,
    MediaTrack, RealtimeClient, TranscriptEvent, Tracks, VoiceController, VoiceSettings,
};

/// Called from `enable_mic` after the call is logged
pub type MicHook = Box<dyn Fn(bool) + Send + Sync>;

/// How the next clients should behave
#[derive(Default)]
pub struct Script {
    pub fail_init: AtomicBool,
    /// When set, device init waits until notified
    pub hold_init: AtomicBool,
    pub release_init: Notify,
    pub on_mic: Mutex<Option<MicHook>>,
    pub fail_connect: AtomicBool,
    /// Expose a transport mic track instead of forcing a local device
    pub transport_mic: Mutex<Option<MediaTrack>>,
    /// When set, connect waits until notified
    pub hold_connect: AtomicBool,
    pub release_connect: Notify,
}

/// Everything the clients were asked to do
#[derive(Default)]
pub struct CallLog {
    pub created: AtomicUsize,
    pub mic_calls: Mutex<Vec<bool>>,
    pub connect_requests: Mutex<Vec<ConnectRequest>>,
    pub disconnects: AtomicUsize,
    pub client_messages: Mutex<Vec<(String, serde_json::Value)>>,
    pub senders: Mutex<Vec<ClientEventSender>>,
}

impl CallLog {
    pub fn mic_calls(&self) -> Vec<bool> {
        self.mic_calls.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Push an event as the most recently created client
    pub fn emit(&self, event: ClientEvent) {
        let senders = self.senders.lock().unwrap();
        senders.last().expect("no client created").send(event).unwrap();
    }
}

pub struct FakeClient {
    script: Arc<Script>,
    log: Arc<CallLog>,
}

#[async_trait::async_trait]
impl RealtimeClient for FakeClient {
    async fn init_devices(&self) -> Result<()> {
        if self.script.hold_init.load(Ordering::SeqCst) {
            self.script.release_init.notified().await;
        }
        if self.script.fail_init.load(Ordering::SeqCst) {
            bail!("microphone permission denied");
        }
        Ok(())
    }

    fn enable_mic(&self, enabled: bool) {
        self.log.mic_calls.lock().unwrap().push(enabled);
        if let Some(hook) = self.script.on_mic.lock().unwrap().as_ref() {
            hook(enabled);
        }
    }

    async fn start_bot_and_connect(&self, request: ConnectRequest) -> Result<()> {
        self.log.connect_requests.lock().unwrap().push(request);
        if self.script.hold_connect.load(Ordering::SeqCst) {
            self.script.release_connect.notified().await;
        }
        if self.script.fail_connect.load(Ordering::SeqCst) {
            bail!("handshake rejected");
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.log.disconnects.fetch_add(1, Ordering::SeqCst);
        bail!("socket already closed")
    }

    fn tracks(&self) -> Tracks {
        Tracks {
            local_audio: self.script.transport_mic.lock().unwrap().clone(),
            ..Tracks::default()
        }
    }

    async fn send_client_message(&self, msg_type: &str, data: serde_json::Value) -> Result<()> {
        self.log
            .client_messages
            .lock()
            .unwrap()
            .push((msg_type.to_string(), data));
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct FakeFactory {
    pub script: Arc<Script>,
    pub log: Arc<CallLog>,
}

impl ClientFactory for FakeFactory {
    fn create(&self, events: ClientEventSender) -> Box<dyn RealtimeClient> {
        self.log.created.fetch_add(1, Ordering::SeqCst);
        self.log.senders.lock().unwrap().push(events);
        Box::new(FakeClient {
            script: Arc::clone(&self.script),
            log: Arc::clone(&self.log),
        })
    }
}

/// Hands out local mic streams and remembers them
#[derive(Clone, Default)]
pub struct FakeDevices {
    pub fail: Arc<AtomicBool>,
    pub acquired: Arc<Mutex<Vec<MediaStream>>>,
}

impl FakeDevices {
    pub fn acquired(&self) -> Vec<MediaStream> {
        self.acquired.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaDevices for FakeDevices {
    async fn get_user_media(&self) -> Result<MediaStream> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("no input device");
        }
        let stream = MediaStream::new(vec![MediaTrack::audio("test mic")]);
        self.acquired.lock().unwrap().push(stream.clone());
        Ok(stream)
    }
}

pub struct Harness {
    pub controller: VoiceController,
    pub transcripts: mpsc::UnboundedReceiver<TranscriptEvent>,
    pub script: Arc<Script>,
    pub log: Arc<CallLog>,
    pub devices: FakeDevices,
}

impl Harness {
    pub fn new() -> Self {
        let script = Arc::new(Script::default());
        let log = Arc::new(CallLog::default());
        let devices = FakeDevices::default();

        let (controller, transcripts) = VoiceController::new(
            settings(),
            Box::new(FakeFactory {
                script: Arc::clone(&script),
                log: Arc::clone(&log),
            }),
            Box::new(devices.clone()),
        );

        Self {
            controller,
            transcripts,
            script,
            log,
            devices,
        }
    }

    /// Transcripts received so far
    pub fn drain_transcripts(&mut self) -> Vec<TranscriptEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.transcripts.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn settings() -> VoiceSettings {
    VoiceSettings {
        base_url: "https://chat.example.com/api".to_string(),
        authorization: Some("Bearer secret-token".to_string()),
        language: "de".to_string(),
    }
}

/// Let spawned relay and disconnect tasks run
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
