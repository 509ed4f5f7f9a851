use super::client::{ClientFactory, ConnectRequest, RealtimeClient, RequestData};
use super::error::VoiceError;
use super::events::{ClientEvent, TranscriptEvent};
use super::media::{MediaDevices, MediaStream, TrackKind};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Path of the connect endpoint below the service base URL
pub const CONNECT_PATH: &str = "voice-bff/connect";

/// Connection parameters shared by every session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Base URL of the chat back-end
    pub base_url: String,

    /// Value of the Authorization header, with or without the `Bearer ` prefix
    pub authorization: Option<String>,

    /// Language tag passed to the bot (e.g. "en")
    pub language: String,
}

impl VoiceSettings {
    pub fn endpoint(&self) -> String {
        join_with_slash(&self.base_url, CONNECT_PATH)
    }

    pub fn access_token(&self) -> String {
        let header = self.authorization.as_deref().unwrap_or_default();
        header.strip_prefix("Bearer ").unwrap_or(header).to_string()
    }

    pub fn connect_request(&self) -> ConnectRequest {
        ConnectRequest {
            endpoint: self.endpoint(),
            request_data: RequestData {
                access_token: self.access_token(),
                language: self.language.clone(),
            },
        }
    }
}

fn join_with_slash(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) if !base.is_empty() => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStatus {
    Idle,
    Connecting,
    Connected,
    /// Teardown in progress; new sessions are rejected until it ends
    Disconnecting,
}

/// Read-only view of the current session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceSnapshot {
    pub status: VoiceStatus,
    pub muted: bool,
    pub session_id: Option<String>,
    pub has_mic_stream: bool,
    pub mic_stream_is_owned: bool,
    pub has_bot_stream: bool,
}

struct VoiceSession {
    status: VoiceStatus,
    muted: bool,
    session_id: Option<String>,
    mic_stream: Option<MediaStream>,
    /// Locally acquired streams must be stopped by us; transport tracks are not ours
    mic_stream_is_owned: bool,
    bot_stream: Option<MediaStream>,
    client: Option<Arc<dyn RealtimeClient>>,
    event_task: Option<JoinHandle<()>>,
    /// Bumped by every start and cleanup so stale work can tell it was superseded
    epoch: u64,
}

impl Default for VoiceSession {
    fn default() -> Self {
        Self {
            status: VoiceStatus::Idle,
            muted: false,
            session_id: None,
            mic_stream: None,
            mic_stream_is_owned: false,
            bot_stream: None,
            client: None,
            event_task: None,
            epoch: 0,
        }
    }
}

struct Inner {
    settings: VoiceSettings,
    factory: Box<dyn ClientFactory>,
    devices: Box<dyn MediaDevices>,
    session: Mutex<VoiceSession>,
    transcripts: mpsc::UnboundedSender<TranscriptEvent>,
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, VoiceSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: TranscriptEvent) {
        if self.transcripts.send(event).is_err() {
            debug!("Transcript receiver dropped");
        }
    }
}

/// Owns the lifecycle of a single real-time voice connection
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct VoiceController {
    inner: Arc<Inner>,
}

impl VoiceController {
    /// Create a controller and the receiving end of its transcript stream
    pub fn new(
        settings: VoiceSettings,
        factory: Box<dyn ClientFactory>,
        devices: Box<dyn MediaDevices>,
    ) -> (Self, mpsc::UnboundedReceiver<TranscriptEvent>) {
        let (transcripts, transcript_rx) = mpsc::unbounded_channel();

        let controller = Self {
            inner: Arc::new(Inner {
                settings,
                factory,
                devices,
                session: Mutex::new(VoiceSession::default()),
                transcripts,
            }),
        };

        (controller, transcript_rx)
    }

    /// Start a voice session for the given chat
    ///
    /// Rejects with `AlreadyConnected` while another session is connecting,
    /// connected or being torn down. Any failure releases what was acquired
    /// and leaves the controller idle.
    pub async fn start(&self, session_id: &str) -> Result<(), VoiceError> {
        let epoch = {
            let mut session = self.inner.session();
            if session.status != VoiceStatus::Idle {
                warn!("Voice session already active ({:?})", session.status);
                return Err(VoiceError::AlreadyConnected);
            }
            session.status = VoiceStatus::Connecting;
            session.muted = false;
            session.session_id = Some(session_id.to_string());
            session.epoch += 1;
            session.epoch
        };

        info!("Starting voice session for chat {}", session_id);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let client: Arc<dyn RealtimeClient> = Arc::from(self.inner.factory.create(event_tx));

        match self.connect(session_id, epoch, &client, event_rx).await {
            Ok(()) => {
                info!("Voice session connected via {}", client.name());
                Ok(())
            }
            Err(e) => {
                error!("Error initializing voice connection: {:#}", e);
                if self.is_current(epoch) {
                    self.cleanup();
                } else {
                    // Cleanup already ran while we were connecting and only
                    // disconnects sessions that reached Connected.
                    spawn_disconnect(client);
                }
                Err(VoiceError::ConnectionFailed(e))
            }
        }
    }

    async fn connect(
        &self,
        session_id: &str,
        epoch: u64,
        client: &Arc<dyn RealtimeClient>,
        event_rx: mpsc::UnboundedReceiver<ClientEvent>,
    ) -> Result<()> {
        {
            let mut session = self.inner.session();
            ensure_current(&session, epoch)?;
            session.client = Some(Arc::clone(client));
            session.event_task = Some(tokio::spawn(relay_events(
                Arc::downgrade(&self.inner),
                Arc::clone(client),
                event_rx,
                epoch,
                session_id.to_string(),
            )));
        }

        client
            .init_devices()
            .await
            .context("Failed to initialize devices")?;

        {
            // Held across enable_mic so cleanup cannot interleave
            let session = self.inner.session();
            ensure_current(&session, epoch)?;
            client.enable_mic(true);
        }

        client
            .start_bot_and_connect(self.inner.settings.connect_request())
            .await
            .context("Failed to connect to voice back-end")?;

        {
            let mut session = self.inner.session();
            ensure_current(&session, epoch)?;
            session.status = VoiceStatus::Connected;
            session.muted = false;
        }

        let (stream, owned) = self.acquire_mic_stream(client.as_ref()).await?;

        let mut session = self.inner.session();
        if session.epoch != epoch {
            if owned {
                stream.stop_all();
            }
            bail!("Voice session was cleaned up while acquiring the microphone");
        }
        session.mic_stream = Some(stream);
        session.mic_stream_is_owned = owned;

        Ok(())
    }

    /// Microphone stream for the waveform; returns whether we own its tracks
    async fn acquire_mic_stream(&self, client: &dyn RealtimeClient) -> Result<(MediaStream, bool)> {
        let tracks = client.tracks();
        if let Some(track) = tracks.user_audio.or(tracks.local_audio) {
            debug!("Using transport microphone track {}", track.id());
            return Ok((MediaStream::new(vec![track]), false));
        }

        let stream = self
            .inner
            .devices
            .get_user_media()
            .await
            .context("Failed to acquire microphone")?;
        debug!("Acquired local microphone stream {}", stream.id());

        Ok((stream, true))
    }

    /// Flip the mute state; returns the new state
    pub fn toggle_mute(&self) -> Result<bool, VoiceError> {
        let muted = {
            let mut session = self.inner.session();
            if session.status != VoiceStatus::Connected {
                return Err(VoiceError::NotConnected);
            }
            session.muted = !session.muted;
            if let Some(client) = &session.client {
                client.enable_mic(!session.muted);
            }
            session.muted
        };

        info!("Microphone {}", if muted { "muted" } else { "unmuted" });
        Ok(muted)
    }

    /// Tear down the session from any state
    ///
    /// Never fails and may be called repeatedly. Always ends by emitting an
    /// empty partial user transcript so consumers finalize the bot's reply.
    pub fn cleanup(&self) {
        let (client, was_connected, mic_stream, mic_owned, event_task) = {
            let mut session = self.inner.session();
            let was_connected = session.status == VoiceStatus::Connected;
            session.status = VoiceStatus::Disconnecting;
            session.muted = false;
            session.epoch += 1;
            (
                session.client.take(),
                was_connected,
                session.mic_stream.take(),
                std::mem::replace(&mut session.mic_stream_is_owned, false),
                session.event_task.take(),
            )
        };

        if let Some(client) = client {
            // Mic goes off before the disconnect is even scheduled
            client.enable_mic(false);
            if was_connected {
                spawn_disconnect(client);
            }
        }

        if let Some(stream) = mic_stream {
            if mic_owned {
                stream.stop_all();
            }
        }

        if let Some(task) = event_task {
            task.abort();
        }

        {
            let mut session = self.inner.session();
            session.status = VoiceStatus::Idle;
            session.muted = false;
            session.session_id = None;
            session.bot_stream = None;
        }

        info!("Voice session cleaned up");
        self.inner.emit(TranscriptEvent::end_of_session());
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        let session = self.inner.session();
        VoiceSnapshot {
            status: session.status,
            muted: session.muted,
            session_id: session.session_id.clone(),
            has_mic_stream: session.mic_stream.is_some(),
            mic_stream_is_owned: session.mic_stream_is_owned,
            has_bot_stream: session.bot_stream.is_some(),
        }
    }

    pub fn status(&self) -> VoiceStatus {
        self.inner.session().status
    }

    pub fn is_muted(&self) -> bool {
        self.inner.session().muted
    }

    pub fn mic_stream(&self) -> Option<MediaStream> {
        self.inner.session().mic_stream.clone()
    }

    pub fn bot_stream(&self) -> Option<MediaStream> {
        self.inner.session().bot_stream.clone()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.inner.session().epoch == epoch
    }
}

fn ensure_current(session: &VoiceSession, epoch: u64) -> Result<()> {
    if session.epoch != epoch {
        bail!("Voice session was cleaned up while connecting");
    }
    Ok(())
}

/// Close a client without waiting; errors are only logged
fn spawn_disconnect(client: Arc<dyn RealtimeClient>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = client.disconnect().await {
                    warn!("Failed to disconnect {}: {:#}", client.name(), e);
                }
            });
        }
        Err(_) => warn!("No async runtime, skipping disconnect of {}", client.name()),
    }
}

/// Forward client events for one session until the client goes away
async fn relay_events(
    weak: Weak<Inner>,
    client: Arc<dyn RealtimeClient>,
    mut events: mpsc::UnboundedReceiver<ClientEvent>,
    epoch: u64,
    chat_id: String,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = weak.upgrade() else {
            break;
        };
        if inner.session().epoch != epoch {
            debug!("Dropping event from superseded session: {:?}", event);
            continue;
        }

        match event {
            ClientEvent::Connected => info!("Voice client connected"),
            ClientEvent::Disconnected => info!("Voice client disconnected"),
            ClientEvent::BotReady => {
                let data = serde_json::json!({
                    "chatId": chat_id,
                    "access_token": inner.settings.access_token(),
                });
                if let Err(e) = client.send_client_message("chat_meta", data).await {
                    warn!("Failed to send chat metadata: {:#}", e);
                }
            }
            ClientEvent::TrackStarted { track, participant } => {
                let remote = participant.is_some_and(|p| !p.local);
                if remote && track.kind() == TrackKind::Audio {
                    debug!("Bot audio track started: {}", track.id());
                    inner.session().bot_stream = Some(MediaStream::new(vec![track]));
                }
            }
            ClientEvent::TrackStopped { track, .. } => {
                let mut session = inner.session();
                if session.bot_stream.as_ref().is_some_and(|s| s.contains(&track)) {
                    debug!("Bot audio track stopped: {}", track.id());
                    session.bot_stream = None;
                }
            }
            ClientEvent::UserTranscript { text, is_final } => {
                inner.emit(TranscriptEvent::User { text, is_final });
            }
            ClientEvent::BotOutput { text, spoken } => {
                inner.emit(TranscriptEvent::Bot { text, spoken });
            }
            ClientEvent::MessageError(e) => error!("Message error: {}", e),
            ClientEvent::Error(e) => error!("Voice client error: {}", e),
        }
    }

    debug!("Voice event relay stopped");
}
