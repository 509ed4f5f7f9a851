use super::messages::{
    ClientMessage, ConnectMessage, ConnectReply, ServerEvent, TrackKindMessage,
};
use crate::voice::{
    ClientEvent, ClientEventSender, ClientFactory, ConnectRequest, MediaTrack, RealtimeClient,
    TrackKind, TrackOwner, Tracks,
};
use anyhow::{bail, Context, Result};
use futures::stream::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Subject the voice gateway answers connect requests on
pub const CONNECT_SUBJECT: &str = "voice-bff.connect";

pub fn events_subject(session_id: &str) -> String {
    format!("voice.{}.events", session_id)
}

pub fn client_subject(session_id: &str) -> String {
    format!("voice.{}.client", session_id)
}

#[derive(Default)]
struct ConnectionState {
    nats: Option<async_nats::Client>,
    session_id: Option<String>,
    /// Microphone track held by the transport
    mic_track: Option<MediaTrack>,
    /// Remote tracks by gateway track id
    remote_tracks: HashMap<String, MediaTrack>,
    event_task: Option<JoinHandle<()>>,
}

/// Real-time voice client speaking to the voice gateway over NATS
pub struct NatsVoiceClient {
    nats_url: String,
    device: String,
    events: ClientEventSender,
    mic_enabled: Arc<AtomicBool>,
    state: Arc<Mutex<ConnectionState>>,
}

impl NatsVoiceClient {
    pub fn new(nats_url: impl Into<String>, device: impl Into<String>, events: ClientEventSender) -> Self {
        Self {
            nats_url: nats_url.into(),
            device: device.into(),
            events,
            mic_enabled: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(ConnectionState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConnectionState> {
        lock(&self.state)
    }

    /// NATS connection and session id, once connected
    fn connection(&self) -> Option<(async_nats::Client, String)> {
        let state = self.state();
        Some((state.nats.clone()?, state.session_id.clone()?))
    }

    /// Drop a half-open session: stop the subscriber task and the mic track
    fn release_session(&self) {
        let (event_task, mic_track) = {
            let mut state = self.state();
            state.session_id = None;
            (state.event_task.take(), state.mic_track.take())
        };

        if let Some(task) = event_task {
            task.abort();
        }
        if let Some(track) = mic_track {
            track.stop();
        }
        debug!("Released half-open voice session");
    }

    async fn publish(nats: &async_nats::Client, session_id: &str, message: &ClientMessage) -> Result<()> {
        let payload = serde_json::to_vec(message)?;
        nats.publish(client_subject(session_id), payload.into())
            .await
            .context("Failed to publish client message")?;
        Ok(())
    }
}

fn lock(state: &Mutex<ConnectionState>) -> MutexGuard<'_, ConnectionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl RealtimeClient for NatsVoiceClient {
    async fn init_devices(&self) -> Result<()> {
        info!("Connecting to NATS at {}", self.nats_url);

        let nats = async_nats::connect(self.nats_url.as_str())
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        let mut state = self.state();
        state.nats = Some(nats);
        state.mic_track = Some(MediaTrack::audio(self.device.clone()));
        Ok(())
    }

    fn enable_mic(&self, enabled: bool) {
        self.mic_enabled.store(enabled, Ordering::SeqCst);

        let Some((nats, session_id)) = self.connection() else {
            return;
        };
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = Self::publish(&nats, &session_id, &ClientMessage::Mic { enabled }).await {
                    warn!("Failed to publish mic state: {:#}", e);
                }
            });
        }
    }

    async fn start_bot_and_connect(&self, request: ConnectRequest) -> Result<()> {
        let nats = self
            .state()
            .nats
            .clone()
            .context("Devices not initialized")?;

        let message = ConnectMessage {
            endpoint: request.endpoint.clone(),
            access_token: request.request_data.access_token,
            language: request.request_data.language,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        info!("Requesting voice bot at {}", request.endpoint);

        let response = nats
            .request(CONNECT_SUBJECT.to_string(), serde_json::to_vec(&message)?.into())
            .await
            .context("Voice gateway did not answer connect request")?;

        let reply: ConnectReply =
            serde_json::from_slice(&response.payload).context("Invalid connect reply")?;

        let session_id = match reply {
            ConnectReply { ok: true, session_id: Some(id), .. } => id,
            ConnectReply { error, .. } => bail!(
                "Voice gateway refused connection: {}",
                error.unwrap_or_else(|| "no reason given".to_string())
            ),
        };

        let subject = events_subject(&session_id);
        let mut subscriber = nats
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to voice events")?;

        info!("Subscribed to {}", subject);

        let events = self.events.clone();
        let state = Arc::clone(&self.state);
        let event_task = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<ServerEvent>(&msg.payload) {
                    Ok(event) => {
                        let event = to_client_event(&state, event);
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Failed to parse voice event: {}", e),
                }
            }
            debug!("Voice event subscription ended");
        });

        {
            let mut state = self.state();
            state.session_id = Some(session_id.clone());
            state.event_task = Some(event_task);
        }

        let enabled = self.mic_enabled.load(Ordering::SeqCst);
        if let Err(e) = Self::publish(&nats, &session_id, &ClientMessage::Mic { enabled }).await {
            self.release_session();
            return Err(e);
        }

        let _ = self.events.send(ClientEvent::Connected);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let (nats, session_id, event_task, mic_track, remote_tracks) = {
            let mut state = self.state();
            (
                state.nats.take(),
                state.session_id.take(),
                state.event_task.take(),
                state.mic_track.take(),
                std::mem::take(&mut state.remote_tracks),
            )
        };

        if let Some(task) = event_task {
            task.abort();
        }
        if let Some(track) = mic_track {
            track.stop();
        }
        for track in remote_tracks.values() {
            track.stop();
        }

        let result = match (nats, session_id) {
            (Some(nats), Some(session_id)) => {
                info!("Closing voice session {}", session_id);
                let published = Self::publish(&nats, &session_id, &ClientMessage::Disconnect).await;
                if let Err(e) = nats.flush().await {
                    error!("Failed to flush NATS connection: {}", e);
                }
                published
            }
            _ => Ok(()),
        };

        let _ = self.events.send(ClientEvent::Disconnected);
        result
    }

    fn tracks(&self) -> Tracks {
        let state = self.state();
        Tracks {
            user_audio: None,
            local_audio: state.mic_track.clone(),
            bot_audio: state
                .remote_tracks
                .values()
                .find(|t| t.kind() == TrackKind::Audio)
                .cloned(),
        }
    }

    async fn send_client_message(&self, msg_type: &str, data: serde_json::Value) -> Result<()> {
        let Some((nats, session_id)) = self.connection() else {
            bail!("Not connected to a voice session");
        };

        let message = ClientMessage::App {
            msg_type: msg_type.to_string(),
            data,
        };
        Self::publish(&nats, &session_id, &message).await
    }

    fn name(&self) -> &str {
        "nats"
    }
}

/// Translate a gateway event, keeping the remote track table current
fn to_client_event(state: &Mutex<ConnectionState>, event: ServerEvent) -> ClientEvent {
    match event {
        ServerEvent::BotReady => ClientEvent::BotReady,
        ServerEvent::TrackStarted {
            track_id,
            kind,
            participant_id,
            local,
        } => {
            let kind = match kind {
                TrackKindMessage::Audio => TrackKind::Audio,
                TrackKindMessage::Video => TrackKind::Video,
            };
            let track = lock(state)
                .remote_tracks
                .entry(track_id.clone())
                .or_insert_with(|| MediaTrack::new(kind, track_id))
                .clone();
            ClientEvent::TrackStarted {
                track,
                participant: Some(TrackOwner {
                    id: participant_id,
                    local,
                }),
            }
        }
        ServerEvent::TrackStopped {
            track_id,
            participant_id,
            local,
        } => {
            let track = lock(state)
                .remote_tracks
                .remove(&track_id)
                .unwrap_or_else(|| MediaTrack::audio(track_id));
            track.stop();
            ClientEvent::TrackStopped {
                track,
                participant: Some(TrackOwner {
                    id: participant_id,
                    local,
                }),
            }
        }
        ServerEvent::UserTranscript { text, is_final } => ClientEvent::UserTranscript { text, is_final },
        ServerEvent::BotOutput { text, spoken } => ClientEvent::BotOutput { text, spoken },
        ServerEvent::MessageError { message } => ClientEvent::MessageError(message),
        ServerEvent::Error { message } => ClientEvent::Error(message),
        ServerEvent::Disconnected => ClientEvent::Disconnected,
    }
}

/// Creates a [`NatsVoiceClient`] per session
pub struct NatsClientFactory {
    nats_url: String,
    device: String,
}

impl NatsClientFactory {
    pub fn new(nats_url: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            nats_url: nats_url.into(),
            device: device.into(),
        }
    }
}

impl ClientFactory for NatsClientFactory {
    fn create(&self, events: ClientEventSender) -> Box<dyn RealtimeClient> {
        Box::new(NatsVoiceClient::new(self.nats_url.clone(), self.device.clone(), events))
    }
}
