use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug)]
struct TrackInner {
    id: String,
    kind: TrackKind,
    label: String,
    live: AtomicBool,
}

/// Handle to a live media track
///
/// Clones share the same underlying track, so stopping one clone stops all.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                id: Uuid::new_v4().to_string(),
                kind,
                label: label.into(),
                live: AtomicBool::new(true),
            }),
        }
    }

    pub fn audio(label: impl Into<String>) -> Self {
        Self::new(TrackKind::Audio, label)
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> TrackKind {
        self.inner.kind
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Stop the track; stopping twice is harmless
    pub fn stop(&self) {
        if self.inner.live.swap(false, Ordering::SeqCst) {
            debug!("Stopped {:?} track {} ({})", self.kind(), self.id(), self.label());
        }
    }

    pub fn same_track(&self, other: &MediaTrack) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A group of tracks played or captured together
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn contains(&self, track: &MediaTrack) -> bool {
        self.tracks.iter().any(|t| t.same_track(track))
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// Local capture devices
#[async_trait::async_trait]
pub trait MediaDevices: Send + Sync {
    /// Acquire a fresh microphone stream; the caller owns its tracks
    async fn get_user_media(&self) -> Result<MediaStream>;
}

/// Opens the configured input device as a single audio track
pub struct LocalMicrophone {
    device: String,
}

impl LocalMicrophone {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

#[async_trait::async_trait]
impl MediaDevices for LocalMicrophone {
    async fn get_user_media(&self) -> Result<MediaStream> {
        info!("Opening microphone: {}", self.device);
        Ok(MediaStream::new(vec![MediaTrack::audio(self.device.clone())]))
    }
}
