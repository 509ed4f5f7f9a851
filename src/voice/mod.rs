//! Voice chat session management
//!
//! This module provides the `VoiceController` that manages:
//! - The connect / mute / cleanup lifecycle of one real-time voice session
//! - Microphone stream ownership (local device vs. transport track)
//! - Relaying user and bot transcripts to the chat state
//!
//! The real-time client is abstracted behind `RealtimeClient` so the
//! controller can run against the NATS gateway or a test fake.

mod client;
mod controller;
mod error;
mod events;
mod media;
mod meter;

pub use client::{ClientEventSender, ClientFactory, ConnectRequest, RealtimeClient, RequestData};
pub use controller::{VoiceController, VoiceSettings, VoiceSnapshot, VoiceStatus, CONNECT_PATH};
pub use error::VoiceError;
pub use events::{ClientEvent, TrackOwner, Tracks, TranscriptEvent};
pub use media::{LocalMicrophone, MediaDevices, MediaStream, MediaTrack, TrackKind};
pub use meter::{rms, AudioMeter, WAVEFORM_BARS};
