use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("A voice session is already active")]
    AlreadyConnected,

    #[error("Voice connection failed: {0:#}")]
    ConnectionFailed(#[source] anyhow::Error),

    #[error("No voice session is connected")]
    NotConnected,
}
