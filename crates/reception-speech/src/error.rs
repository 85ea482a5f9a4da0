//! Error types for speech synthesis.

use reception_core::ReceptionError;

/// Errors from the speech subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("text to speak cannot be empty")]
    EmptyText,
    #[error("unknown voice: {0}")]
    UnknownVoice(String),
    #[error("speech service unreachable: {0}")]
    Network(String),
    #[error("speech service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("speech service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            SpeechError::Network(e.to_string())
        } else {
            SpeechError::Service(e.to_string())
        }
    }
}

impl From<SpeechError> for ReceptionError {
    fn from(err: SpeechError) -> Self {
        ReceptionError::Speech(err.to_string())
    }
}
