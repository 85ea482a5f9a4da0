//! Speech-to-text results arriving from the visitor's device.
//!
//! Recognition itself runs client-side; this module only decides whether a
//! transcript is good enough to act on, and turns recognizer error codes
//! into messages shown to the visitor.

use std::fmt;

use tracing::debug;

/// Reply when a transcript is empty or below the confidence threshold.
pub const LOW_CONFIDENCE_MESSAGE: &str =
    "Desculpe, não consegui entender bem. Pode repetir, por favor?";

/// Whether a transcript should be handed to the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptDecision {
    Accepted(String),
    Rejected { message: &'static str },
}

/// Confidence gate for recognized transcripts.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptGate {
    min_confidence: f32,
}

impl TranscriptGate {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn evaluate(&self, transcript: &str, confidence: f32) -> TranscriptDecision {
        let text = transcript.trim();
        if text.is_empty() || confidence.is_nan() || confidence < self.min_confidence {
            debug!(confidence, threshold = self.min_confidence, "Transcript rejected");
            return TranscriptDecision::Rejected {
                message: LOW_CONFIDENCE_MESSAGE,
            };
        }
        TranscriptDecision::Accepted(text.to_string())
    }
}

impl Default for TranscriptGate {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Failures reported by the device recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    NoSpeech,
    AudioCapture,
    NotAllowed,
    Network,
    /// The browser offers no recognizer.
    Unavailable,
    /// The recognizer refused to start.
    StartFailed,
    Other(String),
}

impl RecognitionError {
    /// Map a recognizer error code such as `no-speech`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => RecognitionError::NoSpeech,
            "audio-capture" => RecognitionError::AudioCapture,
            "not-allowed" => RecognitionError::NotAllowed,
            "network" => RecognitionError::Network,
            "unavailable" => RecognitionError::Unavailable,
            "start-failed" => RecognitionError::StartFailed,
            other => RecognitionError::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            RecognitionError::NoSpeech => "no-speech",
            RecognitionError::AudioCapture => "audio-capture",
            RecognitionError::NotAllowed => "not-allowed",
            RecognitionError::Network => "network",
            RecognitionError::Unavailable => "unavailable",
            RecognitionError::StartFailed => "start-failed",
            RecognitionError::Other(code) => code,
        }
    }

    /// Visitor-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            RecognitionError::NoSpeech => "Nenhuma fala detectada",
            RecognitionError::AudioCapture => "Microfone não detectado",
            RecognitionError::NotAllowed => "Permissão de microfone negada",
            RecognitionError::Network => "Erro de rede",
            RecognitionError::Unavailable => "Reconhecimento de voz não disponível neste navegador",
            RecognitionError::StartFailed => "Falha ao iniciar reconhecimento de voz",
            RecognitionError::Other(_) => "Erro no reconhecimento de voz",
        }
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
