//! Speech for the showroom assistant.
//!
//! Chooses a voice and speaking rate from the conversation mood, renders
//! replies through a text-to-speech service, and falls back to a
//! client-side utterance when that service is unavailable. Also gates
//! recognised transcripts by confidence and maps recognition error codes
//! to visitor-facing messages.

pub mod error;
pub mod recognition;
pub mod service;
pub mod synth;
pub mod voice;

pub use error::SpeechError;
pub use recognition::{RecognitionError, TranscriptDecision, TranscriptGate};
pub use service::{FallbackUtterance, SpeechOutput, SpeechService};
pub use synth::{OpenAiSpeechClient, SpeechRequest, SpeechSynthesizer};
pub use voice::{calculate_speed, select_voice, SpeechEmotion, SpeechOptions, VoiceInfo, VoiceName};
