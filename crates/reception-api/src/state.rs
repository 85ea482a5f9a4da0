//! Application state shared across route handlers.

use std::sync::Arc;
use std::time::Instant;

use reception_chat::{ChatError, ReceptionOrchestrator};
use reception_core::{ReceptionConfig, ReceptionError};
use reception_speech::{SpeechService, TranscriptGate};

/// Shared application state. Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReceptionConfig>,
    pub orchestrator: Arc<ReceptionOrchestrator>,
    pub speech: Arc<SpeechService>,
    pub transcript_gate: TranscriptGate,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: ReceptionConfig,
        orchestrator: ReceptionOrchestrator,
        speech: SpeechService,
    ) -> Self {
        let transcript_gate = TranscriptGate::new(config.speech.min_confidence);
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            speech: Arc::new(speech),
            transcript_gate,
            start_time: Instant::now(),
        }
    }

    /// Build the chat and speech services from configuration. Without an
    /// API key both run in demo mode.
    pub fn from_config(config: ReceptionConfig) -> Result<Self, ReceptionError> {
        let orchestrator = ReceptionOrchestrator::from_config(&config).map_err(ChatError::from)?;
        let speech = SpeechService::from_config(&config)?;
        Ok(Self::new(config, orchestrator, speech))
    }
}
