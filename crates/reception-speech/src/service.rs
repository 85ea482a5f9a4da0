//! Speech service: voice state plus synthesis with client-side fallback.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use reception_core::config::SpeechConfig;
use reception_core::ReceptionConfig;

use crate::error::SpeechError;
use crate::synth::{OpenAiSpeechClient, SpeechRequest, SpeechSynthesizer};
use crate::voice::{calculate_speed, select_voice, SpeechOptions, VoiceInfo, VoiceName};

/// Rate used by the client-side synthesizer when no speed is requested.
pub const FALLBACK_RATE: f32 = 0.95;
/// Pitch used by the client-side synthesizer when none is requested.
pub const FALLBACK_PITCH: f32 = 1.1;

/// Instructions for the browser's built-in speech synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackUtterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Outcome of a speak request.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutput {
    /// MP3 audio rendered by the text-to-speech service.
    Audio {
        bytes: Vec<u8>,
        voice: VoiceName,
        speed: f32,
    },
    /// Premium synthesis unavailable; the client should speak this itself.
    Fallback(FallbackUtterance),
}

/// Speaks assistant replies.
pub struct SpeechService {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    current_voice: RwLock<VoiceName>,
    base_speed: f32,
    language: String,
}

impl SpeechService {
    pub fn new(config: &SpeechConfig, synthesizer: Option<Arc<dyn SpeechSynthesizer>>) -> Self {
        let voice = config.default_voice.parse().unwrap_or_else(|e| {
            warn!("{}; using {}", e, VoiceName::default());
            VoiceName::default()
        });
        Self {
            synthesizer,
            current_voice: RwLock::new(voice),
            base_speed: config.base_speed,
            language: config.language.clone(),
        }
    }

    /// Build from configuration. The OpenAI client is used when an API key
    /// is configured; otherwise every request falls back.
    pub fn from_config(config: &ReceptionConfig) -> Result<Self, SpeechError> {
        let synthesizer: Option<Arc<dyn SpeechSynthesizer>> = match config.llm.api_key.as_deref() {
            Some(key) if !config.demo_mode() => {
                let client = OpenAiSpeechClient::new(
                    key,
                    &config.llm.base_url,
                    config.speech.tts_model.clone(),
                    Duration::from_secs(config.llm.timeout_secs),
                )?;
                info!(model = %config.speech.tts_model, "Text-to-speech client configured");
                Some(Arc::new(client))
            }
            _ => None,
        };
        Ok(Self::new(&config.speech, synthesizer))
    }

    pub fn has_synthesizer(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn current_voice(&self) -> VoiceName {
        self.current_voice
            .read()
            .map(|v| *v)
            .unwrap_or_default()
    }

    pub fn set_voice(&self, voice: VoiceName) {
        match self.current_voice.write() {
            Ok(mut current) => {
                *current = voice;
                info!(voice = %voice, "Voice changed");
            }
            Err(e) => warn!("Voice lock poisoned: {}", e),
        }
    }

    pub fn available_voices(&self) -> Vec<VoiceInfo> {
        VoiceName::ALL.iter().map(|v| v.info()).collect()
    }

    /// Speak `text`. Synthesis failures degrade to a fallback utterance;
    /// only empty text is an error.
    pub async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<SpeechOutput, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let Some(synthesizer) = &self.synthesizer else {
            debug!("No speech synthesizer configured; using fallback utterance");
            return Ok(SpeechOutput::Fallback(self.fallback(text, options)));
        };

        // Explicit voice, then the emotion's voice, then the current voice.
        let voice = match options.emotion {
            Some(emotion) => select_voice(emotion, options.voice),
            None => options.voice.unwrap_or_else(|| self.current_voice()),
        };
        let emotion = options.emotion.unwrap_or_default();
        let speed = calculate_speed(options.speed.unwrap_or(self.base_speed), emotion);
        let request = SpeechRequest {
            text: text.to_string(),
            voice,
            speed,
        };

        match synthesizer.synthesize(&request).await {
            Ok(bytes) => {
                debug!(voice = %voice, speed, bytes = bytes.len(), "Speech synthesized");
                Ok(SpeechOutput::Audio { bytes, voice, speed })
            }
            Err(e) => {
                warn!(error = %e, "Speech synthesis failed, using fallback utterance");
                Ok(SpeechOutput::Fallback(self.fallback(text, options)))
            }
        }
    }

    fn fallback(&self, text: &str, options: &SpeechOptions) -> FallbackUtterance {
        FallbackUtterance {
            text: text.to_string(),
            lang: self.language.clone(),
            rate: options.speed.unwrap_or(FALLBACK_RATE),
            pitch: options.pitch.unwrap_or(FALLBACK_PITCH),
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::SpeechEmotion;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSynth {
        last: Mutex<Option<SpeechRequest>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynth {
        async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(vec![0xFF, 0xFB, 0x90])
        }
    }

    struct FailingSynth;

    #[async_trait]
    impl SpeechSynthesizer for FailingSynth {
        async fn synthesize(&self, _: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
            Err(SpeechError::Http {
                status: 500,
                message: "overloaded".to_string(),
            })
        }
    }

    fn service(synth: Option<Arc<dyn SpeechSynthesizer>>) -> SpeechService {
        SpeechService::new(&SpeechConfig::default(), synth)
    }

    // ---- Voice state ----

    #[test]
    fn test_default_voice_from_config() {
        assert_eq!(service(None).current_voice(), VoiceName::Nova);
    }

    #[test]
    fn test_invalid_configured_voice_uses_default() {
        let config = SpeechConfig {
            default_voice: "robot".to_string(),
            ..SpeechConfig::default()
        };
        let svc = SpeechService::new(&config, None);
        assert_eq!(svc.current_voice(), VoiceName::Nova);
    }

    #[test]
    fn test_set_voice() {
        let svc = service(None);
        svc.set_voice(VoiceName::Echo);
        assert_eq!(svc.current_voice(), VoiceName::Echo);
        assert_eq!(svc.available_voices().len(), 6);
    }

    // ---- Speaking ----

    #[tokio::test]
    async fn test_empty_text_is_error() {
        let svc = service(None);
        assert!(matches!(
            svc.speak("  ", &SpeechOptions::default()).await,
            Err(SpeechError::EmptyText)
        ));
    }

    #[tokio::test]
    async fn test_no_synthesizer_falls_back_with_defaults() {
        let svc = service(None);
        let out = svc.speak("Olá!", &SpeechOptions::default()).await.unwrap();
        match out {
            SpeechOutput::Fallback(u) => {
                assert_eq!(u.lang, "pt-BR");
                assert!((u.rate - FALLBACK_RATE).abs() < f32::EPSILON);
                assert!((u.pitch - FALLBACK_PITCH).abs() < f32::EPSILON);
                assert!((u.volume - 1.0).abs() < f32::EPSILON);
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fallback_uses_requested_speed_and_pitch() {
        let svc = service(None);
        let opts = SpeechOptions {
            speed: Some(1.3),
            pitch: Some(0.8),
            ..SpeechOptions::default()
        };
        let SpeechOutput::Fallback(u) = svc.speak("oi", &opts).await.unwrap() else {
            panic!("expected fallback");
        };
        assert!((u.rate - 1.3).abs() < f32::EPSILON);
        assert!((u.pitch - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_synthesizer_failure_falls_back() {
        let svc = service(Some(Arc::new(FailingSynth)));
        let out = svc.speak("Olá!", &SpeechOptions::default()).await.unwrap();
        assert!(matches!(out, SpeechOutput::Fallback(_)));
    }

    #[tokio::test]
    async fn test_audio_uses_current_voice_and_emotion_speed() {
        let synth = Arc::new(RecordingSynth::default());
        let svc = service(Some(synth.clone() as Arc<dyn SpeechSynthesizer>));
        let opts = SpeechOptions {
            emotion: Some(SpeechEmotion::Excited),
            ..SpeechOptions::default()
        };
        let out = svc.speak("Vamos!", &opts).await.unwrap();
        let SpeechOutput::Audio { bytes, voice, speed } = out else {
            panic!("expected audio");
        };
        assert_eq!(bytes, vec![0xFF, 0xFB, 0x90]);
        assert_eq!(voice, VoiceName::Nova);
        assert!((speed - 1.1).abs() < 1e-6);

        let sent = synth.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.text, "Vamos!");
    }

    #[tokio::test]
    async fn test_no_emotion_uses_current_voice() {
        let synth = Arc::new(RecordingSynth::default());
        let svc = service(Some(synth.clone() as Arc<dyn SpeechSynthesizer>));
        svc.set_voice(VoiceName::Echo);
        svc.speak("oi", &SpeechOptions::default()).await.unwrap();
        let sent = synth.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.voice, VoiceName::Echo);
        assert!((sent.speed - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_emotion_voice_overrides_current() {
        let synth = Arc::new(RecordingSynth::default());
        let svc = service(Some(synth.clone() as Arc<dyn SpeechSynthesizer>));
        svc.set_voice(VoiceName::Echo);
        let opts = SpeechOptions {
            emotion: Some(SpeechEmotion::Concerned),
            ..SpeechOptions::default()
        };
        svc.speak("entendo", &opts).await.unwrap();
        assert_eq!(synth.last.lock().unwrap().as_ref().unwrap().voice, VoiceName::Shimmer);
    }

    #[tokio::test]
    async fn test_explicit_voice_overrides_current() {
        let synth = Arc::new(RecordingSynth::default());
        let svc = service(Some(synth.clone() as Arc<dyn SpeechSynthesizer>));
        svc.set_voice(VoiceName::Echo);
        let opts = SpeechOptions {
            voice: Some(VoiceName::Onyx),
            ..SpeechOptions::default()
        };
        svc.speak("oi", &opts).await.unwrap();
        assert_eq!(synth.last.lock().unwrap().as_ref().unwrap().voice, VoiceName::Onyx);
    }

    #[test]
    fn test_from_config_demo_has_no_synthesizer() {
        let svc = SpeechService::from_config(&ReceptionConfig::default()).unwrap();
        assert!(!svc.has_synthesizer());
    }
}
