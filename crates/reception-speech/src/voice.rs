//! Voice catalog and the emotion-driven voice/speed policy.

use serde::{Deserialize, Serialize};
use std::fmt;

use reception_core::EmotionalState;

pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

// =============================================================================
// Voices
// =============================================================================

/// Text-to-speech voices offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceName {
    Alloy,
    Echo,
    Fable,
    Onyx,
    #[default]
    Nova,
    Shimmer,
}

impl VoiceName {
    pub const ALL: [VoiceName; 6] = [
        VoiceName::Alloy,
        VoiceName::Echo,
        VoiceName::Fable,
        VoiceName::Onyx,
        VoiceName::Nova,
        VoiceName::Shimmer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VoiceName::Alloy => "alloy",
            VoiceName::Echo => "echo",
            VoiceName::Fable => "fable",
            VoiceName::Onyx => "onyx",
            VoiceName::Nova => "nova",
            VoiceName::Shimmer => "shimmer",
        }
    }

    pub fn info(self) -> VoiceInfo {
        let (gender, tone) = match self {
            VoiceName::Alloy => ("female", "balanced"),
            VoiceName::Echo => ("male", "calm"),
            VoiceName::Fable => ("female", "expressive"),
            VoiceName::Onyx => ("male", "deep"),
            VoiceName::Nova => ("female", "energetic"),
            VoiceName::Shimmer => ("female", "soft"),
        };
        VoiceInfo {
            name: self,
            gender,
            tone,
        }
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoiceName {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceName::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Unknown voice: {}", s))
    }
}

/// Catalog entry describing a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    pub name: VoiceName,
    pub gender: &'static str,
    pub tone: &'static str,
}

// =============================================================================
// Emotions
// =============================================================================

/// Mood a reply should be spoken with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechEmotion {
    #[default]
    Neutral,
    Happy,
    Excited,
    Concerned,
    Cheerful,
    Friendly,
}

impl SpeechEmotion {
    fn voice(self) -> VoiceName {
        match self {
            SpeechEmotion::Excited | SpeechEmotion::Cheerful => VoiceName::Nova,
            SpeechEmotion::Happy => VoiceName::Fable,
            SpeechEmotion::Concerned => VoiceName::Shimmer,
            SpeechEmotion::Friendly | SpeechEmotion::Neutral => VoiceName::Alloy,
        }
    }

    fn speed_modifier(self) -> f32 {
        match self {
            SpeechEmotion::Excited => 1.1,
            SpeechEmotion::Happy | SpeechEmotion::Cheerful => 1.05,
            SpeechEmotion::Concerned => 0.9,
            SpeechEmotion::Neutral | SpeechEmotion::Friendly => 1.0,
        }
    }
}

impl From<EmotionalState> for SpeechEmotion {
    fn from(state: EmotionalState) -> Self {
        match state {
            EmotionalState::Neutral => SpeechEmotion::Neutral,
            EmotionalState::Positive => SpeechEmotion::Happy,
            EmotionalState::Curious => SpeechEmotion::Friendly,
            EmotionalState::Concerned => SpeechEmotion::Concerned,
            EmotionalState::Excited => SpeechEmotion::Excited,
        }
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Per-request speech options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechOptions {
    #[serde(default)]
    pub voice: Option<VoiceName>,
    #[serde(default)]
    pub emotion: Option<SpeechEmotion>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
}

/// Voice for an emotion; an explicitly preferred voice always wins.
pub fn select_voice(emotion: SpeechEmotion, preferred: Option<VoiceName>) -> VoiceName {
    preferred.unwrap_or_else(|| emotion.voice())
}

/// Speaking rate: `base` scaled by the emotion modifier, clamped to the
/// provider's accepted range.
pub fn calculate_speed(base: f32, emotion: SpeechEmotion) -> f32 {
    let speed = base * emotion.speed_modifier();
    if speed.is_nan() {
        return 1.0;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}
