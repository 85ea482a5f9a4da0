use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// Top-level configuration for the receptionist.
///
/// Loaded from `reception.toml` by default. Every section and field is
/// optional in the file; missing values take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceptionConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl ReceptionConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReceptionConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file if it exists.
    ///
    /// Returns `Ok(None)` when there is no file. A file that exists but
    /// cannot be read or parsed is an error, never silently replaced by
    /// defaults.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("No configuration file at {}", path.display());
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// True when no chat-completion key is configured and replies come from
    /// the canned set.
    pub fn demo_mode(&self) -> bool {
        self.llm.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP port the API listens on.
    pub port: u16,
    /// Maximum accepted visitor message length, in characters.
    pub max_message_length: usize,
    /// Requests per second accepted on routes that call the AI services.
    pub rate_limit_per_sec: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3080,
            max_message_length: 2000,
            rate_limit_per_sec: 20,
        }
    }
}

/// Chat-completion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key. When absent the assistant runs in demo mode.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
    /// Prior messages sent along with each request.
    pub history_size: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.8,
            max_tokens: 250,
            presence_penalty: 0.2,
            frequency_penalty: 0.1,
            top_p: 0.9,
            timeout_secs: 30,
            history_size: 20,
        }
    }
}

/// Text-to-speech and recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub tts_model: String,
    /// Voice used until a client picks another one.
    pub default_voice: String,
    /// Speed before emotion modifiers are applied.
    pub base_speed: f32,
    /// Transcripts below this confidence are rejected.
    pub min_confidence: f32,
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            tts_model: "tts-1".to_string(),
            default_voice: "nova".to_string(),
            base_speed: 1.0,
            min_confidence: 0.5,
            language: "pt-BR".to_string(),
        }
    }
}

/// Session lifetime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle minutes after which a session is treated as expired.
    pub timeout_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
        }
    }
}
