//! Text-to-speech clients.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SpeechError;
use crate::voice::VoiceName;

/// What to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceName,
    pub speed: f32,
}

/// A service that renders text to encoded audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render `request`, returning MP3 bytes.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError>;
}

/// Client for `POST {base_url}/audio/speech`.
pub struct OpenAiSpeechClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiSpeechClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechError::Service(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/audio/speech", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn wire_request<'a>(&'a self, request: &'a SpeechRequest) -> TtsRequest<'a> {
        TtsRequest {
            model: &self.model,
            voice: request.voice,
            input: &request.text,
            speed: request.speed,
            response_format: "mp3",
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.wire_request(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TtsErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(SpeechError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    voice: VoiceName,
    input: &'a str,
    speed: f32,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TtsErrorResponse {
    error: TtsErrorDetail,
}

#[derive(Debug, Deserialize)]
struct TtsErrorDetail {
    message: String,
}
