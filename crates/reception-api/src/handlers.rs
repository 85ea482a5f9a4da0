//! Route handlers.
//!
//! Each handler extracts path, query and body parameters, calls into the
//! orchestrator or speech service held by [`AppState`], and returns JSON.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reception_chat::prompt::summarize;
use reception_chat::{ChatReply, ConversationContext, QuickService, SessionSummary};
use reception_core::{ChatMessage, Vehicle, VehicleCode, VEHICLE_CATALOG};
use reception_speech::{
    FallbackUtterance, RecognitionError, SpeechEmotion, SpeechError, SpeechOptions, SpeechOutput,
    TranscriptDecision, VoiceInfo, VoiceName,
};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SessionParams {
    pub session_id: Option<Uuid>,
}

/// Body for POST /transcript. A recognizer failure is sent as `error`
/// instead of a transcript.
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f32,
    pub error: Option<String>,
    pub session_id: Option<Uuid>,
}

/// Body for POST /speech. The voice arrives as a plain name so an unknown
/// one is reported through [`SpeechError::UnknownVoice`].
#[derive(Debug, Deserialize)]
pub struct SpeechRequestBody {
    pub text: String,
    pub voice: Option<String>,
    pub emotion: Option<SpeechEmotion>,
    pub speed: Option<f32>,
    pub pitch: Option<f32>,
}

impl SpeechRequestBody {
    fn options(&self) -> Result<SpeechOptions, SpeechError> {
        let voice = match self.voice.as_deref() {
            Some(name) => Some(
                name.parse::<VoiceName>()
                    .map_err(|_| SpeechError::UnknownVoice(name.to_string()))?,
            ),
            None => None,
        };
        Ok(SpeechOptions {
            voice,
            emotion: self.emotion,
            speed: self.speed,
            pitch: self.pitch,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetVoiceRequest {
    pub voice: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: usize,
    pub demo_mode: bool,
    pub speech_synthesis: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub welcome: String,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub session_id: Uuid,
    pub context: ConversationContext,
    /// The context as it is appended to the system prompt.
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub accepted: bool,
    /// Message for the visitor when the transcript was not used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ChatReply>,
}

#[derive(Debug, Serialize)]
pub struct SpeechFallbackResponse {
    pub fallback: bool,
    pub utterance: FallbackUtterance,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub current: VoiceName,
    pub voices: Vec<VoiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct VehiclesResponse {
    pub vehicles: &'static [Vehicle],
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.orchestrator.session_count(),
        demo_mode: state.orchestrator.is_demo(),
        speech_synthesis: state.speech.has_synthesizer(),
    })
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    let (session_id, welcome) = state.orchestrator.start_session()?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id,
            welcome: welcome.to_string(),
        }),
    ))
}

/// GET /sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    let mut sessions = state.orchestrator.list_sessions();
    sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    Json(SessionsResponse { sessions })
}

/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orchestrator.delete_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/{id}/context
pub async fn get_context(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContextResponse>, ApiError> {
    let context = state.orchestrator.context(id)?;
    Ok(Json(context_response(id, context)))
}

/// POST /sessions/{id}/reset
pub async fn reset_context(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContextResponse>, ApiError> {
    let context = state.orchestrator.reset_context(id)?;
    Ok(Json(context_response(id, context)))
}

/// GET /sessions/{id}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state.orchestrator.history(id)?;
    Ok(Json(HistoryResponse {
        session_id: id,
        messages,
    }))
}

fn context_response(session_id: Uuid, context: ConversationContext) -> ContextResponse {
    let summary = summarize(&context);
    ContextResponse {
        session_id,
        context,
        summary,
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let reply = state
        .orchestrator
        .handle_message(&body.message, body.session_id)
        .await?;
    Ok(Json(reply))
}

/// POST /services/{service}?session_id=...
pub async fn quick_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
    Query(params): Query<SessionParams>,
) -> Result<Json<ChatReply>, ApiError> {
    let service = QuickService::parse(&service);
    let reply = state
        .orchestrator
        .handle_service(&service, params.session_id)
        .await?;
    Ok(Json(reply))
}

/// POST /transcript
///
/// Rejected transcripts and recognizer errors leave the session untouched.
pub async fn transcript(
    State(state): State<AppState>,
    Json(body): Json<TranscriptRequest>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    if let Some(code) = body.error.as_deref() {
        let err = RecognitionError::from_code(code);
        tracing::debug!(code = err.code(), "Recognizer reported an error");
        return Ok(Json(TranscriptResponse {
            accepted: false,
            message: Some(err.message().to_string()),
            reply: None,
        }));
    }

    match state
        .transcript_gate
        .evaluate(&body.transcript, body.confidence)
    {
        TranscriptDecision::Accepted(text) => {
            let reply = state
                .orchestrator
                .handle_message(&text, body.session_id)
                .await?;
            Ok(Json(TranscriptResponse {
                accepted: true,
                message: None,
                reply: Some(reply),
            }))
        }
        TranscriptDecision::Rejected { message } => Ok(Json(TranscriptResponse {
            accepted: false,
            message: Some(message.to_string()),
            reply: None,
        })),
    }
}

// =============================================================================
// Speech
// =============================================================================

/// POST /speech
///
/// Answers with `audio/mpeg` bytes, or with a JSON fallback utterance for
/// the client's own synthesizer.
pub async fn speech(
    State(state): State<AppState>,
    Json(body): Json<SpeechRequestBody>,
) -> Result<Response, ApiError> {
    let options = body.options()?;
    let output = state.speech.speak(&body.text, &options).await?;
    let response = match output {
        SpeechOutput::Audio { bytes, voice, .. } => (
            [
                (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                (header::HeaderName::from_static("x-voice"), voice.to_string()),
            ],
            bytes,
        )
            .into_response(),
        SpeechOutput::Fallback(utterance) => Json(SpeechFallbackResponse {
            fallback: true,
            utterance,
        })
        .into_response(),
    };
    Ok(response)
}

/// GET /voices
pub async fn list_voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    Json(voices_response(&state))
}

/// PUT /voices/current
pub async fn set_voice(
    State(state): State<AppState>,
    Json(body): Json<SetVoiceRequest>,
) -> Result<Json<VoicesResponse>, ApiError> {
    let voice: VoiceName = body
        .voice
        .parse()
        .map_err(ApiError::UnprocessableEntity)?;
    state.speech.set_voice(voice);
    Ok(Json(voices_response(&state)))
}

fn voices_response(state: &AppState) -> VoicesResponse {
    VoicesResponse {
        current: state.speech.current_voice(),
        voices: state.speech.available_voices(),
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// GET /vehicles
pub async fn list_vehicles() -> Json<VehiclesResponse> {
    Json(VehiclesResponse {
        vehicles: &VEHICLE_CATALOG,
    })
}

/// GET /vehicles/{code}
pub async fn get_vehicle(Path(code): Path<String>) -> Result<Json<&'static Vehicle>, ApiError> {
    let code: VehicleCode = code.parse().map_err(ApiError::NotFound)?;
    Ok(Json(code.details()))
}

/// POST /vehicles/{code}/interest?session_id=...
///
/// The visitor tapped a vehicle card.
pub async fn vehicle_interest(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<SessionParams>,
) -> Result<Json<ChatReply>, ApiError> {
    let code: VehicleCode = code.parse().map_err(ApiError::NotFound)?;
    let reply = state
        .orchestrator
        .handle_vehicle(code, params.session_id)
        .await?;
    Ok(Json(reply))
}
