//! Integration tests for the reception API.
//!
//! Each test builds its own router. Most run in demo mode (no API key);
//! the model and speech paths use in-process mock clients.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use reception_api::{create_router, AppState};
use reception_chat::llm::CompletionResponse;
use reception_chat::{ChatCompletion, CompletionRequest, LlmError, ReceptionOrchestrator};
use reception_core::ReceptionConfig;
use reception_speech::{SpeechError, SpeechRequest, SpeechService, SpeechSynthesizer};

// =============================================================================
// Helpers
// =============================================================================

struct ScriptedModel(&'static str);

#[async_trait]
impl ChatCompletion for ScriptedModel {
    async fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: Some(self.0.to_string()),
            ..Default::default()
        })
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

struct DownModel;

#[async_trait]
impl ChatCompletion for DownModel {
    async fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::server_error("upstream unavailable"))
    }

    fn model_id(&self) -> &str {
        "down"
    }
}

struct FakeTts;

#[async_trait]
impl SpeechSynthesizer for FakeTts {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
        Ok(request.text.as_bytes().to_vec())
    }
}

fn make_app() -> axum::Router {
    create_router(AppState::from_config(ReceptionConfig::default()).unwrap())
}

fn make_app_with(
    model: Option<Arc<dyn ChatCompletion>>,
    tts: Option<Arc<dyn SpeechSynthesizer>>,
) -> axum::Router {
    let config = ReceptionConfig::default();
    let orchestrator = ReceptionOrchestrator::new(&config, model);
    let speech = SpeechService::new(&config.speech, tts);
    create_router(AppState::new(config, orchestrator, speech))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn put_json(uri: &str, json: &str) -> Request<Body> {
    Request::put(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Send a request through a clone of `app` and return status plus JSON body.
async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = body_bytes(resp).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// Health and catalog
// =============================================================================

#[tokio::test]
async fn test_health_reports_demo_mode() {
    let (status, json) = send(&make_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["demo_mode"], true);
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn test_vehicles_catalog() {
    let (status, json) = send(&make_app(), get("/vehicles")).await;
    assert_eq!(status, StatusCode::OK);
    let vehicles = json["vehicles"].as_array().unwrap();
    assert_eq!(vehicles.len(), 3);
    assert_eq!(vehicles[0]["code"], "B10");
    assert_eq!(vehicles[0]["type"], "SUV Compacto Elétrico");
    assert_eq!(vehicles[2]["price"], "R$ 299.990");
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_session_lifecycle() {
    let app = make_app();

    let (status, created) = send(&app, post_empty("/sessions")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["welcome"].as_str().unwrap().contains("LEAP AI"));
    let id = created["session_id"].as_str().unwrap().to_string();

    let (_, listed) = send(&app, get("/sessions")).await;
    assert_eq!(listed["sessions"].as_array().unwrap().len(), 1);

    let (status, history) = send(&app, get(&format!("/sessions/{}/history", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["messages"].as_array().unwrap().len(), 1);
    assert_eq!(history["messages"][0]["role"], "assistant");

    let delete = Request::delete(format!("/sessions/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = send(&app, get(&format!("/sessions/{}/context", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_unknown_session_context_is_404() {
    let uri = format!("/sessions/{}/context", Uuid::new_v4());
    let (status, _) = send(&make_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_session_id_is_rejected() {
    let (status, _) = send(&make_app(), get("/sessions/not-a-uuid/context")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_tracks_test_drive_request() {
    let app = make_app();
    let (status, json) = send(
        &app,
        post_json("/chat", r#"{"message":"Quero agendar um test-drive!"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "test_drive_request");
    assert_eq!(json["emotional_state"], "excited");
    assert_eq!(json["context"]["stage"], "interested");
    assert_eq!(json["source"], "canned");
    assert!(json["reply"].as_str().unwrap().starts_with("Excelente escolha"));
}

#[tokio::test]
async fn test_chat_context_accumulates_across_turns() {
    let app = make_app();
    let (_, first) = send(&app, post_json("/chat", r#"{"message":"Olá!"}"#)).await;
    let sid = first["session_id"].as_str().unwrap().to_string();

    for msg in ["Me fala do B10", "E o T03?"] {
        let body = serde_json::json!({ "message": msg, "session_id": sid }).to_string();
        let (status, _) = send(&app, post_json("/chat", &body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, ctx) = send(&app, get(&format!("/sessions/{}/context", sid))).await;
    assert_eq!(ctx["context"]["has_greeted"], true);
    assert_eq!(ctx["context"]["vehicle_interest"], serde_json::json!(["B10", "T03"]));
    let summary = ctx["summary"].as_str().unwrap();
    assert!(summary.contains("B10, T03"));
}

#[tokio::test]
async fn test_chat_financing_is_concerned() {
    let (_, json) = send(
        &make_app(),
        post_json("/chat", r#"{"message":"Qual o preço do financiamento?"}"#),
    )
    .await;
    assert_eq!(json["intent"], "financing_inquiry");
    assert_eq!(json["emotional_state"], "concerned");
}

#[tokio::test]
async fn test_chat_empty_message_is_400() {
    let (status, json) = send(&make_app(), post_json("/chat", r#"{"message":"   "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_chat_too_long_message_is_400() {
    let body = serde_json::json!({ "message": "a".repeat(2001) }).to_string();
    let (status, _) = send(&make_app(), post_json("/chat", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_uses_model_reply() {
    let app = make_app_with(
        Some(Arc::new(ScriptedModel("Posso agendar seu test-drive agora."))),
        None,
    );
    let (_, json) = send(&app, post_json("/chat", r#"{"message":"Gostei do C10"}"#)).await;
    assert_eq!(json["source"], "llm");
    assert_eq!(json["reply"], "Posso agendar seu test-drive agora.");
    assert_eq!(json["context"]["stage"], "deciding");
}

#[tokio::test]
async fn test_chat_model_failure_falls_back() {
    let app = make_app_with(Some(Arc::new(DownModel)), None);
    let (status, json) = send(&app, post_json("/chat", r#"{"message":"um café"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert!(json["reply"].as_str().unwrap().starts_with("Claro!"));
}

#[tokio::test]
async fn test_reset_keeps_history_clears_context() {
    let app = make_app();
    let (_, first) = send(&app, post_json("/chat", r#"{"message":"Olá, quero o B10"}"#)).await;
    let sid = first["session_id"].as_str().unwrap().to_string();

    let (status, reset) = send(&app, post_empty(&format!("/sessions/{}/reset", sid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reset["context"]["has_greeted"], false);
    assert_eq!(reset["context"]["vehicle_interest"], serde_json::json!([]));
    assert_eq!(reset["context"]["stage"], "initial");

    let (_, history) = send(&app, get(&format!("/sessions/{}/history", sid))).await;
    assert_eq!(history["messages"].as_array().unwrap().len(), 3);
}

// =============================================================================
// Quick services
// =============================================================================

#[tokio::test]
async fn test_quick_service_coffee() {
    let (status, json) = send(&make_app(), post_empty("/services/coffee")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "coffee_request");
}

#[tokio::test]
async fn test_quick_service_joins_session() {
    let app = make_app();
    let (_, created) = send(&app, post_empty("/sessions")).await;
    let sid = created["session_id"].as_str().unwrap().to_string();

    let (_, json) = send(&app, post_empty(&format!("/services/test-drive?session_id={}", sid))).await;
    assert_eq!(json["session_id"], sid);
    assert_eq!(json["intent"], "test_drive_request");
}

// =============================================================================
// Vehicle cards
// =============================================================================

#[tokio::test]
async fn test_vehicle_card_tap_tracks_interest() {
    let app = make_app();
    let (_, created) = send(&app, post_empty("/sessions")).await;
    let sid = created["session_id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, post_empty(&format!("/vehicles/c10/interest?session_id={}", sid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], sid);
    assert_eq!(json["context"]["vehicle_interest"], serde_json::json!(["C10"]));

    let (_, history) = send(&app, get(&format!("/sessions/{}/history", sid))).await;
    assert_eq!(
        history["messages"][1]["content"],
        "Estou interessado no Leapmotor C10. Pode me contar mais sobre ele?"
    );
}

#[tokio::test]
async fn test_vehicle_card_unknown_code_is_404() {
    let (status, json) = send(&make_app(), post_empty("/vehicles/X99/interest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

// =============================================================================
// Transcripts
// =============================================================================

#[tokio::test]
async fn test_confident_transcript_runs_turn() {
    let (_, json) = send(
        &make_app(),
        post_json("/transcript", r#"{"transcript":"Bom dia!","confidence":0.93}"#),
    )
    .await;
    assert_eq!(json["accepted"], true);
    assert_eq!(json["reply"]["intent"], "greeting");
}

#[tokio::test]
async fn test_low_confidence_transcript_is_rejected() {
    let app = make_app();
    let (_, json) = send(
        &app,
        post_json("/transcript", r#"{"transcript":"bom dia","confidence":0.2}"#),
    )
    .await;
    assert_eq!(json["accepted"], false);
    assert!(json["message"].as_str().unwrap().starts_with("Desculpe"));
    assert!(json.get("reply").is_none());

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["active_sessions"], 0);
}

#[tokio::test]
async fn test_recognizer_error_code_message() {
    let (_, json) = send(
        &make_app(),
        post_json("/transcript", r#"{"error":"not-allowed"}"#),
    )
    .await;
    assert_eq!(json["accepted"], false);
    assert_eq!(json["message"], "Permissão de microfone negada");
}

// =============================================================================
// Speech and voices
// =============================================================================

#[tokio::test]
async fn test_speech_without_tts_returns_fallback() {
    let (status, json) = send(
        &make_app(),
        post_json("/speech", r#"{"text":"Olá!","speed":1.2}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fallback"], true);
    assert_eq!(json["utterance"]["lang"], "pt-BR");
    assert_eq!(json["utterance"]["text"], "Olá!");
}

#[tokio::test]
async fn test_speech_with_tts_returns_audio() {
    let app = make_app_with(None, Some(Arc::new(FakeTts)));
    let resp = app
        .oneshot(post_json("/speech", r#"{"text":"Vamos lá","emotion":"excited"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "audio/mpeg");
    assert_eq!(resp.headers()["x-voice"], "nova");
    assert_eq!(body_bytes(resp).await, b"Vamos l\xc3\xa1".to_vec());
}

#[tokio::test]
async fn test_speech_empty_text_is_400() {
    let (status, _) = send(&make_app(), post_json("/speech", r#"{"text":""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_speech_unknown_voice_is_json_error() {
    let app = make_app_with(None, Some(Arc::new(FakeTts)));
    let (status, json) = send(&app, post_json("/speech", r#"{"text":"Olá","voice":"robot"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
    assert_eq!(json["message"], "unknown voice: robot");
}

#[tokio::test]
async fn test_speech_explicit_voice_is_used() {
    let app = make_app_with(None, Some(Arc::new(FakeTts)));
    let resp = app
        .oneshot(post_json("/speech", r#"{"text":"Olá","voice":"onyx"}"#))
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-voice"], "onyx");
}

#[tokio::test]
async fn test_voice_selection() {
    let app = make_app();
    let (_, voices) = send(&app, get("/voices")).await;
    assert_eq!(voices["current"], "nova");
    assert_eq!(voices["voices"].as_array().unwrap().len(), 6);

    let (status, json) = send(&app, put_json("/voices/current", r#"{"voice":"echo"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current"], "echo");

    let (status, json) = send(&app, put_json("/voices/current", r#"{"voice":"robot"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "unprocessable_entity");
}

#[tokio::test]
async fn test_body_json_helper_parses_error_body() {
    let resp = make_app()
        .oneshot(get(&format!("/sessions/{}/history", Uuid::new_v4())))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert!(json["message"].as_str().unwrap().contains("not found"));
}
