//! API error type and JSON error bodies.
//!
//! Every failing endpoint answers with `{"error": code, "message": text}`
//! and a status code derived from the underlying subsystem error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use reception_chat::ChatError;
use reception_core::ReceptionError;
use reception_speech::SpeechError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. "not_found".
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found
    NotFound(String),
    /// 422 Unprocessable Entity
    UnprocessableEntity(String),
    /// 500 Internal Server Error
    Internal(String),
    /// 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        let (status, code, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable_entity", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };
        (status, code, msg.as_str())
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = code, "{}", message);
        }
        let body = ErrorBody {
            error: code.to_string(),
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ChatError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            ChatError::Llm(_) => ApiError::ServiceUnavailable(err.to_string()),
            ChatError::Internal(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EmptyText | SpeechError::UnknownVoice(_) => {
                ApiError::BadRequest(err.to_string())
            }
            _ => ApiError::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<ReceptionError> for ApiError {
    fn from(err: ReceptionError) -> Self {
        match &err {
            ReceptionError::Config(msg) => ApiError::BadRequest(msg.clone()),
            ReceptionError::Session(msg) => ApiError::NotFound(msg.clone()),
            ReceptionError::Llm(msg) | ReceptionError::Speech(msg) => {
                ApiError::ServiceUnavailable(msg.clone())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
