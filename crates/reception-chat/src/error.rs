//! Error types for the conversational core.

use reception_core::ReceptionError;

use crate::llm::LlmError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("session store unavailable: {0}")]
    Internal(String),
}

impl From<ChatError> for ReceptionError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::SessionNotFound(_) => ReceptionError::Session(err.to_string()),
            ChatError::Llm(e) => ReceptionError::Llm(e.to_string()),
            other => ReceptionError::Chat(other.to_string()),
        }
    }
}
