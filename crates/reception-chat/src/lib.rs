//! Conversational core of the dealership receptionist.
//!
//! Classifies visitor utterances into intents, tracks a per-session
//! conversation context, summarizes that context for the language model
//! and orchestrates chat turns with a canned-reply fallback.

pub mod classifier;
pub mod context;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod response;
pub mod services;

pub use classifier::IntentClassifier;
pub use context::ConversationContext;
pub use error::ChatError;
pub use llm::{ChatCompletion, CompletionRequest, LlmError, LlmErrorKind, OpenAiChatClient};
pub use orchestrator::{ChatReply, ReceptionOrchestrator, ReplySource, SessionSummary};
pub use prompt::{summarize, summarize_at, SYSTEM_PROMPT};
pub use response::canned_reply;
pub use services::{service_message, vehicle_message, QuickService};
