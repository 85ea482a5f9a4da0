//! Reception orchestrator: wires classifier, context tracker, prompt
//! summary and the completion client into chat turns.
//!
//! Sessions live in memory behind a mutex that is never held across an
//! `.await`. Each turn works on a copy of the session context and commits
//! it after the completion call returns, so a turn abandoned mid-call
//! leaves the session as it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use reception_core::{ChatMessage, EmotionalState, Intent, ReceptionConfig, VehicleCode};

use crate::classifier::IntentClassifier;
use crate::context::ConversationContext;
use crate::error::ChatError;
use crate::llm::{
    ChatCompletion, CompletionRequest, LlmError, LoggingCompletion, OpenAiChatClient,
    SamplingParams,
};
use crate::prompt::system_message;
use crate::response::{canned_reply, EMPTY_COMPLETION_REPLY, WELCOME_MESSAGE};
use crate::services::{service_message, vehicle_message, QuickService};

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// The language model answered.
    Llm,
    /// No model configured; keyword reply.
    Canned,
    /// The model call failed; keyword reply.
    Fallback,
}

/// Result of one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub reply: String,
    pub intent: Intent,
    pub emotional_state: EmotionalState,
    pub context: ConversationContext,
    pub source: ReplySource,
}

/// Lightweight view of a session for listings.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
    pub stage: reception_core::ConversationStage,
}

struct Session {
    id: Uuid,
    context: ConversationContext,
    history: Vec<ChatMessage>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    /// Bumped on every context reset so a turn started before the reset
    /// does not overwrite the fresh context.
    generation: u64,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            context: ConversationContext::started_at(now),
            history: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            created_at: now,
            last_activity: now,
            generation: 0,
        }
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            created_at: self.created_at,
            last_activity: self.last_activity,
            message_count: self.history.len(),
            stage: self.context.stage(),
        }
    }
}

/// Snapshot taken under the lock at the start of a turn.
struct TurnStart {
    session_id: Uuid,
    generation: u64,
    context: ConversationContext,
    history: Vec<ChatMessage>,
}

/// Central coordinator for visitor conversations.
pub struct ReceptionOrchestrator {
    classifier: IntentClassifier,
    client: Option<Arc<dyn ChatCompletion>>,
    sessions: Mutex<HashMap<Uuid, Session>>,
    params: SamplingParams,
    max_message_length: usize,
    history_size: usize,
    session_timeout: Duration,
}

impl ReceptionOrchestrator {
    /// Create an orchestrator around an optional completion client. With no
    /// client every reply is canned.
    pub fn new(config: &ReceptionConfig, client: Option<Arc<dyn ChatCompletion>>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            client,
            sessions: Mutex::new(HashMap::new()),
            params: SamplingParams::from(&config.llm),
            max_message_length: config.general.max_message_length,
            history_size: config.llm.history_size,
            session_timeout: session_timeout(config.session.timeout_minutes),
        }
    }

    /// Build from configuration, connecting the OpenAI client when an API
    /// key is present.
    pub fn from_config(config: &ReceptionConfig) -> Result<Self, LlmError> {
        let client: Option<Arc<dyn ChatCompletion>> = match config.llm.api_key.as_deref() {
            Some(key) if !config.demo_mode() => {
                let inner = OpenAiChatClient::new(key, &config.llm)?;
                info!(model = %config.llm.model, "Chat completion client configured");
                Some(Arc::new(LoggingCompletion::new(Arc::new(inner))))
            }
            _ => {
                info!("No API key configured; running in demo mode");
                None
            }
        };
        Ok(Self::new(config, client))
    }

    pub fn is_demo(&self) -> bool {
        self.client.is_none()
    }

    // -----------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------

    /// Open a new session. Returns its id and the welcome text.
    pub fn start_session(&self) -> Result<(Uuid, &'static str), ChatError> {
        let session = Session::new();
        let id = session.id;
        let mut sessions = self.lock_sessions()?;
        self.evict_idle(&mut sessions, session.created_at);
        sessions.insert(id, session);
        info!(session_id = %id, "Session started");
        Ok((id, WELCOME_MESSAGE))
    }

    pub fn context(&self, session_id: Uuid) -> Result<ConversationContext, ChatError> {
        self.lock_sessions()?
            .get(&session_id)
            .map(|s| s.context.clone())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    pub fn history(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        self.lock_sessions()?
            .get(&session_id)
            .map(|s| s.history.clone())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    /// Replace the session context with a fresh one. History is kept.
    pub fn reset_context(&self, session_id: Uuid) -> Result<ConversationContext, ChatError> {
        let mut sessions = self.lock_sessions()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        session.context = ConversationContext::new();
        session.generation += 1;
        info!(session_id = %session_id, "Context reset");
        Ok(session.context.clone())
    }

    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        match self.lock_sessions()?.remove(&session_id) {
            Some(_) => {
                info!(session_id = %session_id, "Session deleted");
                Ok(())
            }
            None => Err(ChatError::SessionNotFound(session_id)),
        }
    }

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        match self.sessions.lock() {
            Ok(sessions) => sessions.values().map(Session::summary).collect(),
            Err(_) => vec![],
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    // -----------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------

    /// Handle one visitor message.
    ///
    /// Unknown or expired session ids start a new session. A failed model
    /// call falls back to a canned reply instead of returning an error.
    pub async fn handle_message(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let TurnStart {
            session_id,
            generation,
            mut context,
            history,
        } = self.begin_turn(session_id)?;

        let intent = self.classifier.classify(message);
        context.update(message, intent);
        debug!(session_id = %session_id, intent = %intent, "Message classified");

        let (reply, source) = match &self.client {
            None => (canned_reply(message).to_string(), ReplySource::Canned),
            Some(client) => {
                let request = CompletionRequest::build(
                    system_message(&context),
                    &history,
                    message,
                    self.params.clone(),
                );
                match client.complete(&request).await {
                    Ok(response) => {
                        let reply = response
                            .content
                            .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_string());
                        context.observe_reply(&reply);
                        (reply, ReplySource::Llm)
                    }
                    Err(e) => {
                        warn!(
                            session_id = %session_id,
                            error = %e,
                            "Completion failed, using canned reply"
                        );
                        (canned_reply(message).to_string(), ReplySource::Fallback)
                    }
                }
            }
        };

        let context = self.commit_turn(session_id, generation, context, message, &reply)?;

        Ok(ChatReply {
            session_id,
            reply,
            intent,
            emotional_state: context.emotional_state(),
            context,
            source,
        })
    }

    /// Run a quick-service shortcut as a visitor message.
    pub async fn handle_service(
        &self,
        service: &QuickService,
        session_id: Option<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        self.handle_message(&service_message(service), session_id)
            .await
    }

    /// Send the utterance for a tapped vehicle card as a visitor message.
    pub async fn handle_vehicle(
        &self,
        code: VehicleCode,
        session_id: Option<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        self.handle_message(&vehicle_message(code.details()), session_id)
            .await
    }

    // -- Private helpers --

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::Internal(format!("session lock poisoned: {}", e)))
    }

    /// Drop sessions idle for longer than the timeout. Runs whenever a new
    /// session is opened, so abandoned kiosks do not accumulate.
    fn evict_idle(&self, sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) {
        sessions.retain(|id, session| {
            let live = now - session.last_activity <= self.session_timeout;
            if !live {
                info!(session_id = %id, "Session expired");
            }
            live
        });
    }

    /// Resolve the session and copy what the turn needs.
    fn begin_turn(&self, requested: Option<Uuid>) -> Result<TurnStart, ChatError> {
        let mut sessions = self.lock_sessions()?;
        let now = Utc::now();

        let live = requested.filter(|sid| match sessions.get(sid) {
            Some(session) => now - session.last_activity <= self.session_timeout,
            None => false,
        });

        let sid = match live {
            Some(sid) => sid,
            None => {
                self.evict_idle(&mut sessions, now);
                let session = Session::new();
                let sid = session.id;
                sessions.insert(sid, session);
                info!(session_id = %sid, "Session started");
                sid
            }
        };

        let session = sessions
            .get(&sid)
            .ok_or(ChatError::SessionNotFound(sid))?;
        let skip = session.history.len().saturating_sub(self.history_size);

        Ok(TurnStart {
            session_id: sid,
            generation: session.generation,
            context: session.context.clone(),
            history: session.history[skip..].to_vec(),
        })
    }

    /// Write the turn back. Returns the context now stored in the session.
    fn commit_turn(
        &self,
        session_id: Uuid,
        generation: u64,
        context: ConversationContext,
        message: &str,
        reply: &str,
    ) -> Result<ConversationContext, ChatError> {
        let mut sessions = self.lock_sessions()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;

        if session.generation == generation {
            session.context = context;
        } else {
            debug!(session_id = %session_id, "Context reset during turn; keeping fresh context");
        }
        session.history.push(ChatMessage::user(message));
        session.history.push(ChatMessage::assistant(reply));
        session.last_activity = Utc::now();

        Ok(session.context.clone())
    }
}

/// Idle timeout from configured minutes, saturating at the `Duration` range.
fn session_timeout(minutes: i64) -> Duration {
    Duration::try_minutes(minutes).unwrap_or_else(|| {
        warn!(minutes, "Session timeout out of range, clamping");
        if minutes < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
