//! Per-session conversation context.
//!
//! A [`ConversationContext`] records what a visitor has said so far: the
//! vehicles they mentioned, recent topics, greeting status, the current
//! stage and perceived emotion. Stage and emotion are private and move
//! only through [`ConversationContext::update`] and
//! [`ConversationContext::observe_reply`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use reception_core::{ConversationStage, EmotionalState, Intent, VehicleCode};

use crate::classifier::{detect_vehicles, extract_topics};

/// Most recent topics kept in the context.
pub const MAX_TOPICS: usize = 10;

/// Snapshot of a visitor's conversation, owned by exactly one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationContext {
    previous_topics: Vec<String>,
    vehicle_interest: Vec<VehicleCode>,
    has_greeted: bool,
    current_intent: Option<Intent>,
    stage: ConversationStage,
    emotional_state: EmotionalState,
    session_start: DateTime<Utc>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    /// Fresh context starting now.
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    /// Fresh context with an explicit start instant.
    pub fn started_at(session_start: DateTime<Utc>) -> Self {
        Self {
            previous_topics: Vec::new(),
            vehicle_interest: Vec::new(),
            has_greeted: false,
            current_intent: None,
            stage: ConversationStage::Initial,
            emotional_state: EmotionalState::Neutral,
            session_start,
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn previous_topics(&self) -> &[String] {
        &self.previous_topics
    }

    pub fn vehicle_interest(&self) -> &[VehicleCode] {
        &self.vehicle_interest
    }

    pub fn has_greeted(&self) -> bool {
        self.has_greeted
    }

    pub fn current_intent(&self) -> Option<Intent> {
        self.current_intent
    }

    pub fn stage(&self) -> ConversationStage {
        self.stage
    }

    pub fn emotional_state(&self) -> EmotionalState {
        self.emotional_state
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    // -----------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------

    /// Fold one classified visitor utterance into the context.
    pub fn update(&mut self, utterance: &str, intent: Intent) {
        self.current_intent = Some(intent);

        if intent == Intent::Greeting && !self.has_greeted {
            self.has_greeted = true;
            self.stage = ConversationStage::Exploring;
            self.emotional_state = EmotionalState::Positive;
        }

        for code in detect_vehicles(utterance) {
            if !self.vehicle_interest.contains(&code) {
                self.vehicle_interest.push(code);
            }
        }

        self.previous_topics
            .extend(extract_topics(utterance).into_iter().map(str::to_string));
        if self.previous_topics.len() > MAX_TOPICS {
            let excess = self.previous_topics.len() - MAX_TOPICS;
            self.previous_topics.drain(..excess);
        }

        self.apply_intent(intent);

        debug!(
            intent = %intent,
            stage = %self.stage,
            emotion = %self.emotional_state,
            vehicles = self.vehicle_interest.len(),
            topics = self.previous_topics.len(),
            "Context updated"
        );
    }

    /// Fold an assistant reply into the context. A reply that proposes a
    /// test-drive or a booking moves the conversation to `deciding`.
    pub fn observe_reply(&mut self, reply: &str) {
        if reply.contains("test-drive") || reply.contains("agendar") {
            self.stage = ConversationStage::Deciding;
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Greeting => {
                self.emotional_state = EmotionalState::Positive;
            }
            Intent::TestDriveRequest => {
                self.emotional_state = EmotionalState::Excited;
                self.stage = ConversationStage::Interested;
            }
            Intent::VehicleInquiry => {
                self.emotional_state = EmotionalState::Curious;
            }
            Intent::FinancingInquiry => {
                self.emotional_state = EmotionalState::Concerned;
            }
            Intent::Goodbye => {
                self.stage = ConversationStage::Closing;
            }
            _ => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::IntentClassifier;

    fn turn(ctx: &mut ConversationContext, text: &str) -> Intent {
        let intent = IntentClassifier::new().classify(text);
        ctx.update(text, intent);
        intent
    }

    // ---- Initial state ----

    #[test]
    fn test_new_context_defaults() {
        let ctx = ConversationContext::new();
        assert!(ctx.previous_topics().is_empty());
        assert!(ctx.vehicle_interest().is_empty());
        assert!(!ctx.has_greeted());
        assert_eq!(ctx.current_intent(), None);
        assert_eq!(ctx.stage(), ConversationStage::Initial);
        assert_eq!(ctx.emotional_state(), EmotionalState::Neutral);
    }

    // ---- Greeting ----

    #[test]
    fn test_first_greeting_moves_to_exploring() {
        let mut ctx = ConversationContext::new();
        assert_eq!(turn(&mut ctx, "Olá"), Intent::Greeting);
        assert!(ctx.has_greeted());
        assert_eq!(ctx.stage(), ConversationStage::Exploring);
        assert_eq!(ctx.emotional_state(), EmotionalState::Positive);
    }

    #[test]
    fn test_second_greeting_keeps_stage() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Olá");
        turn(&mut ctx, "Quero agendar um test-drive!");
        assert_eq!(ctx.stage(), ConversationStage::Interested);

        turn(&mut ctx, "Oi de novo");
        assert_eq!(ctx.stage(), ConversationStage::Interested);
        assert_eq!(ctx.emotional_state(), EmotionalState::Positive);
    }

    // ---- Emotion / stage table ----

    #[test]
    fn test_test_drive_sets_excited_and_interested() {
        let mut ctx = ConversationContext::new();
        assert_eq!(
            turn(&mut ctx, "Quero agendar um test-drive!"),
            Intent::TestDriveRequest
        );
        assert_eq!(ctx.stage(), ConversationStage::Interested);
        assert_eq!(ctx.emotional_state(), EmotionalState::Excited);
    }

    #[test]
    fn test_financing_sets_concerned() {
        let mut ctx = ConversationContext::new();
        assert_eq!(
            turn(&mut ctx, "Qual o preço do financiamento?"),
            Intent::FinancingInquiry
        );
        assert_eq!(ctx.emotional_state(), EmotionalState::Concerned);
        assert_eq!(ctx.stage(), ConversationStage::Initial);
    }

    #[test]
    fn test_vehicle_inquiry_sets_curious() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Qual a autonomia?");
        assert_eq!(ctx.emotional_state(), EmotionalState::Curious);
    }

    #[test]
    fn test_goodbye_sets_closing_keeps_emotion() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Qual a autonomia?");
        turn(&mut ctx, "tchau");
        assert_eq!(ctx.stage(), ConversationStage::Closing);
        assert_eq!(ctx.emotional_state(), EmotionalState::Curious);
    }

    #[test]
    fn test_other_intents_leave_state_unchanged() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Qual o preço?");
        let before = (ctx.stage(), ctx.emotional_state());
        for text in ["um café", "preciso de um vendedor", "marcar visita", "verde", "hmm"] {
            turn(&mut ctx, text);
            assert_eq!((ctx.stage(), ctx.emotional_state()), before, "after {}", text);
        }
    }

    #[test]
    fn test_current_intent_tracks_last_turn() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Olá");
        turn(&mut ctx, "hmm");
        assert_eq!(ctx.current_intent(), Some(Intent::GeneralConversation));
    }

    // ---- Vehicle interest ----

    #[test]
    fn test_vehicle_interest_first_mention_order() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Olá");
        turn(&mut ctx, "B10");
        turn(&mut ctx, "T03");
        assert_eq!(ctx.vehicle_interest(), &[VehicleCode::B10, VehicleCode::T03]);
    }

    #[test]
    fn test_vehicle_interest_deduplicated_across_variants() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "ben 10");
        turn(&mut ctx, "b-10");
        turn(&mut ctx, "B10 de novo");
        assert_eq!(ctx.vehicle_interest(), &[VehicleCode::B10]);
    }

    // ---- Topics ----

    #[test]
    fn test_topics_appended_in_order() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "autonomia");
        turn(&mut ctx, "bateria");
        assert_eq!(ctx.previous_topics(), &["autonomia", "bateria"]);
    }

    #[test]
    fn test_topics_capped_fifo() {
        let mut ctx = ConversationContext::new();
        let words = [
            "autonomia", "potência", "bateria", "aceleração", "preço", "parcela",
            "troca", "ecologia", "economia", "tecnologia", "conforto", "segurança",
        ];
        for w in words {
            turn(&mut ctx, w);
            assert!(ctx.previous_topics().len() <= MAX_TOPICS);
        }
        assert_eq!(ctx.previous_topics().len(), MAX_TOPICS);
        assert_eq!(ctx.previous_topics()[0], "bateria");
        assert_eq!(ctx.previous_topics()[9], "segurança");
    }

    #[test]
    fn test_topics_allow_repeats() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "autonomia");
        turn(&mut ctx, "alcance");
        assert_eq!(ctx.previous_topics(), &["autonomia", "autonomia"]);
    }

    // ---- Reply observation ----

    #[test]
    fn test_observe_reply_moves_to_deciding() {
        let mut ctx = ConversationContext::new();
        ctx.observe_reply("Posso agendar para amanhã?");
        assert_eq!(ctx.stage(), ConversationStage::Deciding);
    }

    #[test]
    fn test_observe_reply_other_text_no_change() {
        let mut ctx = ConversationContext::new();
        ctx.observe_reply("O B10 tem 420km de autonomia.");
        assert_eq!(ctx.stage(), ConversationStage::Initial);
    }

    // ---- Serialization ----

    #[test]
    fn test_context_serializes_snake_case() {
        let mut ctx = ConversationContext::new();
        turn(&mut ctx, "Olá, quero ver o B10");
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["stage"], "exploring");
        assert_eq!(value["emotional_state"], "positive");
        assert_eq!(value["vehicle_interest"][0], "B10");
        assert_eq!(value["has_greeted"], true);
    }
}
