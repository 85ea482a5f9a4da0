//! Shared domain types for the dealership receptionist.
//!
//! Defines intents, conversation stages, emotional states, the vehicle
//! catalog and chat messages used across all reception crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Intent
// =============================================================================

/// What the visitor is asking for in a single utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    VehicleInquiry,
    TestDriveRequest,
    CoffeeRequest,
    ConsultantRequest,
    AppointmentRequest,
    FinancingInquiry,
    SustainabilityQuestion,
    GeneralConversation,
    Goodbye,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 10] = [
        Intent::Greeting,
        Intent::VehicleInquiry,
        Intent::TestDriveRequest,
        Intent::CoffeeRequest,
        Intent::ConsultantRequest,
        Intent::AppointmentRequest,
        Intent::FinancingInquiry,
        Intent::SustainabilityQuestion,
        Intent::GeneralConversation,
        Intent::Goodbye,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::VehicleInquiry => "vehicle_inquiry",
            Intent::TestDriveRequest => "test_drive_request",
            Intent::CoffeeRequest => "coffee_request",
            Intent::ConsultantRequest => "consultant_request",
            Intent::AppointmentRequest => "appointment_request",
            Intent::FinancingInquiry => "financing_inquiry",
            Intent::SustainabilityQuestion => "sustainability_question",
            Intent::GeneralConversation => "general_conversation",
            Intent::Goodbye => "goodbye",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("Unknown intent: {}", s))
    }
}

// =============================================================================
// Conversation stage
// =============================================================================

/// Coarse progress label for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    #[default]
    Initial,
    Exploring,
    Interested,
    Deciding,
    Closing,
}

impl fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationStage::Initial => write!(f, "initial"),
            ConversationStage::Exploring => write!(f, "exploring"),
            ConversationStage::Interested => write!(f, "interested"),
            ConversationStage::Deciding => write!(f, "deciding"),
            ConversationStage::Closing => write!(f, "closing"),
        }
    }
}

impl std::str::FromStr for ConversationStage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(ConversationStage::Initial),
            "exploring" => Ok(ConversationStage::Exploring),
            "interested" => Ok(ConversationStage::Interested),
            "deciding" => Ok(ConversationStage::Deciding),
            "closing" => Ok(ConversationStage::Closing),
            _ => Err(format!("Unknown conversation stage: {}", s)),
        }
    }
}

// =============================================================================
// Emotional state
// =============================================================================

/// Perceived emotional state of the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    #[default]
    Neutral,
    Positive,
    Curious,
    Concerned,
    Excited,
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionalState::Neutral => write!(f, "neutral"),
            EmotionalState::Positive => write!(f, "positive"),
            EmotionalState::Curious => write!(f, "curious"),
            EmotionalState::Concerned => write!(f, "concerned"),
            EmotionalState::Excited => write!(f, "excited"),
        }
    }
}

impl std::str::FromStr for EmotionalState {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutral" => Ok(EmotionalState::Neutral),
            "positive" => Ok(EmotionalState::Positive),
            "curious" => Ok(EmotionalState::Curious),
            "concerned" => Ok(EmotionalState::Concerned),
            "excited" => Ok(EmotionalState::Excited),
            _ => Err(format!("Unknown emotional state: {}", s)),
        }
    }
}

// =============================================================================
// Vehicles
// =============================================================================

/// Product codes of the vehicles on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCode {
    B10,
    T03,
    C10,
}

impl VehicleCode {
    pub const ALL: [VehicleCode; 3] = [VehicleCode::B10, VehicleCode::T03, VehicleCode::C10];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleCode::B10 => "B10",
            VehicleCode::T03 => "T03",
            VehicleCode::C10 => "C10",
        }
    }

    /// Catalog entry for this code.
    pub fn details(self) -> &'static Vehicle {
        match self {
            VehicleCode::B10 => &VEHICLE_CATALOG[0],
            VehicleCode::T03 => &VEHICLE_CATALOG[1],
            VehicleCode::C10 => &VEHICLE_CATALOG[2],
        }
    }
}

impl fmt::Display for VehicleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleCode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "B10" => Ok(VehicleCode::B10),
            "T03" => Ok(VehicleCode::T03),
            "C10" => Ok(VehicleCode::C10),
            _ => Err(format!("Unknown vehicle code: {}", s)),
        }
    }
}

/// A vehicle on display in the showroom.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub code: VehicleCode,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub body_type: &'static str,
    pub price: &'static str,
    pub autonomy: &'static str,
    pub power: &'static str,
    pub acceleration: &'static str,
    pub battery: &'static str,
    pub features: &'static [&'static str],
}

/// The showroom catalog, indexed in [`VehicleCode::ALL`] order.
pub static VEHICLE_CATALOG: [Vehicle; 3] = [
    Vehicle {
        code: VehicleCode::B10,
        name: "Leapmotor B10",
        body_type: "SUV Compacto Elétrico",
        price: "R$ 239.990",
        autonomy: "420km (WLTP)",
        power: "231cv",
        acceleration: "7.9s (0-100km/h)",
        battery: "69.9 kWh",
        features: &["Tecnologia CTC", "Sistema LEAP 3.0", "Versatilidade urbana e viagens"],
    },
    Vehicle {
        code: VehicleCode::T03,
        name: "Leapmotor T03",
        body_type: "Hatch Urbano Elétrico",
        price: "R$ 169.990",
        autonomy: "280km (WLTP)",
        power: "109cv",
        acceleration: "12.7s (0-100km/h)",
        battery: "41.3 kWh",
        features: &["Compacto", "Baixo custo de manutenção", "Ideal para a cidade"],
    },
    Vehicle {
        code: VehicleCode::C10,
        name: "Leapmotor C10",
        body_type: "SUV Médio Premium",
        price: "R$ 299.990",
        autonomy: "420km (WLTP)",
        power: "231cv",
        acceleration: "7.5s (0-100km/h)",
        battery: "69.9 kWh",
        features: &["Espaçoso", "Teto solar panorâmico", "Tecnologia avançada"],
    },
];

// =============================================================================
// Chat messages
// =============================================================================

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
