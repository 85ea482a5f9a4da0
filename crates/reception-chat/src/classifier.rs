//! Rule-based intent classification for visitor utterances.
//!
//! Utterances are lower-cased and tested against an ordered list of
//! Portuguese keyword patterns. The first rule that matches decides the
//! [`Intent`]; anything unmatched is `general_conversation`.

use regex::Regex;
use std::sync::LazyLock;

use reception_core::{Intent, VehicleCode};

// =============================================================================
// Compiled rule sets (compiled once, reused across calls)
// =============================================================================

struct IntentRule {
    intent: Intent,
    pattern: Regex,
    /// Also fires when a vehicle name variant is present.
    or_vehicle_name: bool,
}

static INTENT_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    let rule = |intent: Intent, pat: &str, or_vehicle_name: bool| IntentRule {
        intent,
        pattern: Regex::new(pat).expect("Invalid intent regex"),
        or_vehicle_name,
    };

    // Substring matches without word boundaries: "oi" also fires inside
    // "noite" or "depois", and order decides every overlap.
    vec![
        rule(
            Intent::Greeting,
            r"(olá|oi|ei|hey|bom dia|boa tarde|boa noite|e aí)",
            false,
        ),
        rule(
            Intent::TestDriveRequest,
            r"(test|dirigir|experimentar|provar|testar|andar de)",
            false,
        ),
        rule(
            Intent::CoffeeRequest,
            r"(café|coffee|cafezinho|um café|tomar|beber)",
            false,
        ),
        rule(
            Intent::ConsultantRequest,
            r"(consultor|especialista|vendedor|atendente|falar com|conversar com)",
            false,
        ),
        rule(
            Intent::AppointmentRequest,
            r"(agendar|marcar|horário|visita|encontro|reunião|quando posso)",
            false,
        ),
        rule(
            Intent::FinancingInquiry,
            r"(preço|valor|custo|financiamento|parcela|entrada|troca|quanto|custa)",
            false,
        ),
        rule(
            Intent::SustainabilityQuestion,
            r"(ecológico|sustentável|ambiente|verde|emissão|poluição|planeta|natureza)",
            false,
        ),
        rule(
            Intent::VehicleInquiry,
            r"(veículo|carro|modelo|suv|elétrico|autonomia|bateria|motor)",
            true,
        ),
        rule(Intent::Goodbye, r"(tchau|obrigad|até|bye|falou|valeu)", false),
    ]
});

/// Spellings (after lower-casing) that refer to each vehicle, including the
/// "Ben 10" mishearing speech recognition produces for B10.
static VEHICLE_VARIANTS: &[(VehicleCode, &[&str])] = &[
    (
        VehicleCode::B10,
        &["b10", "b 10", "be10", "ben10", "ben 10", "b-10"],
    ),
    (VehicleCode::T03, &["t03", "t 03", "te03", "t-03"]),
    (VehicleCode::C10, &["c10", "c 10", "ce10", "c-10"]),
];

static TOPIC_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let mk = |topic: &'static str, pat: &str| (topic, Regex::new(pat).expect("Invalid topic regex"));
    vec![
        // Technical
        mk("autonomia", r"(autonomia|alcance|distância)"),
        mk("potência", r"(potência|cv|força|motor)"),
        mk("bateria", r"(bateria|carregamento|carga)"),
        mk("performance", r"(velocidade|aceleração|performance)"),
        // Commercial
        mk("preço", r"(preço|valor|custo)"),
        mk("financiamento", r"(financiamento|parcela|entrada)"),
        mk("troca", r"(troca|usado|avaliaç)"),
        // Sustainability
        mk("sustentabilidade", r"(sustentabilidade|ecologia|ambiente)"),
        mk("economia", r"(economia|gastar|custo)"),
        // Technology and comfort
        mk("tecnologia", r"(tecnologia|sistema|conectividade)"),
        mk("conforto", r"(conforto|espaço|interior)"),
        mk("segurança", r"(segurança|proteção)"),
        // Intended use
        mk("família", r"(família|filhos|criança)"),
        mk("trabalho", r"(trabalho|empresa|negócio)"),
        mk("urbano", r"(cidade|urbano|trânsito)"),
        mk("viagem", r"(viagem|estrada|rodoviário)"),
    ]
});

// =============================================================================
// IntentClassifier
// =============================================================================

/// Deterministic keyword classifier. Total: every input yields an intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a single utterance.
    pub fn classify(&self, utterance: &str) -> Intent {
        let lower = utterance.to_lowercase();
        INTENT_RULES
            .iter()
            .find(|rule| {
                rule.pattern.is_match(&lower)
                    || (rule.or_vehicle_name && mentions_vehicle(&lower))
            })
            .map(|rule| rule.intent)
            .unwrap_or(Intent::GeneralConversation)
    }
}

/// Vehicle codes mentioned in the utterance, in catalog order, each once.
pub fn detect_vehicles(utterance: &str) -> Vec<VehicleCode> {
    let lower = utterance.to_lowercase();
    VEHICLE_VARIANTS
        .iter()
        .filter(|(_, variants)| variants.iter().any(|v| lower.contains(v)))
        .map(|(code, _)| *code)
        .collect()
}

/// Topic labels mentioned in the utterance, in rule order.
pub fn extract_topics(utterance: &str) -> Vec<&'static str> {
    let lower = utterance.to_lowercase();
    TOPIC_RULES
        .iter()
        .filter(|(_, re)| re.is_match(&lower))
        .map(|(topic, _)| *topic)
        .collect()
}

fn mentions_vehicle(lower: &str) -> bool {
    VEHICLE_VARIANTS
        .iter()
        .any(|(_, variants)| variants.iter().any(|v| lower.contains(v)))
}

// =============================================================================
// Tests
// =============================================================================
