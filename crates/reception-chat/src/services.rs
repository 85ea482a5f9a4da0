//! Quick-service shortcuts.
//!
//! The showroom screen offers one-tap buttons (coffee, test-drive, ...).
//! Each maps to the visitor utterance it stands for, which then runs
//! through the normal chat flow.

use std::fmt;

use reception_core::Vehicle;

/// A named one-tap service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickService {
    Coffee,
    TestDrive,
    Consultant,
    Schedule,
    CoffeeEspresso,
    CoffeeDoubleEspresso,
    CoffeeLatte,
    CoffeeCappuccino,
    EcoInfo,
    Financing,
    Warranty,
    /// Any service name without a dedicated phrasing.
    Other(String),
}

impl QuickService {
    /// Parse a service identifier. Unknown identifiers become `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "coffee" => QuickService::Coffee,
            "test-drive" => QuickService::TestDrive,
            "consultant" => QuickService::Consultant,
            "schedule" => QuickService::Schedule,
            "coffee-espresso" => QuickService::CoffeeEspresso,
            "coffee-double-espresso" => QuickService::CoffeeDoubleEspresso,
            "coffee-latte" => QuickService::CoffeeLatte,
            "coffee-cappuccino" => QuickService::CoffeeCappuccino,
            "eco-info" => QuickService::EcoInfo,
            "financing" => QuickService::Financing,
            "warranty" => QuickService::Warranty,
            other => QuickService::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            QuickService::Coffee => "coffee",
            QuickService::TestDrive => "test-drive",
            QuickService::Consultant => "consultant",
            QuickService::Schedule => "schedule",
            QuickService::CoffeeEspresso => "coffee-espresso",
            QuickService::CoffeeDoubleEspresso => "coffee-double-espresso",
            QuickService::CoffeeLatte => "coffee-latte",
            QuickService::CoffeeCappuccino => "coffee-cappuccino",
            QuickService::EcoInfo => "eco-info",
            QuickService::Financing => "financing",
            QuickService::Warranty => "warranty",
            QuickService::Other(name) => name,
        }
    }
}

impl fmt::Display for QuickService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The utterance a service button sends on the visitor's behalf.
pub fn service_message(service: &QuickService) -> String {
    let text = match service {
        QuickService::Coffee => "Gostaria de tomar um café enquanto conhecemos os veículos.",
        QuickService::TestDrive => "Quero agendar um test-drive!",
        QuickService::Consultant => "Gostaria de falar com um consultor especializado.",
        QuickService::Schedule => "Quero agendar uma visita.",
        QuickService::CoffeeEspresso => "Vou querer um café expresso, por favor.",
        QuickService::CoffeeDoubleEspresso => "Um expresso duplo seria perfeito!",
        QuickService::CoffeeLatte => "Gostaria de um café com leite.",
        QuickService::CoffeeCappuccino => "Um cappuccino, por favor.",
        QuickService::EcoInfo => "Quais são os benefícios ecológicos dos veículos Leapmotor?",
        QuickService::Financing => "Quais são as opções de financiamento disponíveis?",
        QuickService::Warranty => "Como funciona a garantia e o suporte dos veículos?",
        QuickService::Other(name) => return format!("Estou interessado em {}", name),
    };
    text.to_string()
}

/// The utterance sent when a visitor taps a vehicle card.
pub fn vehicle_message(vehicle: &Vehicle) -> String {
    format!(
        "Estou interessado no {}. Pode me contar mais sobre ele?",
        vehicle.name
    )
}
