//! Fixed replies used when no language model is available.
//!
//! Demo mode and failed completion calls both land here. Rules are checked
//! in order and the first keyword hit wins.

/// Greeting shown when a session starts.
pub const WELCOME_MESSAGE: &str =
    "Olá! Bem-vindo à Leapmotor! 😊 Eu sou a LEAP AI, sua assistente virtual. Como posso ajudá-lo hoje?";

/// Reply used when the model returns no content.
pub const EMPTY_COMPLETION_REPLY: &str = "Desculpe, não consegui processar sua mensagem.";

const DEFAULT_REPLY: &str = "Interessante sua pergunta! 🤔 Posso te ajudar a conhecer nossos veículos elétricos, agendar um test-drive ou oferecer um café enquanto conversamos. O que prefere?";

static CANNED_RULES: &[(&[&str], &str)] = &[
    (
        &["olá", "oi", "bom dia", "boa tarde"],
        "Olá! Bem-vindo à Leapmotor! 😊 Eu sou a LEAP AI, sua assistente virtual. Como posso ajudá-lo hoje? Gostaria de conhecer nossos veículos elétricos ou prefere tomar um café primeiro?",
    ),
    (
        &["veículo", "carro", "modelo"],
        "Temos três modelos incríveis! 🚗 O B10 é nosso SUV compacto versátil, o T03 é perfeito para a cidade, e o C10 é nosso SUV premium espaçoso. Qual desperta mais seu interesse?",
    ),
    (
        &["b10", "b 10", "be10", "ben10", "ben 10", "b-10"],
        "Você quer saber sobre o *B10* (nosso SUV compacto)! 🚗 Com 420km de autonomia, 231cv e R$ 239.990. Quer agendar um test-drive ou falar com consultor?",
    ),
    (
        &["t03", "t 03"],
        "O T03 é perfeito para a cidade! Compacto, ágil, com 280km de autonomia e baixíssimo custo de manutenção. A partir de R$ 169.990. Que tal experimentá-lo? 🌱",
    ),
    (
        &["c10", "c 10"],
        "O C10 é nosso SUV premium! Espaçoso, com teto solar panorâmico, 420km de autonomia e até 7 lugares. A partir de R$ 299.990. Posso agendar uma apresentação exclusiva?",
    ),
    (
        &["café"],
        "Claro! Temos café expresso, expresso duplo, café com leite e cappuccino. ☕ Todos preparados com grãos especiais. Qual você prefere?",
    ),
    (
        &["test", "dirigir", "experimentar"],
        "Excelente escolha! Nada melhor que sentir a experiência de dirigir um Leapmotor! 🚗 Qual modelo gostaria de experimentar? Posso agendar para hoje mesmo!",
    ),
    (
        &["ecológico", "sustentável", "ambiente"],
        "A Leapmotor está comprometida com o futuro sustentável! 🌱 Nossos veículos são 100% elétricos, zero emissão, e contribuem para um planeta mais limpo. Além disso, você economiza até 80% em combustível!",
    ),
    (
        &["preço", "valor", "financiamento"],
        "Nossos preços começam em R$ 169.990 para o T03. Temos excelentes condições de financiamento e aceitamos seu usado na troca! 💰 Gostaria de falar com um consultor financeiro?",
    ),
];

/// Pick the canned reply for a visitor utterance.
pub fn canned_reply(utterance: &str) -> &'static str {
    let lower = utterance.to_lowercase();
    CANNED_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_REPLY)
}
