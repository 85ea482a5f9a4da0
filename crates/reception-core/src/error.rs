use thiserror::Error;

/// Top-level error type for the reception workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for ReceptionError` (or the reverse) so that `?`
/// works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReceptionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Shutdown in progress")]
    ShuttingDown,
}

impl From<toml::de::Error> for ReceptionError {
    fn from(err: toml::de::Error) -> Self {
        ReceptionError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ReceptionError {
    fn from(err: toml::ser::Error) -> Self {
        ReceptionError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ReceptionError {
    fn from(err: serde_json::Error) -> Self {
        ReceptionError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for reception operations.
pub type Result<T> = std::result::Result<T, ReceptionError>;
