//! Chat-completion client abstraction.

mod error;
mod openai;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use openai::OpenAiChatClient;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// A service that turns a prompt into an assistant reply.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    fn model_id(&self) -> &str;
}

/// Logging wrapper for completion services.
pub struct LoggingCompletion {
    inner: Arc<dyn ChatCompletion>,
    model_id: String,
}

impl LoggingCompletion {
    pub fn new(inner: Arc<dyn ChatCompletion>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl ChatCompletion for LoggingCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Completion request finished"
                );
            }
            Err(e) => {
                tracing::warn!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl ChatCompletion for Fixed {
        async fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            match self.0 {
                Some(text) => Ok(CompletionResponse {
                    content: Some(text.to_string()),
                    usage: Usage::default(),
                }),
                None => Err(LlmError::server_error("boom")),
            }
        }

        fn model_id(&self) -> &str {
            "fixed"
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::build("sys".into(), &[], "oi", SamplingParams::default())
    }

    #[tokio::test]
    async fn test_logging_wrapper_passes_through_success() {
        let svc = LoggingCompletion::new(Arc::new(Fixed(Some("olá"))));
        assert_eq!(svc.model_id(), "fixed");
        let resp = svc.complete(&request()).await.unwrap();
        assert_eq!(resp.content.as_deref(), Some("olá"));
    }

    #[tokio::test]
    async fn test_logging_wrapper_passes_through_error() {
        let svc = LoggingCompletion::new(Arc::new(Fixed(None)));
        let err = svc.complete(&request()).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::ServerError);
    }
}
