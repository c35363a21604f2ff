//! StageExecutor: one backend call under the shared backoff policy.
//!
//! Failure is soft: `execute` hands back an empty string rather than an error,
//! and a response with no text becomes the `NO_RESPONSE` sentinel so the
//! operator still sees something.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, warn};

use crate::llm_client::{ErrorClass, GenerationBackend, GenerationRequest, LlmError};
use crate::pipeline::retry::{retry_with_backoff, BackoffPolicy, RetryError, Retryability};

/// Returned in place of model text when the response envelope carries none.
pub const NO_RESPONSE: &str = "No response generated.";

#[derive(Debug, Error)]
pub enum StageError {
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    #[error("generation failed: {0}")]
    Failed(String),
}

pub struct StageExecutor {
    backend: Arc<dyn GenerationBackend>,
    policy: BackoffPolicy,
}

impl StageExecutor {
    pub fn new(backend: Arc<dyn GenerationBackend>, policy: BackoffPolicy) -> Self {
        Self { backend, policy }
    }

    /// Sends one request and returns its text, `NO_RESPONSE`, or `""` on failure.
    pub async fn execute(&self, instruction: &str, input_text: &str, search: bool) -> String {
        self.try_execute(instruction, input_text, search)
            .await
            .unwrap_or_default()
    }

    /// Same as `execute`, but keeps the reason for a failure.
    pub async fn try_execute(
        &self,
        instruction: &str,
        input_text: &str,
        search: bool,
    ) -> Result<String, StageError> {
        let request = GenerationRequest {
            instruction,
            input: input_text,
            search,
        };
        let backend = &self.backend;
        let request = &request;

        let outcome =
            retry_with_backoff(&self.policy, classify, move || backend.generate(request)).await;

        match outcome {
            Ok(response) => Ok(response.text().unwrap_or_else(|| {
                warn!("Backend returned no text; substituting placeholder");
                NO_RESPONSE.to_string()
            })),
            Err(RetryError::Fatal(e)) if e.class() == ErrorClass::ModelNotFound => {
                let model = self.backend.model().to_string();
                error!("Model {model} not found. Please check model availability: {e}");
                Err(StageError::ModelNotFound(model))
            }
            Err(RetryError::Fatal(e)) => {
                error!("Generation request failed: {e}");
                Err(StageError::Failed(e.to_string()))
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                error!("Failed after {attempts} attempts due to rate limits: {last}");
                Err(StageError::Failed(last.to_string()))
            }
        }
    }
}

fn classify(e: &LlmError) -> Retryability {
    match e.class() {
        ErrorClass::RateLimited => Retryability::Retryable,
        ErrorClass::ModelNotFound | ErrorClass::Unclassified => Retryability::Fatal,
    }
}
