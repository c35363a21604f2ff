// Recommendation pipeline: Retrieve → Score → Rank.
// Every backend call goes through StageExecutor, which owns the retry policy.
// Stages are strictly sequential; each prompt embeds the previous stage's full output.

use std::fmt;

pub mod executor;
pub mod prompts;
pub mod retry;
pub mod runner;

/// One backend call within the fixed pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Retrieve,
    Score,
    Rank,
}

impl Stage {
    /// Execution order. Never reordered.
    pub const ORDER: [Stage; 3] = [Stage::Retrieve, Stage::Score, Stage::Rank];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Retrieve => "Retrieving Data",
            Stage::Score => "Scoring Candidates",
            Stage::Rank => "Ranking & Recommendations",
        }
    }

    /// Only retrieval may ground itself with live web search.
    pub fn uses_search(&self) -> bool {
        matches!(self, Stage::Retrieve)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::llm_client::{GenerationBackend, GenerationRequest, GenerationResponse, LlmError};

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub instruction: String,
        pub input: String,
        pub search: bool,
    }

    /// Replays a fixed list of outcomes and records every request it sees.
    /// Once the script runs dry every call fails with a 500.
    pub struct ScriptedBackend {
        script: Mutex<VecDeque<Result<GenerationResponse, LlmError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<Result<GenerationResponse, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(
            &self,
            request: &GenerationRequest<'_>,
        ) -> Result<GenerationResponse, LlmError> {
            self.calls.lock().unwrap().push(RecordedCall {
                instruction: request.instruction.to_string(),
                input: request.input.to_string(),
                search: request.search,
            });
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 500,
                    code: "INTERNAL".to_string(),
                    message: "script exhausted".to_string(),
                })
            })
        }

        fn model(&self) -> &str {
            "gemini-test"
        }
    }

    pub fn ok(text: &str) -> Result<GenerationResponse, LlmError> {
        Ok(GenerationResponse::from_text(text))
    }

    pub fn empty() -> Result<GenerationResponse, LlmError> {
        Ok(GenerationResponse::default())
    }

    pub fn rate_limited() -> Result<GenerationResponse, LlmError> {
        Err(LlmError::Api {
            status: 429,
            code: "RESOURCE_EXHAUSTED".to_string(),
            message: "Resource has been exhausted".to_string(),
        })
    }

    pub fn not_found() -> Result<GenerationResponse, LlmError> {
        Err(LlmError::Api {
            status: 404,
            code: "NOT_FOUND".to_string(),
            message: "models/gemini-test is not found".to_string(),
        })
    }

    pub fn invalid_argument() -> Result<GenerationResponse, LlmError> {
        Err(LlmError::Api {
            status: 400,
            code: "INVALID_ARGUMENT".to_string(),
            message: "Request contains an invalid argument".to_string(),
        })
    }
}
