use thiserror::Error;

use crate::intake::collector::IntakeError;
use crate::llm_client::LlmError;
use crate::pipeline::runner::PipelineError;

/// Application-level error type.
/// `main` maps it to a diagnostic on stderr and a process exit status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Intake(#[from] IntakeError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    /// Exit status for this error. A pipeline that stopped on an empty stage
    /// has already reported its warning, so the process still ends cleanly.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Pipeline(PipelineError::StageFailed(_)) => 0,
            AppError::Config(_)
            | AppError::Intake(_)
            | AppError::Llm(_)
            | AppError::Pipeline(_) => 1,
        }
    }
}
