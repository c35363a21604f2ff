//! PipelineRunner: Retrieve → Score → Rank, strictly in sequence.
//!
//! Flow: build retrieval prompt → search-enabled call → scoring prompt embedding
//!       requirements + candidates → ranking prompt embedding scores → final text.
//!
//! A stage that fails stops the run; later stages are never called with
//! empty context.

use thiserror::Error;
use tracing::{info, warn};

use crate::models::requirements::Requirements;
use crate::pipeline::executor::{StageError, StageExecutor, NO_RESPONSE};
use crate::pipeline::prompts::{PromptBuilder, StagePrompt};
use crate::pipeline::Stage;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0} produced no output; remaining stages skipped")]
    StageFailed(Stage),

    #[error("model '{0}' is not available for this API key")]
    ModelNotFound(String),

    #[error("failed to render prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}

pub struct PipelineRunner {
    executor: StageExecutor,
}

impl PipelineRunner {
    pub fn new(executor: StageExecutor) -> Self {
        Self { executor }
    }

    /// Runs every stage in `Stage::ORDER` and returns the last stage's text.
    pub async fn run(&self, requirements: &Requirements) -> Result<String, PipelineError> {
        let prompts = PromptBuilder::new(requirements);
        let mut previous = String::new();

        for stage in Stage::ORDER {
            let prompt = match stage {
                Stage::Retrieve => prompts.retrieve(),
                Stage::Score => prompts.score(&previous)?,
                Stage::Rank => prompts.rank(&previous),
            };
            previous = self.run_stage(stage, prompt).await?;
            report_progress(stage, &previous);
        }

        Ok(previous)
    }

    async fn run_stage(&self, stage: Stage, prompt: StagePrompt) -> Result<String, PipelineError> {
        println!("\n--- {} ---", stage.label());
        info!(
            "Running stage {:?} (search={}, input_chars={})",
            stage,
            stage.uses_search(),
            prompt.input.len()
        );

        let text = self
            .executor
            .try_execute(&prompt.instruction, &prompt.input, stage.uses_search())
            .await
            .map_err(|e| match e {
                StageError::ModelNotFound(model) => PipelineError::ModelNotFound(model),
                StageError::Failed(_) => PipelineError::StageFailed(stage),
            })?;

        info!("Stage {:?} produced {} chars", stage, text.len());
        Ok(text)
    }
}

/// Operator-facing progress after a stage succeeds. The ranking text is
/// printed by the caller.
fn report_progress(stage: Stage, text: &str) {
    match stage {
        Stage::Retrieve => {
            if text == NO_RESPONSE {
                warn!("Search returned no useful text; scoring may be unreliable");
            }
            println!("Search results received.");
        }
        Stage::Score => println!("{text}"),
        Stage::Rank => {}
    }
}
