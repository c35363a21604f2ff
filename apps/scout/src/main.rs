use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use scout::config::Config;
use scout::errors::AppError;
use scout::intake::collector::RequirementCollector;
use scout::llm_client::{GeminiClient, GenerationBackend};
use scout::pipeline::executor::StageExecutor;
use scout::pipeline::runner::PipelineRunner;
use scout::{logging, report};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration first (fails fast on a missing API key)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return exit_with(AppError::Config(format!("{e:#}"))),
    };

    logging::init(&config.rust_log);
    info!("Starting scout v{}", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_with(e),
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    // One client for the whole run; stages share it read-only
    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiClient::from_config(&config)?);
    info!("LLM client initialized (model: {})", backend.model());

    let requirements = {
        let stdin = std::io::stdin();
        RequirementCollector::new(stdin.lock(), std::io::stdout()).collect()?
    };
    print!("{}", report::requirements_table(&requirements));

    let policy = config.backoff_policy();
    info!(
        "Backoff policy: {} attempts, base delay {}s",
        policy.max_attempts,
        policy.base_delay.as_secs()
    );

    let runner = PipelineRunner::new(StageExecutor::new(backend, policy));
    let final_text = runner.run(&requirements).await?;

    println!("{}", report::final_recommendations(&final_text));
    Ok(())
}

fn exit_with(err: AppError) -> ExitCode {
    let code = err.exit_code();
    if code == 0 {
        warn!("{err}");
        println!("\nWarning: {err}");
    } else {
        error!("{err}");
        eprintln!("ERROR: {err}");
    }
    ExitCode::from(code)
}
