use anyhow::Result;
use clap::Parser;
use resume_evaluator::app_log;
use resume_evaluator::cli::{handle_command, Cli};
use resume_evaluator::config::AppConfig;
use resume_evaluator::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.overrides())?;

    // Initialize logging first
    init_logging(&config.log_path, "info")?;

    app_log!(info, "Environment: {}", config.environment);
    if let Some(path) = &config.config_file {
        app_log!(
            info,
            "Loaded {} section from {}",
            config.environment,
            path.display()
        );
    }
    app_log!(info, "Evaluation service: {}", config.evaluation_url);
    app_log!(info, "Identity provider: {}", config.identity.base_url);

    handle_command(cli.command, config).await
}
