// src/cli/mod.rs
pub mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_log;
use crate::auth::{FirebaseIdentityProvider, IdentitySession};
use crate::config::{AppConfig, Overrides};
use crate::evaluation::{EvaluationClient, EvaluationFlow, EvaluationService, FlowState, ResumeFile};

pub use interactive::App;

#[derive(Parser)]
#[command(name = "resume-evaluator")]
#[command(about = "Score a resume against a job description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the evaluation service
    #[arg(long, global = true)]
    pub evaluation_url: Option<String>,

    /// Identity provider API key
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Where the JSON log is written
    #[arg(long, global = true)]
    pub log_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate one resume and print the report
    Evaluate {
        /// Resume file (PDF or DOCX)
        #[arg(long)]
        resume: PathBuf,
        /// Job description text
        #[arg(long, conflicts_with = "job_file", required_unless_present = "job_file")]
        job_description: Option<String>,
        /// File containing the job description
        #[arg(long)]
        job_file: Option<PathBuf>,
        /// Print the raw result as JSON instead of the report
        #[arg(long)]
        json: bool,
    },
    /// Check that the evaluation service is up
    Health,
    /// Sign in and work from the dashboard
    App {
        /// Custom token tried before anonymous sign-in
        #[arg(long)]
        custom_token: Option<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        let initial_auth_token = match &self.command {
            Command::App { custom_token } => custom_token.clone(),
            _ => None,
        };

        Overrides {
            evaluation_url: self.evaluation_url.clone(),
            identity_api_key: self.api_key.clone(),
            initial_auth_token,
            log_path: self.log_path.clone(),
        }
    }
}

pub async fn handle_command(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Evaluate {
            resume,
            job_description,
            job_file,
            json,
        } => {
            let job_description = match (job_description, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read file: {}", path.display()))?,
                (None, None) => String::new(),
            };

            let file = ResumeFile::from_path(&resume).await?;
            let flow = EvaluationFlow::new(EvaluationClient::new(config.evaluation_url.clone()));
            let output = evaluate_once(flow, file, job_description, json).await?;
            println!("{}", output);
        }

        Command::Health => {
            let client = EvaluationClient::new(config.evaluation_url.clone());
            match client.health_check().await {
                Ok(banner) => println!("✓ {} is up: {}", config.evaluation_url, banner.trim()),
                Err(e) => {
                    app_log!(error, "Health check failed: {}", e);
                    anyhow::bail!("{} is not reachable: {}", config.evaluation_url, e)
                }
            }
        }

        Command::App { .. } => {
            let provider = Arc::new(FirebaseIdentityProvider::new(config.identity.clone()));
            let identity = IdentitySession::new(provider);
            let flow = EvaluationFlow::new(EvaluationClient::new(config.evaluation_url.clone()));

            let mut app = App::new(identity, flow);
            let mut input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut output = tokio::io::stdout();

            app.run(
                config.initial_auth_token.as_deref(),
                &mut input,
                &mut output,
            )
            .await?;
        }
    }

    Ok(())
}

/// Drive one submission through the flow; the printable outcome on success.
pub async fn evaluate_once<S: EvaluationService>(
    mut flow: EvaluationFlow<S>,
    file: ResumeFile,
    job_description: String,
    json: bool,
) -> Result<String> {
    if let Err(e) = flow.select_file(file) {
        anyhow::bail!("{}", e);
    }
    flow.set_job_description(job_description);

    let state = flow.submit().await.clone();
    match state {
        FlowState::Succeeded(result) => {
            if json {
                serde_json::to_string_pretty(&result).context("Failed to serialize result")
            } else {
                Ok(crate::evaluation::render_report(&result))
            }
        }
        FlowState::Failed(message) => anyhow::bail!("{}", message),
        _ => anyhow::bail!(
            "{}",
            flow.error().unwrap_or("Submission did not complete")
        ),
    }
}
