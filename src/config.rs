// src/config.rs
//! Layered configuration: `config.yaml` section, then environment variables,
//! then command-line overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_EVALUATION_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_LOG_PATH: &str = "/tmp/resume-evaluator.log";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: String,
    /// Base URL of the evaluation service; `/evaluate` is appended per call.
    pub evaluation_url: String,
    pub identity: IdentityConfig,
    /// Custom token to try at startup before falling back to anonymous sign-in.
    pub initial_auth_token: Option<String>,
    pub log_path: PathBuf,
    /// The `config.yaml` a section was read from, if one existed.
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
}

/// One environment section of `config.yaml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSection {
    pub evaluation_url: Option<String>,
    pub identity_api_key: Option<String>,
    pub identity_base_url: Option<String>,
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSection,
    #[serde(default)]
    production: FileSection,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub evaluation_url: Option<String>,
    pub identity_api_key: Option<String>,
    pub initial_auth_token: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from `config.yaml` in the working directory (if any)
    /// and the process environment.
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE_NAME), overrides)
    }

    /// Same as `load` with an explicit config file path.
    pub fn load_from(file_path: &Path, overrides: Overrides) -> Result<Self> {
        let environment = Self::get_environment();

        let (section, config_file) = if file_path.exists() {
            (
                Self::load_section(file_path, &environment)?,
                Some(file_path.to_path_buf()),
            )
        } else {
            (FileSection::default(), None)
        };

        let mut config = Self::resolve(
            environment,
            section,
            |key| std::env::var(key).ok(),
            overrides,
        );
        config.config_file = config_file;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("RESUME_EVALUATOR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Read the section of `path` matching `environment`. Anything other than
    /// `production` selects `local`.
    pub fn load_section(path: &Path, environment: &str) -> Result<FileSection> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config_file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Merge the layers. `env` looks up an environment variable by name.
    pub fn resolve<F>(
        environment: String,
        section: FileSection,
        env: F,
        overrides: Overrides,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let evaluation_url = overrides
            .evaluation_url
            .or_else(|| non_empty("EVALUATION_API_URL"))
            .or(section.evaluation_url)
            .unwrap_or_else(|| DEFAULT_EVALUATION_URL.to_string());

        let api_key = overrides
            .identity_api_key
            .or_else(|| non_empty("FIREBASE_API_KEY"))
            .or(section.identity_api_key)
            .unwrap_or_default();

        let base_url = non_empty("IDENTITY_BASE_URL")
            .or(section.identity_base_url)
            .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string());

        let initial_auth_token = overrides
            .initial_auth_token
            .or_else(|| non_empty("INITIAL_AUTH_TOKEN"));

        let log_path = overrides
            .log_path
            .or_else(|| non_empty("RESUME_EVALUATOR_LOG").map(PathBuf::from))
            .or(section.log_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

        Self {
            environment,
            evaluation_url: trim_trailing_slash(evaluation_url),
            identity: IdentityConfig {
                api_key,
                base_url: trim_trailing_slash(base_url),
            },
            initial_auth_token,
            log_path,
            config_file: None,
        }
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
