// src/evaluation/client.rs
//! HTTP client for the external evaluation service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use thiserror::Error;

use super::request::EvaluationRequest;
use super::types::EvaluationResult;
use crate::app_log;

const EVALUATE_ENDPOINT: &str = "/evaluate";
const HEALTH_ENDPOINT: &str = "/";

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse evaluation response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    Request(String),
}

/// The scoring service as seen by the submission flow.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError>;
}

pub struct EvaluationClient {
    client: reqwest::Client,
    base_url: String,
}

impl EvaluationClient {
    /// No timeout is configured: one submission is one round trip, however long
    /// the service takes to score it.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn evaluate_url(&self) -> String {
        format!("{}{}", self.base_url, EVALUATE_ENDPOINT)
    }

    fn build_form(request: &EvaluationRequest) -> Result<Form, EvaluationError> {
        let resume = Part::bytes(request.resume.bytes.clone())
            .file_name(request.resume.file_name.clone())
            .mime_str(&request.resume.content_type)
            .map_err(|e| EvaluationError::Request(e.to_string()))?;

        Ok(Form::new()
            .part(RESUME_FIELD, resume)
            .text(JOB_DESCRIPTION_FIELD, request.job_description.clone()))
    }

    /// `GET /` on the service; returns the banner text when it is up.
    pub async fn health_check(&self) -> Result<String, EvaluationError> {
        let url = format!("{}{}", self.base_url, HEALTH_ENDPOINT);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(EvaluationError::Status { status, body })
        }
    }
}

#[async_trait]
impl EvaluationService for EvaluationClient {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError> {
        let url = self.evaluate_url();
        let form = Self::build_form(request)?;

        app_log!(
            info,
            "Calling evaluation service: {} ({} bytes, {})",
            url,
            request.resume.len(),
            request.resume.content_type
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        let body = response.text().await?;

        if !status.is_success() {
            app_log!(error, "Evaluation service error response: {}", body);
            return Err(EvaluationError::Status { status, body });
        }

        serde_json::from_str::<EvaluationResult>(&body).map_err(|e| {
            app_log!(error, "Unparseable evaluation response: {}", body);
            EvaluationError::Decode(e.to_string())
        })
    }
}
