// src/evaluation/flow.rs
//! Submission state machine: Idle -> Validating -> Submitting -> Succeeded | Failed.
//! Any file or text edit returns it to Idle.

use tracing::Instrument;
use uuid::Uuid;

use super::client::EvaluationService;
use super::report::render_report;
use super::request::{validate_file, DocumentKind, EvaluationRequest, ResumeFile, ValidationError};
use super::types::EvaluationResult;
use crate::{app_log, app_span};

pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during evaluation. Please try again.";
pub const SUBMIT_LABEL: &str = "Evaluate Resume";
pub const SUBMITTING_LABEL: &str = "Evaluating...";

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    Validating,
    Submitting,
    Succeeded(EvaluationResult),
    Failed(String),
}

pub struct EvaluationFlow<S> {
    service: S,
    resume: Option<ResumeFile>,
    job_description: String,
    state: FlowState,
    error: Option<String>,
}

impl<S: EvaluationService> EvaluationFlow<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            resume: None,
            job_description: String::new(),
            state: FlowState::Idle,
            error: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Message shown inline: a validation problem or the generic failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn resume(&self) -> Option<&ResumeFile> {
        self.resume.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match &self.state {
            FlowState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn rendered_report(&self) -> Option<String> {
        self.result().map(render_report)
    }

    /// The submit control is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        self.state != FlowState::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.can_submit() {
            SUBMIT_LABEL
        } else {
            SUBMITTING_LABEL
        }
    }

    /// Pick a resume. An unsupported type clears the current selection.
    pub fn select_file(&mut self, file: ResumeFile) -> Result<DocumentKind, ValidationError> {
        self.state = FlowState::Idle;

        match validate_file(&file) {
            Ok(kind) => {
                app_log!(debug, "Selected resume {} ({:?})", file.file_name, kind);
                self.resume = Some(file);
                self.error = None;
                Ok(kind)
            }
            Err(e) => {
                app_log!(
                    warn,
                    "Rejected resume {} with content type {}",
                    file.file_name,
                    file.content_type
                );
                self.resume = None;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Forget the file, text, result and error.
    pub fn reset(&mut self) {
        self.resume = None;
        self.job_description.clear();
        self.state = FlowState::Idle;
        self.error = None;
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
        self.state = FlowState::Idle;
    }

    /// Validate, then send a single request. Validation failures leave the flow
    /// Idle with an error and never reach the service.
    pub async fn submit(&mut self) -> &FlowState {
        match self.begin_submit() {
            Some(request) => self.complete_submit(request).await,
            None => &self.state,
        }
    }

    /// First half of a submission: validate and move to `Submitting`.
    ///
    /// Returns the request to send, or `None` when validation failed or a
    /// submission is already in flight. While in flight the submit control is
    /// disabled and its label reads `Evaluating...`.
    pub fn begin_submit(&mut self) -> Option<EvaluationRequest> {
        if !self.can_submit() {
            app_log!(debug, "Submission ignored: request already in flight");
            return None;
        }

        self.state = FlowState::Validating;
        match EvaluationRequest::build(self.resume.as_ref(), &self.job_description) {
            Ok(request) => {
                self.state = FlowState::Submitting;
                self.error = None;
                Some(request)
            }
            Err(e) => {
                self.state = FlowState::Idle;
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Second half: send the request from `begin_submit` and record the outcome.
    pub async fn complete_submit(&mut self, request: EvaluationRequest) -> &FlowState {
        let submission_id = Uuid::new_v4();
        let span = app_span!(
            "evaluation_submission",
            submission_id = %submission_id,
            file_name = %request.resume.file_name
        );

        let outcome = self.service.evaluate(&request).instrument(span).await;

        self.state = match outcome {
            Ok(result) => {
                app_log!(
                    info,
                    "Evaluation {} succeeded with score {}",
                    submission_id,
                    result.overall_score
                );
                FlowState::Succeeded(result)
            }
            Err(e) => {
                app_log!(error, "Error during evaluation {}: {}", submission_id, e);
                self.error = Some(GENERIC_FAILURE_MESSAGE.to_string());
                FlowState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
            }
        };

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::client::EvaluationError;
    use crate::evaluation::types::{MatchBreakdown, SkillsAndKeywords};
    use crate::utils::{DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeService {
        reply: Option<EvaluationResult>,
        calls: AtomicUsize,
    }

    impl FakeService {
        fn succeeding(result: EvaluationResult) -> Self {
            Self {
                reply: Some(result),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EvaluationService for FakeService {
        async fn evaluate(
            &self,
            _request: &EvaluationRequest,
        ) -> Result<EvaluationResult, EvaluationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(EvaluationError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            })
        }
    }

    fn sample_result() -> EvaluationResult {
        EvaluationResult {
            overall_score: 82.5,
            summary: "Strong match".to_string(),
            match_breakdown: MatchBreakdown {
                skills_and_keywords: SkillsAndKeywords {
                    matched_keywords: vec!["rust".to_string()],
                    missing_keywords: vec!["terraform".to_string()],
                },
                feedback: "Looks good".to_string(),
            },
        }
    }

    fn pdf() -> ResumeFile {
        ResumeFile::new("cv.pdf", PDF_CONTENT_TYPE, b"%PDF".to_vec())
    }

    #[tokio::test]
    async fn test_rejects_without_file() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.set_job_description("Backend engineer");

        assert_eq!(flow.submit().await, &FlowState::Idle);
        assert_eq!(
            flow.error(),
            Some("Please upload a resume and provide a job description.")
        );
        assert_eq!(flow.service().calls(), 0);
    }

    #[tokio::test]
    async fn test_rejects_empty_text() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.select_file(pdf()).unwrap();

        assert_eq!(flow.submit().await, &FlowState::Idle);
        assert!(flow.error().is_some());
        assert_eq!(flow.service().calls(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_text_is_sent() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.select_file(pdf()).unwrap();
        flow.set_job_description("   ");

        assert_eq!(
            flow.submit().await,
            &FlowState::Succeeded(sample_result())
        );
        assert_eq!(flow.error(), None);
        assert_eq!(flow.service().calls(), 1);
    }

    #[tokio::test]
    async fn test_in_flight_submission_blocks_another() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.select_file(pdf()).unwrap();
        flow.set_job_description("Backend engineer");

        let request = flow.begin_submit().unwrap();
        assert_eq!(flow.state(), &FlowState::Submitting);
        assert!(!flow.can_submit());
        assert_eq!(flow.submit_label(), SUBMITTING_LABEL);

        assert!(flow.begin_submit().is_none());
        assert_eq!(flow.submit().await, &FlowState::Submitting);
        assert_eq!(flow.service().calls(), 0);

        assert_eq!(
            flow.complete_submit(request).await,
            &FlowState::Succeeded(sample_result())
        );
        assert_eq!(flow.service().calls(), 1);
        assert_eq!(flow.submit_label(), SUBMIT_LABEL);
    }

    #[tokio::test]
    async fn test_begin_submit_reports_validation_error() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.set_job_description("Backend engineer");

        assert!(flow.begin_submit().is_none());
        assert_eq!(flow.state(), &FlowState::Idle);
        assert_eq!(
            flow.error(),
            Some("Please upload a resume and provide a job description.")
        );
    }

    #[tokio::test]
    async fn test_unsupported_file_clears_selection() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.select_file(pdf()).unwrap();

        let png = ResumeFile::new("photo.png", "image/png", vec![0x89]);
        assert!(flow.select_file(png).is_err());
        assert!(flow.resume().is_none());
        assert_eq!(flow.error(), Some("Please upload a PDF or DOCX file."));

        flow.set_job_description("Backend engineer");
        flow.submit().await;
        assert_eq!(flow.service().calls(), 0);
    }

    #[tokio::test]
    async fn test_success_stores_result() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        let docx = ResumeFile::new("cv.docx", DOCX_CONTENT_TYPE, vec![1, 2]);
        assert_eq!(flow.select_file(docx), Ok(DocumentKind::Docx));
        flow.set_job_description("Backend engineer");

        assert_eq!(
            flow.submit().await,
            &FlowState::Succeeded(sample_result())
        );
        assert_eq!(flow.error(), None);
        assert_eq!(flow.service().calls(), 1);
        assert!(flow.rendered_report().unwrap().contains("82.5%"));
        assert!(flow.can_submit());
        assert_eq!(flow.submit_label(), SUBMIT_LABEL);
    }

    #[tokio::test]
    async fn test_failure_uses_generic_message() {
        let mut flow = EvaluationFlow::new(FakeService::failing());
        flow.select_file(pdf()).unwrap();
        flow.set_job_description("Backend engineer");

        assert_eq!(
            flow.submit().await,
            &FlowState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
        );
        assert_eq!(flow.error(), Some(GENERIC_FAILURE_MESSAGE));
        assert!(flow.result().is_none());
        assert!(flow.rendered_report().is_none());
    }

    #[tokio::test]
    async fn test_edit_returns_to_idle() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.select_file(pdf()).unwrap();
        flow.set_job_description("Backend engineer");
        flow.submit().await;
        assert!(flow.result().is_some());

        flow.set_job_description("Platform engineer");
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.result().is_none());

        flow.submit().await;
        flow.select_file(pdf()).unwrap();
        assert_eq!(flow.state(), &FlowState::Idle);
        assert_eq!(flow.service().calls(), 2);
    }

    #[tokio::test]
    async fn test_reset_forgets_everything() {
        let mut flow = EvaluationFlow::new(FakeService::succeeding(sample_result()));
        flow.select_file(pdf()).unwrap();
        flow.set_job_description("Backend engineer");
        flow.submit().await;

        flow.reset();
        assert!(flow.resume().is_none());
        assert_eq!(flow.job_description(), "");
        assert_eq!(flow.state(), &FlowState::Idle);
        assert_eq!(flow.error(), None);
    }
}
