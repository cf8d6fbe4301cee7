// src/evaluation/request.rs
//! Resume file, evaluation request and the client-side validation rules

use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

use crate::utils::{
    content_type_essence, content_type_for_file_name, DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE,
};

pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a PDF or DOCX file.";
pub const MISSING_INPUT_MESSAGE: &str = "Please upload a resume and provide a job description.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", UNSUPPORTED_FILE_MESSAGE)]
    UnsupportedFileType { content_type: String },

    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,
}

/// The two accepted resume document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type_essence(content_type).as_str() {
            PDF_CONTENT_TYPE => Some(DocumentKind::Pdf),
            DOCX_CONTENT_TYPE => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// A picked resume: name, declared content type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk; the content type is derived from its extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "resume".to_string());

        let content_type = content_type_for_file_name(&file_name);
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_content_type(&self.content_type)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One submission: the resume and the job-description text.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub resume: ResumeFile,
    pub job_description: String,
}

impl EvaluationRequest {
    /// Apply every submission rule and build the request.
    pub fn build(
        resume: Option<&ResumeFile>,
        job_description: &str,
    ) -> Result<Self, ValidationError> {
        validate_submission(resume, job_description)?;

        // validate_submission guarantees presence
        let resume = resume.cloned().ok_or(ValidationError::MissingInput)?;
        Ok(Self {
            resume,
            job_description: job_description.to_string(),
        })
    }
}

/// Accept only PDF and DOCX by content type.
pub fn validate_file(file: &ResumeFile) -> Result<DocumentKind, ValidationError> {
    file.kind()
        .ok_or_else(|| ValidationError::UnsupportedFileType {
            content_type: file.content_type.clone(),
        })
}

/// Both a supported file and non-empty text must be present. Text made only
/// of whitespace still counts as text.
pub fn validate_submission(
    resume: Option<&ResumeFile>,
    job_description: &str,
) -> Result<(), ValidationError> {
    let resume = match resume {
        Some(resume) if !job_description.is_empty() => resume,
        _ => return Err(ValidationError::MissingInput),
    };

    validate_file(resume).map(|_| ())
}
