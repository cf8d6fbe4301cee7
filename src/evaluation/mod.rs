// src/evaluation/mod.rs
//! Resume evaluation: request validation, the HTTP client for the scoring
//! service, the submission state machine and report rendering.

pub mod client;
pub mod flow;
pub mod report;
pub mod request;
pub mod types;

pub use client::{EvaluationClient, EvaluationError, EvaluationService};
pub use flow::{EvaluationFlow, FlowState, GENERIC_FAILURE_MESSAGE};
pub use report::{render_report, Report};
pub use request::{DocumentKind, EvaluationRequest, ResumeFile, ValidationError};
pub use types::{EvaluationResult, MatchBreakdown, ScoreBand, SkillsAndKeywords};
