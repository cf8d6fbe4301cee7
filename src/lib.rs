// src/lib.rs
//! Resume evaluator client: identity session handling, the resume submission
//! flow against the external scoring service, and a terminal front end.

pub mod logging;

pub mod auth;
pub mod cli;
pub mod config;
pub mod evaluation;
pub mod utils;
pub mod view;

pub use auth::{AuthError, AuthState, IdentityProvider, IdentitySession, Session};
pub use config::AppConfig;
pub use evaluation::{
    EvaluationClient, EvaluationFlow, EvaluationResult, EvaluationService, FlowState, ResumeFile,
};
pub use view::{View, ViewSwitcher};
