// src/auth/mod.rs
//! Identity session adapter: owns the current session, forwards sign-in calls
//! to the identity provider and publishes every change to subscribers.

pub mod error;
pub mod firebase;
pub mod provider;
pub mod session;

pub use error::AuthError;
pub use firebase::FirebaseIdentityProvider;
pub use provider::{IdentityProvider, ProviderCredential};
pub use session::{Session, SignInMethod};

use std::sync::Arc;
use tokio::sync::watch;

use crate::app_log;

/// Snapshot published on every session change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// False until the startup sign-in attempt has finished.
    pub ready: bool,
    pub session: Option<Session>,
}

pub struct IdentitySession {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<AuthState>,
}

impl IdentitySession {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { provider, state }
    }

    /// Receive a notification on every sign-in, sign-out and readiness change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    /// Startup sign-in. A custom token is tried first when present; if it is
    /// missing or rejected, anonymous sign-in runs once. The adapter becomes
    /// ready afterwards whatever the outcome.
    pub async fn bootstrap(&self, initial_token: Option<&str>) -> Option<Session> {
        let token = initial_token.filter(|t| !t.trim().is_empty());

        let signed_in = match token {
            Some(token) => match self.provider.sign_in_with_custom_token(token).await {
                Ok(session) => Some(session),
                Err(e) => {
                    app_log!(error, "Error with initial authentication: {}", e);
                    self.anonymous_fallback().await
                }
            },
            None => self.anonymous_fallback().await,
        };

        self.state.send_modify(|state| {
            if signed_in.is_some() {
                state.session = signed_in.clone();
            }
            state.ready = true;
        });

        signed_in
    }

    async fn anonymous_fallback(&self) -> Option<Session> {
        match self.provider.sign_in_anonymously().await {
            Ok(session) => Some(session),
            Err(e) => {
                app_log!(error, "Anonymous sign-in failed: {}", e);
                None
            }
        }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let result = self.provider.sign_in_with_password(email, password).await;
        self.publish("email/password sign-in", result)
    }

    pub async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let result = self.provider.sign_up_with_password(email, password).await;
        self.publish("sign-up", result)
    }

    pub async fn sign_in_with_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<Session, AuthError> {
        let result = self.provider.sign_in_with_provider(credential).await;
        self.publish("provider sign-in", result)
    }

    pub async fn sign_in_anonymously(&self) -> Result<Session, AuthError> {
        let result = self.provider.sign_in_anonymously().await;
        self.publish("anonymous sign-in", result)
    }

    pub async fn sign_in_with_custom_token(&self, token: &str) -> Result<Session, AuthError> {
        let result = self.provider.sign_in_with_custom_token(token).await;
        self.publish("custom-token sign-in", result)
    }

    /// Drop the current session. Signing out with no session is a no-op.
    pub fn sign_out(&self) {
        let previous = self.state.send_replace(AuthState {
            ready: true,
            session: None,
        });

        if let Some(session) = previous.session {
            app_log!(info, "User {} signed out successfully", session.uid);
        }
    }

    fn publish(
        &self,
        operation: &str,
        result: Result<Session, AuthError>,
    ) -> Result<Session, AuthError> {
        match result {
            Ok(session) => {
                app_log!(
                    info,
                    "{} succeeded for {}",
                    operation,
                    session.email.as_deref().unwrap_or(&session.uid)
                );
                self.state.send_modify(|state| {
                    state.session = Some(session.clone());
                    state.ready = true;
                });
                Ok(session)
            }
            Err(e) => {
                app_log!(error, "Error with {}: {}", operation, e);
                Err(e)
            }
        }
    }
}
