// src/auth/provider.rs
//! Identity provider seam

use async_trait::async_trait;

use super::{AuthError, Session};

/// Credential obtained from an external identity provider (the browser popup
/// equivalent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCredential {
    GoogleIdToken(String),
    GoogleAccessToken(String),
}

impl ProviderCredential {
    pub fn provider_id(&self) -> &'static str {
        match self {
            ProviderCredential::GoogleIdToken(_) | ProviderCredential::GoogleAccessToken(_) => {
                "google.com"
            }
        }
    }

    /// Form-encoded `postBody` expected by `accounts:signInWithIdp`.
    pub fn post_body(&self) -> String {
        match self {
            ProviderCredential::GoogleIdToken(token) => {
                format!("id_token={}&providerId={}", token, self.provider_id())
            }
            ProviderCredential::GoogleAccessToken(token) => {
                format!("access_token={}&providerId={}", token, self.provider_id())
            }
        }
    }
}

/// Sign-in operations consumed from the identity provider. Each successful
/// call yields a fresh `Session`; the caller owns what happens to it.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, AuthError>;

    async fn sign_up_with_password(&self, email: &str, password: &str)
        -> Result<Session, AuthError>;

    async fn sign_in_with_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<Session, AuthError>;

    async fn sign_in_anonymously(&self) -> Result<Session, AuthError>;

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<Session, AuthError>;
}
