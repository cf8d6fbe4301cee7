// src/auth/firebase.rs
//! Identity Toolkit (Firebase Auth) REST client

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{AuthError, IdentityProvider, ProviderCredential, Session, SignInMethod};
use crate::app_log;
use crate::config::IdentityConfig;

const SIGN_IN_WITH_PASSWORD: &str = "accounts:signInWithPassword";
const SIGN_UP: &str = "accounts:signUp";
const SIGN_IN_WITH_IDP: &str = "accounts:signInWithIdp";
const SIGN_IN_WITH_CUSTOM_TOKEN: &str = "accounts:signInWithCustomToken";

const IDP_REQUEST_URI: &str = "http://localhost";

/// Claims of a provider-issued ID token. Only read for display data; the
/// evaluation service, not this client, is responsible for verifying them.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub firebase: Option<FirebaseClaim>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FirebaseClaim {
    pub sign_in_provider: Option<String>,
}

impl IdTokenClaims {
    pub fn is_anonymous(&self) -> bool {
        self.firebase
            .as_ref()
            .and_then(|f| f.sign_in_provider.as_deref())
            == Some("anonymous")
    }
}

/// Read the claims of `token` without checking its signature or expiry.
pub fn peek_claims(token: &str) -> Result<IdTokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<IdTokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidResponse(format!("unreadable ID token: {}", e)))
}

/// Success body shared by the `accounts:*` sign-in endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: Option<String>,
    local_id: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirebaseIdentityProvider {
    client: reqwest::Client,
    config: IdentityConfig,
}

impl FirebaseIdentityProvider {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}?key={}",
            self.config.base_url, endpoint, self.config.api_key
        )
    }

    async fn call(
        &self,
        endpoint: &str,
        payload: serde_json::Value,
        method: SignInMethod,
    ) -> Result<Session, AuthError> {
        if self.config.api_key.is_empty() {
            return Err(AuthError::NotConfigured("missing API key"));
        }

        let url = self.endpoint_url(endpoint);
        app_log!(debug, "Calling identity provider endpoint: {}", endpoint);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let code = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP_{}", status.as_u16()));
            app_log!(warn, "Identity provider rejected {}: {}", endpoint, code);
            return Err(AuthError::Rejected(code));
        }

        let parsed: SignInResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        session_from_response(parsed, method)
    }
}

fn session_from_response(
    response: SignInResponse,
    method: SignInMethod,
) -> Result<Session, AuthError> {
    let claims = peek_claims(&response.id_token).ok();

    let uid = response
        .local_id
        .filter(|id| !id.is_empty())
        .or_else(|| claims.as_ref().map(|c| c.sub.clone()))
        .ok_or_else(|| AuthError::InvalidResponse("response carries no user id".to_string()))?;

    let email = response
        .email
        .filter(|e| !e.is_empty())
        .or_else(|| claims.as_ref().and_then(|c| c.email.clone()));

    let display_name = response
        .display_name
        .filter(|n| !n.is_empty())
        .or_else(|| claims.as_ref().and_then(|c| c.name.clone()));

    let is_anonymous = method == SignInMethod::Anonymous
        || claims.as_ref().map(|c| c.is_anonymous()).unwrap_or(false);

    Ok(Session {
        uid,
        display_name,
        email,
        is_anonymous,
        method,
        id_token: response.id_token,
        refresh_token: response.refresh_token,
        signed_in_at: Utc::now(),
    })
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let payload = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true
        });
        self.call(SIGN_IN_WITH_PASSWORD, payload, SignInMethod::Password)
            .await
    }

    async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let payload = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true
        });
        self.call(SIGN_UP, payload, SignInMethod::SignUp).await
    }

    async fn sign_in_with_provider(
        &self,
        credential: &ProviderCredential,
    ) -> Result<Session, AuthError> {
        let payload = json!({
            "postBody": credential.post_body(),
            "requestUri": IDP_REQUEST_URI,
            "returnIdpCredential": true,
            "returnSecureToken": true
        });
        self.call(SIGN_IN_WITH_IDP, payload, SignInMethod::Provider)
            .await
    }

    async fn sign_in_anonymously(&self) -> Result<Session, AuthError> {
        let payload = json!({ "returnSecureToken": true });
        self.call(SIGN_UP, payload, SignInMethod::Anonymous).await
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<Session, AuthError> {
        let payload = json!({
            "token": token,
            "returnSecureToken": true
        });
        self.call(SIGN_IN_WITH_CUSTOM_TOKEN, payload, SignInMethod::CustomToken)
            .await
    }
}
