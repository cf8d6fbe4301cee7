// src/auth/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", describe_provider_code(.0))]
    Rejected(String),

    #[error("Network error while contacting the identity provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from the identity provider: {0}")]
    InvalidResponse(String),

    #[error("Identity provider is not configured: {0}")]
    NotConfigured(&'static str),
}

impl AuthError {
    /// Provider error code, when the provider rejected the request.
    pub fn code(&self) -> Option<&str> {
        match self {
            AuthError::Rejected(code) => Some(code.as_str()),
            _ => None,
        }
    }
}

/// Readable text for an Identity Toolkit error code. Codes may carry a detail
/// suffix such as `WEAK_PASSWORD : Password should be at least 6 characters`.
pub fn describe_provider_code(raw: &str) -> String {
    let (code, detail) = match raw.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (raw.trim(), None),
    };

    let message = match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password."
        }
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "MISSING_PASSWORD" => "Please enter a password.",
        "EMAIL_EXISTS" => "An account already exists for this email address.",
        "WEAK_PASSWORD" => "Password should be at least 6 characters.",
        "USER_DISABLED" => "This account has been disabled.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
        "OPERATION_NOT_ALLOWED" | "ADMIN_ONLY_OPERATION" => {
            "This sign-in method is not enabled."
        }
        "INVALID_CUSTOM_TOKEN" | "CREDENTIAL_MISMATCH" => "The sign-in token was rejected.",
        "INVALID_IDP_RESPONSE" | "INVALID_ID_TOKEN" => {
            "The identity provider credential was rejected."
        }
        "API_KEY_INVALID" => "The identity provider API key is not valid.",
        _ => {
            return match detail {
                Some(detail) => format!("Authentication failed ({}): {}", code, detail),
                None => format!("Authentication failed ({})", code),
            }
        }
    };

    match (code, detail) {
        ("WEAK_PASSWORD", Some(detail)) => format!("{}.", detail.trim_end_matches('.')),
        _ => message.to_string(),
    }
}
