// src/auth/session.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the current session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInMethod {
    Password,
    SignUp,
    Provider,
    Anonymous,
    CustomToken,
}

/// The identity provider's record of the signed-in (or anonymous) user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub is_anonymous: bool,
    pub method: SignInMethod,
    #[serde(skip_serializing)]
    pub id_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Name shown in the welcome line: display name, then email, then "User".
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.email.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or("User")
    }

    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}
