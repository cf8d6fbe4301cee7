// tests/common/mod.rs
//! Shared fixtures: a one-route HTTP stub and fake trait implementations.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use resume_evaluator::auth::{
    AuthError, IdentityProvider, ProviderCredential, Session, SignInMethod,
};
use resume_evaluator::evaluation::{
    EvaluationError, EvaluationRequest, EvaluationResult, EvaluationService,
};

pub const FIXED_RESULT: &str = r#"{
    "overall_score": 57.14,
    "summary": "The resume has an overall match score of 57.14%. It is a moderate match, with room for improvement in key areas.",
    "match_breakdown": {
        "skills_and_keywords": {
            "matched_keywords": ["rust", "postgres", "kafka"],
            "missing_keywords": ["kubernetes", "terraform"]
        },
        "feedback": "This is placeholder feedback. Advanced analysis could go here."
    }
}"#;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Answers every connection with the same canned response and records what
/// it received.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let body = body.to_string();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = recorded.clone();
                let body = body.clone();
                tokio::spawn(async move {
                    serve(stream, status, &body, &recorded).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Base URL of a port nobody listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn serve(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    recorded: &Mutex<Vec<CapturedRequest>>,
) -> Option<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let lower = head.to_lowercase();
    let content_length = lower
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = lower.contains("transfer-encoding: chunked");

    loop {
        let received = buf.len() - header_end;
        let complete = match content_length {
            Some(len) => received >= len,
            None if chunked => buf.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            break;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    // recorded before the client can see a response
    recorded.lock().unwrap().push(CapturedRequest {
        head,
        body: buf[header_end..].to_vec(),
    });

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

pub fn fixed_result() -> EvaluationResult {
    serde_json::from_str(FIXED_RESULT).unwrap()
}

/// Evaluation service that always answers with `fixed_result()`.
#[derive(Default)]
pub struct FixedService {
    pub calls: AtomicUsize,
}

#[async_trait]
impl EvaluationService for FixedService {
    async fn evaluate(
        &self,
        _request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(fixed_result())
    }
}

/// Identity provider that accepts one password and everything anonymous.
#[derive(Default)]
pub struct FakeProvider {
    pub reject_custom_token: bool,
    pub anonymous_calls: AtomicUsize,
    /// Every password handed to sign-in or sign-up, as received.
    pub passwords: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn passwords(&self) -> Vec<String> {
        self.passwords.lock().unwrap().clone()
    }

    fn record_password(&self, password: &str) {
        self.passwords.lock().unwrap().push(password.to_string());
    }
}

pub fn session(uid: &str, email: Option<&str>, method: SignInMethod) -> Session {
    Session {
        uid: uid.to_string(),
        display_name: None,
        email: email.map(str::to_string),
        is_anonymous: method == SignInMethod::Anonymous,
        method,
        id_token: format!("id-token-{}", uid),
        refresh_token: None,
        signed_in_at: Utc::now(),
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.record_password(password);
        if password == "hunter22" {
            Ok(session("user-1", Some(email), SignInMethod::Password))
        } else {
            Err(AuthError::Rejected("INVALID_LOGIN_CREDENTIALS".to_string()))
        }
    }

    async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.record_password(password);
        Ok(session("user-2", Some(email), SignInMethod::SignUp))
    }

    async fn sign_in_with_provider(
        &self,
        _credential: &ProviderCredential,
    ) -> Result<Session, AuthError> {
        Ok(session("google-1", Some("g@example.com"), SignInMethod::Provider))
    }

    async fn sign_in_anonymously(&self) -> Result<Session, AuthError> {
        self.anonymous_calls.fetch_add(1, Ordering::SeqCst);
        Ok(session("anon-1", None, SignInMethod::Anonymous))
    }

    async fn sign_in_with_custom_token(&self, _token: &str) -> Result<Session, AuthError> {
        if self.reject_custom_token {
            Err(AuthError::Rejected("INVALID_CUSTOM_TOKEN".to_string()))
        } else {
            Ok(session("custom-1", Some("c@example.com"), SignInMethod::CustomToken))
        }
    }
}
