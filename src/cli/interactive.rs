// src/cli/interactive.rs
//! Line-oriented front end: renders the current view and reads menu choices.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app_log;
use crate::auth::{IdentitySession, ProviderCredential};
use crate::evaluation::{EvaluationFlow, EvaluationService, ResumeFile};
use crate::view::{header_line, welcome_line, View, ViewSwitcher};

/// Line that ends multi-line job-description input.
pub const END_OF_TEXT: &str = ".";

pub struct App<S> {
    identity: IdentitySession,
    switcher: ViewSwitcher,
    flow: EvaluationFlow<S>,
    auth_error: Option<String>,
}

enum Step {
    Continue,
    Quit,
}

impl<S: EvaluationService> App<S> {
    pub fn new(identity: IdentitySession, flow: EvaluationFlow<S>) -> Self {
        Self {
            identity,
            switcher: ViewSwitcher::new(),
            flow,
            auth_error: None,
        }
    }

    pub fn identity(&self) -> &IdentitySession {
        &self.identity
    }

    pub fn flow(&self) -> &EvaluationFlow<S> {
        &self.flow
    }

    pub fn view(&self) -> View {
        self.switcher.current(&self.identity.snapshot())
    }

    /// Run the startup sign-in, then serve views until `q` or end of input.
    pub async fn run<R, W>(
        &mut self,
        initial_token: Option<&str>,
        input: &mut R,
        output: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(output, "Loading...").await?;
        self.identity.bootstrap(initial_token).await;

        loop {
            let step = match self.view() {
                View::Loading => {
                    write_line(output, "Loading...").await?;
                    Step::Quit
                }
                View::Login => self.login_view(input, output).await?,
                View::SignUp => self.sign_up_view(input, output).await?,
                View::Dashboard(_) => self.dashboard_view(input, output).await?,
            };

            if let Step::Quit = step {
                return Ok(());
            }
        }
    }

    async fn login_view<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<Step>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(output, "\n== Sign In ==").await?;
        self.write_auth_error(output).await?;
        write_line(
            output,
            "[1] Sign in with email  [2] Sign in with Google  [3] Sign up  [q] Quit",
        )
        .await?;

        let Some(choice) = read_line(input).await? else {
            return Ok(Step::Quit);
        };

        match choice.as_str() {
            "1" => {
                let Some((email, password)) = read_credentials(input, output).await? else {
                    return Ok(Step::Quit);
                };
                self.auth_error = self
                    .identity
                    .sign_in_with_password(&email, &password)
                    .await
                    .err()
                    .map(|e| e.to_string());
            }
            "2" => {
                let Some(token) = prompt(input, output, "Google ID token: ").await? else {
                    return Ok(Step::Quit);
                };
                let credential = ProviderCredential::GoogleIdToken(token);
                self.auth_error = self
                    .identity
                    .sign_in_with_provider(&credential)
                    .await
                    .err()
                    .map(|e| e.to_string());
            }
            "3" => {
                self.auth_error = None;
                self.switcher.switch_to_sign_up();
            }
            "q" => return Ok(Step::Quit),
            other => write_line(output, &format!("Unknown choice: {}", other)).await?,
        }

        Ok(Step::Continue)
    }

    async fn sign_up_view<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<Step>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(output, "\n== Sign Up ==").await?;
        self.write_auth_error(output).await?;
        write_line(output, "[1] Create account  [2] Back to sign in  [q] Quit").await?;

        let Some(choice) = read_line(input).await? else {
            return Ok(Step::Quit);
        };

        match choice.as_str() {
            "1" => {
                let Some((email, password)) = read_credentials(input, output).await? else {
                    return Ok(Step::Quit);
                };
                self.auth_error = self
                    .identity
                    .sign_up_with_password(&email, &password)
                    .await
                    .err()
                    .map(|e| e.to_string());
            }
            "2" => {
                self.auth_error = None;
                self.switcher.switch_to_login();
            }
            "q" => return Ok(Step::Quit),
            other => write_line(output, &format!("Unknown choice: {}", other)).await?,
        }

        Ok(Step::Continue)
    }

    async fn dashboard_view<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<Step>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(session) = self.identity.current() else {
            return Ok(Step::Continue);
        };

        write_line(output, "\n== AI Resume Evaluator ==").await?;
        write_line(output, &header_line(&session)).await?;
        write_line(output, &welcome_line(&session)).await?;
        write_line(
            output,
            &format!(
                "Resume: {}",
                self.flow
                    .resume()
                    .map(|r| r.file_name.as_str())
                    .unwrap_or("(none)")
            ),
        )
        .await?;
        write_line(
            output,
            &format!(
                "Job description: {} characters",
                self.flow.job_description().chars().count()
            ),
        )
        .await?;
        write_line(
            output,
            &format!(
                "[1] Choose resume  [2] Paste job description  [3] {}  [4] Sign out  [q] Quit",
                self.flow.submit_label()
            ),
        )
        .await?;

        let Some(choice) = read_line(input).await? else {
            return Ok(Step::Quit);
        };

        match choice.as_str() {
            "1" => {
                let Some(path) = prompt(input, output, "Resume path (PDF or DOCX): ").await?
                else {
                    return Ok(Step::Quit);
                };
                match ResumeFile::from_path(Path::new(&path)).await {
                    Ok(file) => {
                        if let Err(e) = self.flow.select_file(file) {
                            write_line(output, &e.to_string()).await?;
                        }
                    }
                    Err(e) => {
                        app_log!(warn, "Could not read resume {}: {:#}", path, e);
                        write_line(output, &format!("Could not read {}", path)).await?;
                    }
                }
            }
            "2" => {
                write_line(
                    output,
                    &format!(
                        "Paste the full job description, then a line with a single '{}':",
                        END_OF_TEXT
                    ),
                )
                .await?;
                let text = read_until_terminator(input).await?;
                self.flow.set_job_description(text);
            }
            "3" => {
                if let Some(request) = self.flow.begin_submit() {
                    write_line(output, self.flow.submit_label()).await?;
                    self.flow.complete_submit(request).await;
                }
                let message = self
                    .flow
                    .rendered_report()
                    .or_else(|| self.flow.error().map(str::to_string));
                if let Some(message) = message {
                    write_line(output, &message).await?;
                }
            }
            "4" => {
                self.identity.sign_out();
                self.flow.reset();
                self.switcher.switch_to_login();
            }
            "q" => return Ok(Step::Quit),
            other => write_line(output, &format!("Unknown choice: {}", other)).await?,
        }

        Ok(Step::Continue)
    }

    async fn write_auth_error<W>(&self, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if let Some(error) = &self.auth_error {
            write_line(output, error).await?;
        }
        Ok(())
    }
}

async fn write_line<W>(output: &mut W, line: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output
        .write_all(format!("{}\n", line).as_bytes())
        .await
        .context("Failed to write to terminal")?;
    output.flush().await.context("Failed to flush terminal")
}

/// Next line with only its terminator removed; `None` at end of input.
async fn read_raw_line<R>(input: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .await
        .context("Failed to read from terminal")?;

    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Next line, trimmed; `None` at end of input.
async fn read_line<R>(input: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    Ok(read_raw_line(input)
        .await?
        .map(|line| line.trim().to_string()))
}

async fn write_prompt<W>(output: &mut W, label: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output
        .write_all(label.as_bytes())
        .await
        .context("Failed to write to terminal")?;
    output.flush().await.context("Failed to flush terminal")
}

async fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_prompt(output, label).await?;
    read_line(input).await
}

/// Email (trimmed) and password (kept as typed).
async fn read_credentials<R, W>(input: &mut R, output: &mut W) -> Result<Option<(String, String)>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(email) = prompt(input, output, "Email Address: ").await? else {
        return Ok(None);
    };
    write_prompt(output, "Password: ").await?;
    let Some(password) = read_raw_line(input).await? else {
        return Ok(None);
    };
    Ok(Some((email, password)))
}

async fn read_until_terminator<R>(input: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    while let Some(line) = read_raw_line(input).await? {
        if line == END_OF_TEXT {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
