//! Application orchestrator: wires the form, API client, and renderer
//! together and runs the submission and inbox-review flows.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::api::ApiClient;
use crate::auth::TokenProvider;
use crate::config::Config;
use crate::error::Result;
use crate::form::{FormState, Submission};
use crate::inbox::InboxSession;
use crate::models::{ClassificationResult, GmailPreview, ResultExport};
use crate::ui::{self, Severity, StatusLine};

/// How a classify submission ended
#[derive(Debug)]
pub enum ClassifyOutcome {
    /// The backend answered and the result was rendered
    Rendered(ClassificationResult),
    /// Validation blocked the submission; no request was made
    Blocked,
    /// The request failed; the error was already toasted
    Failed,
}

pub struct App {
    config: Config,
    api: Arc<ApiClient>,
    form: FormState,
    status: StatusLine,
    /// Guards against overlapping submissions; the flow is strictly serial
    in_flight: bool,
}

impl App {
    pub fn new(config: Config, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config.api, tokens)?);
        Ok(Self {
            config,
            api,
            form: FormState::new(),
            status: StatusLine::new(),
            in_flight: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Clear the form, releasing any selected file
    pub fn reset(&mut self) {
        self.form.reset();
    }

    /// Fire-and-forget startup health probe; does not block interactivity
    pub fn spawn_health_probe(&self) {
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if api.check_health().await {
                info!("Backend healthy at {}", api.base_url());
            } else {
                ui::toast("The classification API is not responding", Severity::Error);
            }
        });
    }

    /// Blocking variant used by the `health` command
    pub async fn check_health(&self) -> bool {
        let healthy = self.api.check_health().await;
        if healthy {
            ui::toast("API connected successfully!", Severity::Success);
        } else {
            ui::toast("The classification API is not responding", Severity::Error);
        }
        healthy
    }

    /// Run the submission flow: validate, call the matching classify
    /// endpoint, render the result. Validation failures and request errors
    /// are toasted, never propagated; loading state is cleared on every
    /// path.
    pub async fn classify(&mut self) -> ClassifyOutcome {
        let submission = match self.form.submission() {
            Ok(submission) => submission,
            Err(blocked) => {
                ui::toast(blocked.warning(), Severity::Warning);
                return ClassifyOutcome::Blocked;
            }
        };

        if self.in_flight {
            ui::toast(
                "A classification is already in progress",
                Severity::Warning,
            );
            return ClassifyOutcome::Blocked;
        }
        self.in_flight = true;
        self.status.show_loading("Classifying email...");

        let outcome = match submission {
            Submission::File => self.api.classify_file(self.form.file()).await,
            Submission::Text(text) => self.api.classify_text(&text).await,
        };

        // Cleared before inspecting the outcome so both paths see it done
        self.status.hide_loading();
        self.in_flight = false;

        match outcome {
            Ok(result) => {
                println!("{}", ui::classification_panel(&result));
                ClassifyOutcome::Rendered(result)
            }
            Err(e) => {
                ui::toast(&format!("Failed to classify email: {}", e), Severity::Error);
                ClassifyOutcome::Failed
            }
        }
    }

    /// Load the Gmail preview and review each message interactively
    pub async fn inbox_review(&mut self, limit: usize) -> Result<()> {
        self.status.show_loading("Connecting to Gmail...");
        let preview = self.api.gmail_preview(limit).await;
        self.status.hide_loading();

        let preview = match preview {
            Ok(preview) => preview,
            Err(e) => {
                ui::toast(&format!("Failed to load Gmail: {}", e), Severity::Error);
                return Ok(());
            }
        };

        let items = match preview {
            GmailPreview::ReauthRequired { auth_url } => {
                println!("{}", ui::reauth_prompt(&auth_url));
                return Ok(());
            }
            GmailPreview::Inbox { items } => items,
        };

        if items.is_empty() {
            println!("{}", ui::EMPTY_INBOX);
            return Ok(());
        }
        ui::toast("Emails loaded from Gmail!", Severity::Success);

        let total = items.len();
        let mut session = InboxSession::new(items);

        while let Some(current) = session.current().cloned() {
            let position = total - session.len();
            println!("\n{}", ui::gmail_card(&current, position, total));

            let action = inquire::Select::new(
                "Action:",
                vec![
                    ReviewAction::Send,
                    ReviewAction::EditAndSend,
                    ReviewAction::Skip,
                    ReviewAction::Quit,
                ],
            )
            .prompt();

            let action = match action {
                Ok(action) => action,
                // Esc / interrupted prompt ends the review
                Err(_) => break,
            };

            let events = match action {
                ReviewAction::Send => {
                    let body = current.suggested_response.clone();
                    self.status.show_loading("Sending reply...");
                    let events = session.send_reply(0, body, &self.api).await;
                    self.status.hide_loading();
                    events
                }
                ReviewAction::EditAndSend => {
                    let initial = current.suggested_response.clone();
                    let edited = inquire::Text::new("Reply:")
                        .with_initial_value(&initial)
                        .prompt();
                    match edited {
                        Ok(body) => {
                            self.status.show_loading("Sending reply...");
                            let events = session.send_reply(0, body, &self.api).await;
                            self.status.hide_loading();
                            events
                        }
                        Err(_) => continue,
                    }
                }
                ReviewAction::Skip => {
                    self.status.show_loading("Marking as read...");
                    let events = session.skip(0, &self.api).await;
                    self.status.hide_loading();
                    events
                }
                ReviewAction::Quit => break,
            };

            for event in events {
                ui::toast(&event.message, event.severity);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewAction {
    Send,
    EditAndSend,
    Skip,
    Quit,
}

impl std::fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReviewAction::Send => "Send suggested reply",
            ReviewAction::EditAndSend => "Edit reply, then send",
            ReviewAction::Skip => "Skip (mark as read)",
            ReviewAction::Quit => "Quit review",
        };
        write!(f, "{}", label)
    }
}

/// Write a classification result to disk as JSON with an export timestamp
pub async fn export_result(result: &ClassificationResult, path: &Path) -> Result<()> {
    let export = ResultExport {
        result: result.clone(),
        exported_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&export)?;
    tokio::fs::write(path, json).await?;
    info!("Exported classification result to {:?}", path);
    Ok(())
}
