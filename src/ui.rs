//! Terminal presentation: the loading status line, toast notifications, and
//! result rendering. Render functions build strings; printing is kept to
//! thin wrappers so the output is testable.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::models::{ClassificationResult, GmailMessage};

/// Toast severity, mapped to a fixed symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✗",
            Severity::Warning => "⚠",
            Severity::Info => "•",
        }
    }
}

/// Render a toast line
pub fn toast_line(message: &str, severity: Severity) -> String {
    format!("{} {}", severity.symbol(), message)
}

/// Print a toast notification
pub fn toast(message: &str, severity: Severity) {
    println!("{}", toast_line(message, severity));
}

/// The single shared loading indicator. Not reentrant: a second
/// `show_loading` while one is active replaces the message, and
/// `hide_loading` always fully clears regardless of how many times the
/// message was replaced.
#[derive(Default)]
pub struct StatusLine {
    active: Option<ProgressBar>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_loading(&mut self, message: &str) {
        match &self.active {
            Some(pb) => pb.set_message(message.to_string()),
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner())
                        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
                );
                pb.set_message(message.to_string());
                pb.enable_steady_tick(Duration::from_millis(100));
                self.active = Some(pb);
            }
        }
    }

    pub fn hide_loading(&mut self) {
        if let Some(pb) = self.active.take() {
            pb.finish_and_clear();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        self.hide_loading();
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated.
/// The result never exceeds max_len; budgets too small for the ellipsis
/// get a bare prefix instead.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    }
}

/// Render a classification result panel
pub fn classification_panel(result: &ClassificationResult) -> String {
    let mut out = String::new();

    out.push_str("========================================\n");
    out.push_str("Classification Result\n");
    out.push_str("========================================\n");
    out.push_str(&format!("Category:   {}\n", result.category));
    out.push_str(&format!("Confidence: {}%\n", result.confidence_percent()));
    out.push_str(&format!("Method:     {}\n", result.method.display_name()));
    if let Some(info) = &result.model_info {
        out.push_str(&format!("Model:      {}\n", info));
    }
    if let Some(filename) = &result.filename {
        out.push_str(&format!("File:       {}\n", filename));
    }
    out.push_str("\nSuggested reply:\n");
    out.push_str(&result.response);
    out.push('\n');
    out.push_str("========================================");

    out
}

/// Render one inbox message card
pub fn gmail_card(message: &GmailMessage, index: usize, total: usize) -> String {
    let mut out = String::new();

    let from = if message.from.is_empty() {
        "(unknown)"
    } else {
        &message.from
    };
    let subject = if message.subject.is_empty() {
        "(no subject)"
    } else {
        &message.subject
    };

    out.push_str(&format!(
        "[{}/{}] From: {} | Subject: {}",
        index + 1,
        total,
        from,
        truncate(subject, 60)
    ));
    if !message.category.is_empty() {
        out.push_str(&format!(" [{}]", message.category));
    }
    out.push('\n');

    if !message.snippet.is_empty() {
        out.push_str(&format!("  {}\n", truncate(&message.snippet, 100)));
    }
    out.push_str("  Suggested reply:\n");
    for line in message.suggested_response.lines() {
        out.push_str(&format!("    {}\n", line));
    }

    out
}

/// Render the re-authorization prompt shown instead of a message list
pub fn reauth_prompt(auth_url: &str) -> String {
    format!(
        "Gmail authorization required. Open this link to grant access:\n  {}\nThen run `mail-triage inbox` again.",
        auth_url
    )
}

/// Shown when the preview returned no unread messages
pub const EMPTY_INBOX: &str = "No unread emails found.";
