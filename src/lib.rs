//! Mail Triage Client
//!
//! A terminal client for an email classification service: submit email text
//! or a `.txt`/`.pdf` file, get back a category, confidence score, and
//! suggested reply, and review unread Gmail messages through the same
//! backend.
//!
//! # Overview
//!
//! - **Form state**: single-slot file selection with text/file mutual
//!   exclusivity and pure submission validation
//! - **API client**: typed operations over the backend HTTP API with a
//!   uniform 401-to-login error mapping and no retries
//! - **Auth**: injected bearer-token capability, read fresh per call
//! - **Inbox review**: per-message send/skip actions over the Gmail preview
//! - **Rendering**: loading status line, severity toasts, result panels
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use mail_triage::{api::ApiClient, auth::StaticTokenProvider, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref()).await?;
//!     let api = ApiClient::new(&config.api, Arc::new(StaticTokenProvider::anonymous()))?;
//!
//!     let result = api.classify_text("Hello, I need help with my invoice").await?;
//!     println!("{} ({}%)", result.category, result.confidence_percent());
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`api`] - HTTP client for the classification backend
//! - [`app`] - Orchestrator wiring form, client, and renderer together
//! - [`auth`] - Bearer-token session handling
//! - [`cli`] - Command-line interface
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`form`] - Form state and the selected-file slot
//! - [`inbox`] - Inbox review session over the Gmail preview
//! - [`models`] - Wire data structures
//! - [`ui`] - Terminal presentation
//! - [`validation`] - Pure form-validation predicates

pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod inbox;
pub mod models;
pub mod ui;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::{Result, TriageError};

// Core data models
pub use models::{
    ClassificationMethod, ClassificationResult, GmailMessage, GmailPreview, OutgoingReply,
};

// Form state
pub use form::{format_file_size, FormState, SelectedFile, Submission};

// Config types
pub use config::{ApiConfig, Config, InboxConfig, UploadConfig};

// API client
pub use api::ApiClient;

// Auth capability
pub use auth::{FileTokenProvider, StaticTokenProvider, TokenProvider};

// Orchestration
pub use app::{App, ClassifyOutcome};
pub use inbox::{InboxEvent, InboxSession};

// CLI types (for binary usage)
pub use cli::{Cli, Commands};
