//! Form state: the email text and the single selected-file slot.

use std::path::Path;

use crate::config::UploadConfig;
use crate::error::{Result, TriageError};
use crate::validation::{self, SubmitBlocked};

/// A file selected for classification. Owned exclusively by the form slot
/// while selected; replaced (not mutated) on a new selection and dropped on
/// removal.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    /// Read a file from disk, inferring the MIME type from its extension
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_for_name(&name).to_string();

        Ok(Self {
            size: data.len() as u64,
            name,
            mime_type,
            data,
        })
    }

    /// "name (1.5 KB)" display form
    pub fn summary(&self) -> String {
        format!("{} ({})", self.name, format_file_size(self.size))
    }
}

fn mime_for_name(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".txt") {
        "text/plain"
    } else if lower.ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// Format a byte count with binary (1024-based) units, two decimal places,
/// trailing zeros trimmed: 0 -> "0 Bytes", 1536 -> "1.5 KB", 1048576 -> "1 MB".
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    let mut formatted = format!("{:.2}", value);
    if formatted.contains('.') {
        formatted = formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }

    format!("{} {}", formatted, UNITS[exponent])
}

/// What the form would submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text(String),
    File,
}

/// Transient, single-session form state. Invariant: at most one of
/// {non-empty text, a selected file} is active; attaching a file clears any
/// pending text.
#[derive(Debug, Default)]
pub struct FormState {
    text: String,
    file: Option<SelectedFile>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Place a file in the slot. Rejects unaccepted types, leaving the slot
    /// unchanged; on success, replaces any previous selection and clears
    /// pending text (mutual exclusivity).
    pub fn attach_file(&mut self, file: SelectedFile, upload: &UploadConfig) -> Result<()> {
        if !validation::is_accepted_file_type(&file.name, &file.mime_type, upload) {
            return Err(TriageError::UnsupportedFileType(file.name));
        }

        tracing::debug!(name = %file.name, size = file.size, "File attached, clearing text input");
        self.text.clear();
        self.file = Some(file);
        Ok(())
    }

    /// Empty the slot unconditionally, releasing the file's bytes
    pub fn remove_file(&mut self) {
        self.file = None;
    }

    /// Clear both inputs
    pub fn reset(&mut self) {
        self.text.clear();
        self.file = None;
    }

    /// Pure submittability check; the caller turns a block into a warning
    pub fn submission(&self) -> std::result::Result<Submission, SubmitBlocked> {
        validation::check_submittable(self.file.is_some(), &self.text)?;

        Ok(match self.file {
            Some(_) => Submission::File,
            None => Submission::Text(self.text.trim().to_string()),
        })
    }
}
