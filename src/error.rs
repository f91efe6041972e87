use thiserror::Error;

/// Type alias for Result with TriageError
pub type Result<T> = std::result::Result<T, TriageError>;

/// Error types for the classification client
#[derive(Error, Debug)]
pub enum TriageError {
    /// The request never completed (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// Backend returned a non-2xx status
    #[error("HTTP error! status: {status}{}", format_body(.body))]
    HttpError { status: u16, body: String },

    /// Backend returned 401 - the caller should prompt for login
    #[error("Not authenticated. Run `mail-triage auth` to sign in first")]
    NotAuthenticated,

    /// A file upload was requested with no file in the form slot
    #[error("No file selected")]
    NoFileSelected,

    /// Local validation rejected the file before any request was made
    #[error("Unsupported file type: {0}. Use .txt or .pdf files only")]
    UnsupportedFileType(String),

    /// Authentication/token handling failed locally
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

impl TriageError {
    /// True when the right user action is to sign in, not to retry
    pub fn requires_login(&self) -> bool {
        matches!(self, TriageError::NotAuthenticated)
    }

    /// Map a non-success HTTP status to an error, carrying the body text
    /// for diagnostics. 401 is distinguished because it changes caller
    /// behavior (prompt login instead of showing a generic error).
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => TriageError::NotAuthenticated,
            _ => TriageError::HttpError { status, body },
        }
    }
}

impl From<reqwest::Error> for TriageError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return TriageError::from_status(status.as_u16(), String::new());
        }
        if error.is_timeout() {
            TriageError::NetworkFailure(format!("Request timed out: {}", error))
        } else if error.is_connect() {
            TriageError::NetworkFailure(format!("Connection error: {}", error))
        } else {
            TriageError::NetworkFailure(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_distinguishes_401() {
        let err = TriageError::from_status(401, "unauthorized".to_string());
        assert!(err.requires_login());

        let err = TriageError::from_status(500, "boom".to_string());
        assert!(!err.requires_login());
        match err {
            TriageError::HttpError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("Expected HttpError, got {:?}", other),
        }
    }

    #[test]
    fn test_http_error_display_includes_body() {
        let err = TriageError::HttpError {
            status: 500,
            body: "internal failure".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("500"));
        assert!(display.contains("internal failure"));
    }

    #[test]
    fn test_http_error_display_without_body() {
        let err = TriageError::HttpError {
            status: 503,
            body: String::new(),
        };
        let display = format!("{}", err);
        assert!(display.contains("503"));
        assert!(!display.ends_with(" - "));
    }

    #[test]
    fn test_not_authenticated_display_mentions_auth_command() {
        let display = format!("{}", TriageError::NotAuthenticated);
        assert!(display.contains("mail-triage auth"));
    }

    #[test]
    fn test_unsupported_file_type_display() {
        let err = TriageError::UnsupportedFileType("notes.docx".to_string());
        let display = format!("{}", err);
        assert!(display.contains("notes.docx"));
        assert!(display.contains(".txt"));
    }
}
