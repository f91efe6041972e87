//! Pure form-validation predicates.
//!
//! These carry no side effects; callers translate a failed check into a
//! user-facing warning themselves.

use crate::config::UploadConfig;

/// Why a submission is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// Neither text nor a file was provided
    Empty,
    /// Both text and a file were provided; they are never merged
    BothProvided,
}

impl SubmitBlocked {
    /// Warning text shown to the user for this block reason
    pub fn warning(&self) -> &'static str {
        match self {
            SubmitBlocked::Empty => "Please enter some text or select a file",
            SubmitBlocked::BothProvided => "You can use text or a file, but not both at once",
        }
    }
}

/// A file is accepted if its declared MIME type is in the accepted set OR
/// its name's lowercase extension is in the accepted extension set. The
/// union is intentional: browsers and tools report inconsistent MIME types,
/// so either signal is enough.
pub fn is_accepted_file_type(name: &str, mime_type: &str, upload: &UploadConfig) -> bool {
    let mime_ok = upload
        .accepted_mime_types
        .iter()
        .any(|accepted| accepted == mime_type);

    let name_lower = name.to_lowercase();
    let ext_ok = upload
        .accepted_extensions
        .iter()
        .any(|ext| name_lower.ends_with(ext.as_str()));

    mime_ok || ext_ok
}

/// A form is submittable iff exactly one of (trimmed non-empty text, a
/// selected file) holds.
pub fn check_submittable(has_file: bool, text: &str) -> Result<(), SubmitBlocked> {
    let has_text = !text.trim().is_empty();

    match (has_text, has_file) {
        (true, true) => Err(SubmitBlocked::BothProvided),
        (false, false) => Err(SubmitBlocked::Empty),
        _ => Ok(()),
    }
}
