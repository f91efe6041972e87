use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend strategy that produced a classification. Unknown methods are
/// carried through as-is so new backend strategies render without a client
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassificationMethod {
    /// Transformer model path
    Model,
    /// LLM-backed classification
    Gemini,
    /// Keyword matching when the model is unavailable
    KeywordFallback,
    /// Input was empty, classified without running anything
    EmptyText,
    /// Classification itself failed, default category returned
    ErrorFallback,
    /// Forward-compatible passthrough of an unrecognized method string
    Other(String),
}

impl From<String> for ClassificationMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "distilbert" => ClassificationMethod::Model,
            "gemini" => ClassificationMethod::Gemini,
            "keywords_fallback" => ClassificationMethod::KeywordFallback,
            "empty_text" => ClassificationMethod::EmptyText,
            "error_fallback" => ClassificationMethod::ErrorFallback,
            _ => ClassificationMethod::Other(value),
        }
    }
}

impl From<ClassificationMethod> for String {
    fn from(method: ClassificationMethod) -> Self {
        match method {
            ClassificationMethod::Model => "distilbert".to_string(),
            ClassificationMethod::Gemini => "gemini".to_string(),
            ClassificationMethod::KeywordFallback => "keywords_fallback".to_string(),
            ClassificationMethod::EmptyText => "empty_text".to_string(),
            ClassificationMethod::ErrorFallback => "error_fallback".to_string(),
            ClassificationMethod::Other(raw) => raw,
        }
    }
}

impl ClassificationMethod {
    /// Fixed display-label table; unrecognized methods show their raw value
    pub fn display_name(&self) -> &str {
        match self {
            ClassificationMethod::Model => "AI model",
            ClassificationMethod::Gemini => "Gemini AI",
            ClassificationMethod::KeywordFallback => "Keyword fallback",
            ClassificationMethod::EmptyText => "Empty text",
            ClassificationMethod::ErrorFallback => "Error fallback",
            ClassificationMethod::Other(raw) => raw,
        }
    }
}

/// Result of classifying one email, as returned by the backend.
/// Read-only on the client; superseded by the next result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub response: String,
    pub confidence: Option<f32>,
    pub method: ClassificationMethod,
    #[serde(default)]
    pub model_info: Option<String>,
    /// Present only for file classifications
    #[serde(default)]
    pub filename: Option<String>,
}

impl ClassificationResult {
    /// Confidence as an integer percentage, defaulting to 80% when the
    /// backend omitted the score.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.unwrap_or(0.8) * 100.0).round() as u32
    }
}

/// One unread Gmail message from the preview endpoint, with the backend's
/// suggested reply attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailMessage {
    pub id: String,
    #[serde(rename = "threadId", default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub suggested_response: String,
    #[serde(default)]
    pub category: String,
}

impl GmailMessage {
    /// Extract a bare reply address from a `Name <addr>` From header
    pub fn reply_address(&self) -> String {
        match (self.from.find('<'), self.from.find('>')) {
            (Some(start), Some(end)) if start < end => self.from[start + 1..end].to_string(),
            _ => self.from.trim().to_string(),
        }
    }
}

/// Response of the Gmail preview endpoint. The backend signals that
/// re-authorization is required by returning an `auth_url` payload instead
/// of a message list; callers branch on which variant they got.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GmailPreview {
    ReauthRequired {
        auth_url: String,
    },
    Inbox {
        #[serde(default)]
        items: Vec<GmailMessage>,
    },
}

/// Reply submitted through the backend's Gmail send endpoint
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingReply {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(rename = "threadId", skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Generic acknowledgement body; the backend is loose about its shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailStatus {
    #[serde(default)]
    pub connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUrl {
    pub auth_url: String,
}

/// Response of the `test-ai` probe endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AiProbe {
    pub status: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Backend user record from token verification / profile lookup.
/// Lenient on purpose; only the fields the client displays are captured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendUser {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Classification result written to disk by `classify --output`
#[derive(Debug, Clone, Serialize)]
pub struct ResultExport {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub exported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_known_strings_roundtrip() {
        let method: ClassificationMethod = "distilbert".to_string().into();
        assert_eq!(method, ClassificationMethod::Model);
        assert_eq!(String::from(method), "distilbert");

        let method: ClassificationMethod = "keywords_fallback".to_string().into();
        assert_eq!(method.display_name(), "Keyword fallback");
    }

    #[test]
    fn test_method_unknown_passes_through_raw() {
        let method: ClassificationMethod = "quantum_v2".to_string().into();
        assert_eq!(
            method,
            ClassificationMethod::Other("quantum_v2".to_string())
        );
        assert_eq!(method.display_name(), "quantum_v2");
        assert_eq!(String::from(method), "quantum_v2");
    }

    #[test]
    fn test_classification_result_deserializes() {
        let json = r#"{
            "category": "Support",
            "response": "Thanks",
            "confidence": 0.92,
            "method": "distilbert",
            "model_info": "DistilBERT fine-tuned"
        }"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.category, "Support");
        assert_eq!(result.method, ClassificationMethod::Model);
        assert_eq!(result.confidence_percent(), 92);
        assert!(result.filename.is_none());
    }

    #[test]
    fn test_confidence_defaults_to_eighty_percent() {
        let json = r#"{"category": "Other", "response": "ok", "confidence": null, "method": "demo"}"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.confidence_percent(), 80);
    }

    #[test]
    fn test_preview_branches_on_auth_url() {
        let reauth: GmailPreview =
            serde_json::from_str(r#"{"auth_url": "https://accounts.google.com/o/oauth2"}"#)
                .unwrap();
        assert!(matches!(reauth, GmailPreview::ReauthRequired { .. }));

        let inbox: GmailPreview = serde_json::from_str(
            r#"{"items": [{"id": "m1", "from": "a@b.c", "subject": "hi", "snippet": "",
                "suggested_response": "", "category": "Support"}], "count": 1}"#,
        )
        .unwrap();
        match inbox {
            GmailPreview::Inbox { items } => assert_eq!(items.len(), 1),
            other => panic!("Expected Inbox, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_empty_object_is_empty_inbox() {
        let preview: GmailPreview = serde_json::from_str("{}").unwrap();
        match preview {
            GmailPreview::Inbox { items } => assert!(items.is_empty()),
            other => panic!("Expected Inbox, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_address_extraction() {
        let mut msg = GmailMessage {
            id: "m1".to_string(),
            thread_id: None,
            from: "Alice Example <alice@example.com>".to_string(),
            subject: String::new(),
            snippet: String::new(),
            suggested_response: String::new(),
            category: String::new(),
        };
        assert_eq!(msg.reply_address(), "alice@example.com");

        msg.from = "bob@example.com".to_string();
        assert_eq!(msg.reply_address(), "bob@example.com");
    }

    #[test]
    fn test_outgoing_reply_wire_field_names() {
        let reply = OutgoingReply {
            to: "a@b.c".to_string(),
            subject: "Re: hi".to_string(),
            body: "Thanks".to_string(),
            thread_id: Some("t1".to_string()),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["threadId"], "t1");

        let reply = OutgoingReply {
            thread_id: None,
            ..reply
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("threadId").is_none());
    }
}
