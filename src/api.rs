//! HTTP client for the classification backend.
//!
//! Each operation is a single request/response pair with no retry; failure
//! is immediate and surfaced to the caller. A 401 anywhere maps to
//! `TriageError::NotAuthenticated` so callers can prompt for login instead
//! of showing a generic error.

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::config::ApiConfig;
use crate::error::{Result, TriageError};
use crate::form::SelectedFile;
use crate::models::{
    Ack, AiProbe, AuthUrl, BackendUser, ClassificationResult, GmailPreview, GmailStatus,
    OutgoingReply,
};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Build a client against `config.base_url`. The configured timeout is
    /// the only bound on outbound calls; individual operations add none.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` when a session exists. The
    /// token is fetched fresh on every call.
    async fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        match self.tokens.bearer_token().await? {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Ok(request),
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::from_status(status.as_u16(), body));
        }
        Ok(response.json().await?)
    }

    /// GET /health. True iff the backend answered 2xx; network failures and
    /// non-2xx both map to false (logged, never thrown).
    pub async fn check_health(&self) -> bool {
        debug!("Checking backend health at {}", self.url("/health"));
        match self.http.get(self.url("/health")).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Health check failed with status {}", response.status());
                false
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }

    /// POST /classify-text with the trimmed text as JSON
    pub async fn classify_text(&self, text: &str) -> Result<ClassificationResult> {
        let response = self
            .authorized(self.http.post(self.url("/classify-text")))
            .await?
            .json(&json!({ "text": text.trim() }))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// POST /classify-file as multipart with the file under the `file`
    /// field. Fails with `NoFileSelected` before any request when the form
    /// slot is empty.
    pub async fn classify_file(&self, file: Option<&SelectedFile>) -> Result<ClassificationResult> {
        let file = file.ok_or(TriageError::NoFileSelected)?;

        let part = multipart::Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part("file", part);

        debug!(name = %file.name, size = file.size, "Uploading file for classification");
        let response = self
            .authorized(self.http.post(self.url("/classify-file")))
            .await?
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// GET /gmail/preview?limit=N. An `auth_url` payload passes through as
    /// `GmailPreview::ReauthRequired`; callers branch on the variant.
    pub async fn gmail_preview(&self, limit: usize) -> Result<GmailPreview> {
        let response = self
            .authorized(
                self.http
                    .get(self.url("/gmail/preview"))
                    .query(&[("limit", limit)]),
            )
            .await?
            .send()
            .await?;
        Self::parse(response).await
    }

    /// POST /gmail/send
    pub async fn gmail_send(&self, reply: &OutgoingReply) -> Result<Ack> {
        let response = self
            .authorized(self.http.post(self.url("/gmail/send")))
            .await?
            .json(reply)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// POST /gmail/mark-read
    pub async fn gmail_mark_read(&self, message_id: &str) -> Result<Ack> {
        let response = self
            .authorized(self.http.post(self.url("/gmail/mark-read")))
            .await?
            .json(&json!({ "messageId": message_id }))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// GET /gmail/auth-url
    pub async fn gmail_auth_url(&self) -> Result<AuthUrl> {
        let response = self
            .authorized(self.http.get(self.url("/gmail/auth-url")))
            .await?
            .send()
            .await?;
        Self::parse(response).await
    }

    /// GET /gmail/status
    pub async fn gmail_status(&self) -> Result<GmailStatus> {
        let response = self
            .authorized(self.http.get(self.url("/gmail/status")))
            .await?
            .send()
            .await?;
        Self::parse(response).await
    }

    /// POST /gmail/disconnect
    pub async fn gmail_disconnect(&self) -> Result<Ack> {
        let response = self
            .authorized(self.http.post(self.url("/gmail/disconnect")))
            .await?
            .send()
            .await?;
        Self::parse(response).await
    }

    /// POST /auth/verify-token - asks the backend to verify the current
    /// bearer token and return (or create) its user record
    pub async fn verify_token(&self) -> Result<BackendUser> {
        let response = self
            .authorized(self.http.post(self.url("/auth/verify-token")))
            .await?
            .send()
            .await?;
        Self::parse(response).await
    }

    /// GET /auth/me
    pub async fn me(&self) -> Result<BackendUser> {
        let response = self
            .authorized(self.http.get(self.url("/auth/me")))
            .await?
            .send()
            .await?;
        Self::parse(response).await
    }

    /// POST /test-ai probe, optionally with a custom question
    pub async fn test_ai(&self, question: Option<&str>) -> Result<AiProbe> {
        let body = match question {
            Some(q) => json!({ "question": q }),
            None => json!({}),
        };
        let response = self
            .http
            .post(self.url("/test-ai"))
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }
}
