//! Bearer-token session handling.
//!
//! The identity collaborator is reduced to one capability: produce a bearer
//! token on demand. The API client takes it as an injected trait object
//! rather than reaching for ambient global state.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Result, TriageError};

/// Default on-disk location for the session token
pub const DEFAULT_TOKEN_PATH: &str = ".mail-triage/token";

/// Supplies the current session's bearer token, if any.
///
/// `bearer_token` is consulted fresh on every API call; implementations must
/// not assume the answer is stable across calls (the token may be refreshed
/// or revoked between requests).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// The current bearer token, or `None` for an anonymous session
    async fn bearer_token(&self) -> Result<Option<String>>;
}

/// Reads the token from a file on every call (no caching). A missing or
/// empty file means the session is anonymous.
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a token for later sessions
    pub async fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TriageError::AuthError(format!("Failed to create token directory: {}", e))
            })?;
        }
        tokio::fs::write(&self.path, token.trim())
            .await
            .map_err(|e| TriageError::AuthError(format!("Failed to write token file: {}", e)))?;
        tracing::info!("Stored session token at {:?}", self.path);
        Ok(())
    }

    /// Remove the stored token, returning the session to anonymous
    pub async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            tokio::fs::remove_file(&self.path)
                .await
                .map_err(|e| TriageError::AuthError(format!("Failed to remove token: {}", e)))?;
            tracing::info!("Removed session token at {:?}", self.path);
        }
        Ok(())
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn bearer_token(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TriageError::AuthError(format!(
                "Failed to read token file: {}",
                e
            ))),
        }
    }
}

/// Fixed token (or fixed anonymity), mainly for tests
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTokenProvider::new(dir.path().join("token"));
        assert_eq!(provider.bearer_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_then_read_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTokenProvider::new(dir.path().join("nested/token"));

        provider.store("  tok-123  \n").await.unwrap();
        assert_eq!(
            provider.bearer_token().await.unwrap(),
            Some("tok-123".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        tokio::fs::write(&path, "  \n").await.unwrap();

        let provider = FileTokenProvider::new(path);
        assert_eq!(provider.bearer_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_returns_to_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTokenProvider::new(dir.path().join("token"));

        provider.store("tok").await.unwrap();
        provider.clear().await.unwrap();
        assert_eq!(provider.bearer_token().await.unwrap(), None);

        // Clearing an already-anonymous session is fine
        provider.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_token_is_read_fresh_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTokenProvider::new(dir.path().join("token"));

        provider.store("first").await.unwrap();
        assert_eq!(
            provider.bearer_token().await.unwrap(),
            Some("first".to_string())
        );

        provider.store("second").await.unwrap();
        assert_eq!(
            provider.bearer_token().await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("tok");
        assert_eq!(
            provider.bearer_token().await.unwrap(),
            Some("tok".to_string())
        );
        assert_eq!(
            StaticTokenProvider::anonymous().bearer_token().await.unwrap(),
            None
        );
    }
}
