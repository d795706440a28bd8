//! Translation providers
//!
//! The adapter boundary of the engine: anything implementing
//! [`Translator`] can back a reconstruction job without touching the
//! extraction or reconstruction logic.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::session::SessionCache;
use crate::document::TranslationError;

/// Text-to-text translation capability.
///
/// Callers are expected to short-circuit blank input, but implementations
/// must tolerate it by returning blank output rather than failing.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name, for logging
    fn name(&self) -> &str;

    /// Translate one run of text into `target_lang`.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;
}

/// HTTP JSON translation backend.
///
/// Posts one request per span to `{base_url}/translate` and reads a
/// `{"translation": "..."}` body. Sessions (resolved model ids) are
/// cached per language for the life of the provider.
pub struct HttpTranslator {
    base_url: String,
    client: reqwest::Client,
    sessions: SessionCache,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translation: String,
}

impl HttpTranslator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            sessions: SessionCache::new(),
        }
    }

    /// Sessions initialized so far (diagnostics).
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let session = self.sessions.get_or_init(target_lang);
        debug!(model = %session.model, "requesting translation");

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&json!({
                "model": session.model,
                "text": text,
                "target": session.lang,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TranslationError::UnsupportedLanguage(
                target_lang.to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Backend(format!(
                "status {status}: {body}"
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

        Ok(body.translation)
    }
}

/// Returns its input unchanged. Useful for layout-only dry runs and for
/// round-trip testing.
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    fn name(&self) -> &str {
        "identity"
    }

    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, TranslationError> {
        Ok(text.to_string())
    }
}
