//! Generative model seam used by the AI fallback classifier

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, error};

/// Why a model call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// 401/403
    Auth,
    /// 429
    RateLimit,
    /// 408 or the client gave up waiting
    Timeout,
    /// Connection refused, DNS failure, reset
    Network,
    /// 5xx
    ServerError,
    /// 2xx with a body we can't read
    Malformed,
    Unknown,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("model provider error ({kind:?}): {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ProviderErrorKind::Auth,
            408 => ProviderErrorKind::Timeout,
            429 => ProviderErrorKind::RateLimit,
            500..=599 => ProviderErrorKind::ServerError,
            _ => ProviderErrorKind::Unknown,
        };
        Self {
            kind,
            status: Some(status),
            message: truncate_body(body),
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else {
            ProviderErrorKind::Network
        };
        Self::new(kind, err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(300) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// A text-in, text-out model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Gemini `generateContent` over HTTP
pub struct GeminiModel {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiModel {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0.1,
                "responseMimeType": "application/json"
            }
        })
    }
}

/// Concatenated text of the first candidate's parts
fn candidate_text(data: &Value) -> Option<String> {
    let parts = data["candidates"].get(0)?["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Calling Gemini at {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                ProviderError::network(&e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProviderError::network(&e))?;
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        let malformed = |message: String| ProviderError::new(ProviderErrorKind::Malformed, message);
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| malformed(format!("invalid JSON envelope: {}", e)))?;
        candidate_text(&data).ok_or_else(|| malformed("no candidate text returned".to_string()))
    }
}

/// Canned model for tests and offline runs
pub struct MockModel {
    reply: Result<String, ProviderError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockModel {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            reply: Err(ProviderError::new(kind, message)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ProviderError::from_status(401, "").kind, ProviderErrorKind::Auth);
        assert_eq!(ProviderError::from_status(429, "slow down").kind, ProviderErrorKind::RateLimit);
        assert_eq!(ProviderError::from_status(503, "").kind, ProviderErrorKind::ServerError);
        assert_eq!(ProviderError::from_status(418, "").kind, ProviderErrorKind::Unknown);
        assert_eq!(ProviderError::from_status(503, "").status, Some(503));
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let data = json!({
            "candidates": [{"content": {"parts": [{"text": "{\"intent\":"}, {"text": " \"x\"}"}]}}]
        });
        assert_eq!(candidate_text(&data).as_deref(), Some("{\"intent\": \"x\"}"));
        assert_eq!(candidate_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::from_status(500, "boom");
        assert_eq!(err.to_string(), "model provider error (ServerError): boom");
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let model = MockModel::failing(ProviderErrorKind::Network, "offline");
        assert!(model.generate("a").await.is_err());
        assert!(model.generate("b").await.is_err());
        assert_eq!(model.calls(), 2);
    }
}
