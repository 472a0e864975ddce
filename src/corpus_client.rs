/// HTTP client for the corpus statistics service
use crate::types::CorpusStats;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Source of per-user corpus statistics
#[async_trait]
pub trait CorpusStatsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn user_stats(&self, user_id: &str, window_days: u32) -> Result<CorpusStats>;
}

#[derive(Debug, Clone)]
pub struct HttpCorpusClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCorpusClient {
    /// Create a new corpus client with a bounded request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build corpus HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Health check
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl CorpusStatsProvider for HttpCorpusClient {
    fn name(&self) -> &'static str {
        "http_corpus"
    }

    async fn user_stats(&self, user_id: &str, window_days: u32) -> Result<CorpusStats> {
        let url = format!(
            "{}/api/corpus/stats/{}?days={}",
            self.base_url,
            urlencoding::encode(user_id),
            window_days
        );

        debug!("Fetching corpus stats from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to call corpus service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Corpus API error {}: {}", status, body);
        }

        let stats: CorpusStats = response
            .json()
            .await
            .context("Failed to parse corpus stats response")?;
        debug!(
            "Retrieved corpus stats for user {}: {} emails, {} actions",
            user_id,
            stats.overall.total_emails,
            stats.top_actions.len()
        );

        Ok(stats)
    }
}

/// In-memory provider keyed by user id. Unknown users get empty stats.
#[derive(Default)]
pub struct StaticCorpusProvider {
    stats: HashMap<String, CorpusStats>,
    failing: bool,
    delay: Option<Duration>,
    calls: std::sync::atomic::AtomicUsize,
}

impl StaticCorpusProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>, stats: CorpusStats) -> Self {
        self.stats.insert(user_id.into(), stats);
        self
    }

    /// Every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl CorpusStatsProvider for StaticCorpusProvider {
    fn name(&self) -> &'static str {
        "static_corpus"
    }

    async fn user_stats(&self, user_id: &str, _window_days: u32) -> Result<CorpusStats> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            anyhow::bail!("corpus service unavailable");
        }
        Ok(self.stats.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_service_payload() {
        let raw = r#"{
            "user_id": "u1",
            "overall": {"totalEmails": 412, "total_actions": 97, "dateRange": "30d"},
            "topActions": [
                {"action_id": "track_package", "frequency": 0.21, "times_executed": 40,
                 "times_suggested": 48, "execution_rate": 0.83,
                 "last_used": "2025-11-18T09:30:00Z"},
                {"action_id": "archive", "frequency": 0.1, "last_used": null}
            ],
            "topIntents": [
                {"intent": "e-commerce.shipping.notification", "count": 80, "frequency": 0.19}
            ]
        }"#;
        let stats: CorpusStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.overall.total_emails, 412);
        assert_eq!(stats.top_actions.len(), 2);
        let track = stats.stat_for("track_package").unwrap();
        assert_eq!(track.times_suggested, 48);
        assert!(track.last_used_at.is_some());
        assert!(stats.stat_for("archive").unwrap().last_used_at.is_none());
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticCorpusProvider::new().with_user(
            "u1",
            CorpusStats {
                overall: crate::types::CorpusOverview {
                    total_emails: 10,
                    total_actions: 2,
                },
                ..CorpusStats::default()
            },
        );
        assert_eq!(provider.user_stats("u1", 30).await.unwrap().overall.total_emails, 10);
        assert!(provider.user_stats("nobody", 30).await.unwrap().is_empty());
        assert!(StaticCorpusProvider::failing().user_stats("u1", 30).await.is_err());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    #[ignore] // Requires a running corpus service
    async fn test_http_corpus_client() {
        let client =
            HttpCorpusClient::new("http://localhost:8080", Duration::from_secs(5)).unwrap();
        if client.health_check().await.unwrap_or(false) {
            let stats = client.user_stats("test-user", 30).await.unwrap();
            println!("Corpus stats: {:?}", stats.overall);
        }
    }
}
