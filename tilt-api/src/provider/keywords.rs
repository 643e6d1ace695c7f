//! Keyword extraction backed by the keyword server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tilt_engine::{KeywordExtractor, MIN_QUERY_TEXT_LEN};

/// HTTP client for the keyword-extraction server.
pub struct KeywordService {
    client: reqwest::Client,
    base_url: String,
}

impl KeywordService {
    /// Create an extractor talking to the given base URL.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: super::build_client(timeout_secs, None),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl KeywordExtractor for KeywordService {
    async fn extract(&self, text: &str, top_n: usize) -> anyhow::Result<Vec<String>> {
        // Too little signal for the model to work with
        if text.trim().chars().count() < MIN_QUERY_TEXT_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/keywords", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&KeywordsRequest { text, top_n })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("keyword server returned {}: {}", status, body);
        }

        let parsed: KeywordsResponse = response.json().await?;
        Ok(parsed.keywords.into_iter().take(top_n).collect())
    }
}

#[derive(Debug, Serialize)]
struct KeywordsRequest<'a> {
    text: &'a str,
    top_n: usize,
}

#[derive(Debug, Deserialize)]
struct KeywordsResponse {
    keywords: Vec<String>,
}
