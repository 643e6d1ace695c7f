//! Capability traits - the seams where external services plug into the
//! engine.
//!
//! The classifier model, keyword extractor, content search provider, and
//! activity store are all consumed as black boxes behind these traits. The
//! HTTP-backed implementations live in `tilt-api`; tests substitute mocks.

use crate::leaning::{Classification, Leaning, SearchHit};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Leaning classifier: text → left/neutral/right with confidence.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Provider name (e.g. "model-server").
    fn name(&self) -> &str;

    /// Classify a single text.
    ///
    /// Implementations must classify blank/whitespace text as neutral with
    /// confidence 1.0 without invoking the underlying model.
    async fn classify(&self, text: &str) -> anyhow::Result<Classification>;

    /// Classify a batch of texts, preserving input order.
    async fn classify_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Classification>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }

    /// Health check - true when the model backend is reachable.
    async fn health(&self) -> bool;
}

/// Keyword extractor: text → ordered list of representative terms.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Extract up to `top_n` keywords in relevance order.
    ///
    /// Text shorter than the query minimum yields an empty list.
    async fn extract(&self, text: &str, top_n: usize) -> anyhow::Result<Vec<String>>;
}

/// Ranked content search: query → candidate posts in provider rank order.
///
/// The engine performs no re-ranking; provider order is trusted.
#[async_trait]
pub trait ContentSearch: Send + Sync {
    /// Provider name (e.g. "reddit").
    fn name(&self) -> &str;

    /// Search for up to `limit` items matching the query.
    async fn search(&self, query: &str, limit: u32) -> anyhow::Result<Vec<SearchHit>>;

    /// Health check - true when the provider is reachable.
    async fn health(&self) -> bool;
}

/// A new row for the activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub bias_label: Leaning,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    /// URLs already attached at insert time (the related-content path).
    #[serde(default)]
    pub recommended_urls: Vec<String>,
    #[serde(default)]
    pub recommendation_triggered: bool,
}

impl NewActivity {
    /// A plain observation with nothing attached yet.
    pub fn observation(
        user_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        bias_label: Leaning,
        subreddit: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            body: body.into(),
            bias_label,
            subreddit,
            recommended_urls: Vec::new(),
            recommendation_triggered: false,
        }
    }
}

/// Durable log of observed posts and triggered recommendations.
#[async_trait]
pub trait ActivityRecorder: Send + Sync {
    /// Insert an activity row, returning its id for later correlation.
    async fn record(&self, activity: &NewActivity) -> anyhow::Result<i64>;

    /// Attach a triggered recommendation to an existing row, marking the
    /// threshold as reached.
    async fn attach_recommendations(&self, id: i64, urls: &[String]) -> anyhow::Result<()>;
}
