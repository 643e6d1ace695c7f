//! Leaning classifier backed by the model server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tilt_engine::{Classification, Classifier};

/// HTTP client for the leaning-classifier model server.
pub struct ModelClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl ModelClassifier {
    /// Create a classifier talking to the given base URL.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: super::build_client(timeout_secs, None),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Classifier for ModelClassifier {
    fn name(&self) -> &str {
        "model-server"
    }

    async fn classify(&self, text: &str) -> anyhow::Result<Classification> {
        // Blank text never reaches the model
        if text.trim().is_empty() {
            return Ok(Classification::blank());
        }

        let url = format!("{}/classify", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("model server returned {}: {}", status, body);
        }

        let parsed: ClassifyResponse = response.json().await?;
        Ok(Classification {
            label: parsed.label.parse()?,
            confidence: parsed.confidence,
        })
    }

    async fn classify_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Classification>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/classify_batch", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ClassifyBatchRequest { texts })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("model server returned {}: {}", status, body);
        }

        let parsed: ClassifyBatchResponse = response.json().await?;
        if parsed.results.len() != texts.len() {
            anyhow::bail!(
                "model server returned {} results for {} texts",
                parsed.results.len(),
                texts.len()
            );
        }

        parsed
            .results
            .into_iter()
            .map(|r| {
                Ok(Classification {
                    label: r.label.parse()?,
                    confidence: r.confidence,
                })
            })
            .collect()
    }

    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Model server health check failed");
                false
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ClassifyBatchRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    label: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct ClassifyBatchResponse {
    results: Vec<ClassifyResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilt_engine::Leaning;

    #[tokio::test]
    async fn blank_text_short_circuits_without_a_server() {
        // Unroutable base URL: a network call would fail, a short-circuit won't
        let classifier = ModelClassifier::new("http://127.0.0.1:1", 1);
        let result = classifier.classify("   ").await.unwrap();
        assert_eq!(result.label, Leaning::Neutral);
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn empty_batch_short_circuits() {
        let classifier = ModelClassifier::new("http://127.0.0.1:1", 1);
        let results = classifier.classify_batch(&[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn response_parsing() {
        let parsed: ClassifyResponse =
            serde_json::from_str(r#"{"label": "left", "confidence": 0.92}"#).unwrap();
        assert_eq!(parsed.label, "left");
        assert!((parsed.confidence - 0.92).abs() < f64::EPSILON);
    }
}
