//! Content search backed by Reddit's public search endpoint.
//!
//! Uses the unauthenticated `search.json` listing API. Reddit throttles or
//! rejects requests without a descriptive User-Agent, so the configured
//! agent string is sent on every call.

use async_trait::async_trait;
use serde::Deserialize;
use tilt_engine::{ContentSearch, SearchHit};

/// Reddit search provider.
pub struct RedditSearch {
    client: reqwest::Client,
    base_url: String,
}

impl RedditSearch {
    /// Create a provider for the given base URL (normally
    /// `https://www.reddit.com`).
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            client: super::build_client(timeout_secs, Some(user_agent)),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ContentSearch for RedditSearch {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn search(&self, query: &str, limit: u32) -> anyhow::Result<Vec<SearchHit>> {
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("sort", "top"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("reddit search returned {}: {}", status, body);
        }

        let listing: Listing = response.json().await?;
        let hits = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let post = child.data;
                SearchHit {
                    title: post.title,
                    url: format!("{}{}", self.base_url, post.permalink),
                    body: post.selftext.filter(|s| !s.trim().is_empty()),
                    subreddit: post.subreddit,
                    upvotes: post.score,
                    comments: post.num_comments,
                }
            })
            .collect();
        Ok(hits)
    }

    async fn health(&self) -> bool {
        let url = format!("{}/search.json", self.base_url);
        match self
            .client
            .get(&url)
            .query(&[("q", "news"), ("limit", "1")])
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Reddit health check failed");
                false
            }
        }
    }
}

// Reddit listing wire format, limited to the fields consumed here

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    permalink: String,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_parsing_maps_expected_fields() {
        let raw = r#"{
            "data": {
                "children": [
                    {
                        "data": {
                            "title": "Senate passes climate bill",
                            "permalink": "/r/politics/comments/abc/senate/",
                            "selftext": "",
                            "subreddit": "politics",
                            "score": 1523,
                            "num_comments": 402
                        }
                    }
                ]
            }
        }"#;

        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.data.children.len(), 1);
        let post = &listing.data.children[0].data;
        assert_eq!(post.title, "Senate passes climate bill");
        assert_eq!(post.score, 1523);
        assert_eq!(post.subreddit.as_deref(), Some("politics"));
    }

    #[test]
    fn listing_parsing_tolerates_missing_optionals() {
        let raw = r#"{
            "data": {
                "children": [
                    {"data": {"title": "t", "permalink": "/r/x/1/"}}
                ]
            }
        }"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        let post = &listing.data.children[0].data;
        assert_eq!(post.score, 0);
        assert!(post.selftext.is_none());
    }
}
