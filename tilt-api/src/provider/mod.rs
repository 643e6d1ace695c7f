//! HTTP-backed implementations of the engine's capability traits.

mod classifier;
mod keywords;
mod reddit;

pub use classifier::ModelClassifier;
pub use keywords::KeywordService;
pub use reddit::RedditSearch;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

/// Build the shared HTTP client used by provider implementations.
pub(crate) fn build_client(timeout_secs: u64, user_agent: Option<&str>) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(agent) = user_agent {
        if let Ok(value) = HeaderValue::from_str(agent) {
            headers.insert(reqwest::header::USER_AGENT, value);
        }
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
