//! Shared mock capabilities for engine tests.

use crate::capability::{ActivityRecorder, Classifier, ContentSearch, KeywordExtractor, NewActivity};
use crate::leaning::{Classification, Leaning, SearchHit};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Classifier that reads the leaning from a `[left]` / `[right]` /
/// `[neutral]` text prefix; anything else is neutral.
pub struct FixedClassifier;

impl FixedClassifier {
    pub fn by_prefix() -> Self {
        Self
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn classify(&self, text: &str) -> anyhow::Result<Classification> {
        if text.trim().is_empty() {
            return Ok(Classification::blank());
        }
        let label = if text.starts_with("[left]") {
            Leaning::Left
        } else if text.starts_with("[right]") {
            Leaning::Right
        } else {
            Leaning::Neutral
        };
        Ok(Classification { label, confidence: 0.9 })
    }

    async fn health(&self) -> bool {
        true
    }
}

/// Extractor returning a fixed term list, counting invocations.
pub struct FixedExtractor {
    terms: Vec<String>,
    calls: AtomicUsize,
}

impl FixedExtractor {
    pub fn new(terms: Vec<String>) -> Self {
        Self {
            terms,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordExtractor for FixedExtractor {
    async fn extract(&self, _text: &str, top_n: usize) -> anyhow::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.terms.iter().take(top_n).cloned().collect())
    }
}

/// Extractor that always fails.
pub struct FailingExtractor;

#[async_trait]
impl KeywordExtractor for FailingExtractor {
    async fn extract(&self, _text: &str, _top_n: usize) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("keyword model unavailable")
    }
}

/// Search provider returning a fixed hit list, counting invocations.
pub struct FixedSearch {
    hits: Vec<SearchHit>,
    calls: AtomicUsize,
}

impl FixedSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSearch for FixedSearch {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn search(&self, _query: &str, limit: u32) -> anyhow::Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.iter().take(limit as usize).cloned().collect())
    }

    async fn health(&self) -> bool {
        true
    }
}

/// Search provider that always fails.
pub struct FailingSearch;

#[async_trait]
impl ContentSearch for FailingSearch {
    fn name(&self) -> &str {
        "failing"
    }

    async fn search(&self, _query: &str, _limit: u32) -> anyhow::Result<Vec<SearchHit>> {
        anyhow::bail!("search provider unreachable")
    }

    async fn health(&self) -> bool {
        false
    }
}

/// In-memory recorder capturing inserts and updates.
#[derive(Default)]
pub struct RecordingRecorder {
    next_id: AtomicI64,
    pub inserted: Mutex<Vec<(i64, NewActivity)>>,
    pub attached: Mutex<Vec<(i64, Vec<String>)>>,
    pub fail_insert: bool,
    pub fail_update: bool,
}

impl RecordingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    pub fn failing_update() -> Self {
        Self {
            fail_update: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ActivityRecorder for RecordingRecorder {
    async fn record(&self, activity: &NewActivity) -> anyhow::Result<i64> {
        if self.fail_insert {
            anyhow::bail!("activity insert failed");
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.inserted.lock().unwrap().push((id, activity.clone()));
        Ok(id)
    }

    async fn attach_recommendations(&self, id: i64, urls: &[String]) -> anyhow::Result<()> {
        if self.fail_update {
            anyhow::bail!("activity update failed");
        }
        self.attached.lock().unwrap().push((id, urls.to_vec()));
        Ok(())
    }
}

/// Build a search hit whose title prefix drives [`FixedClassifier`].
pub fn hit(leaning: Leaning, name: &str) -> SearchHit {
    SearchHit {
        title: format!("[{}] {}", leaning.as_str(), name),
        url: format!("https://www.reddit.com/r/all/{name}"),
        body: None,
        subreddit: Some("all".into()),
        upvotes: 100,
        comments: 10,
    }
}
