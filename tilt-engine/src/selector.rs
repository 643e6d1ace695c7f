//! Counter-set selection: search, classify, partition, compose.
//!
//! The selector owns no mutable state; every call is an independent
//! query-build → search → classify → partition → compose pipeline. All
//! downstream failures degrade to a smaller (possibly empty) result set.

use crate::capability::{Classifier, ContentSearch, KeywordExtractor};
use crate::leaning::{CandidatePost, Leaning, SelectionMode};
use crate::query;
use futures_util::future::join_all;
use std::sync::Arc;

/// Neutral candidates taken per composition.
const NEUTRAL_PICKS: usize = 2;

/// Directional candidates taken per composition (split 1+1 for a neutral
/// stated leaning in related mode).
const DIRECTIONAL_PICKS: usize = 2;

/// Composes balanced recommendation sets from ranked search candidates.
pub struct CounterSelector {
    classifier: Arc<dyn Classifier>,
    keywords: Arc<dyn KeywordExtractor>,
    search: Arc<dyn ContentSearch>,
    candidate_limit: u32,
}

impl CounterSelector {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        keywords: Arc<dyn KeywordExtractor>,
        search: Arc<dyn ContentSearch>,
        candidate_limit: u32,
    ) -> Self {
        Self {
            classifier,
            keywords,
            search,
            candidate_limit,
        }
    }

    /// Select a balanced set of candidates for the given text and leaning.
    ///
    /// Returns at most 4 posts. An empty result is normal: no keywords, no
    /// search hits, or short buckets all shrink the output rather than
    /// failing. Persistence is the caller's responsibility.
    pub async fn select(
        &self,
        text: &str,
        leaning: Leaning,
        mode: SelectionMode,
    ) -> Vec<CandidatePost> {
        let Some(search_query) = query::build_query(self.keywords.as_ref(), text).await else {
            tracing::info!("No keywords found, skipping candidate search");
            return Vec::new();
        };

        tracing::debug!(query = %search_query, "Searching for counter candidates");
        let candidates = self.search_and_classify(&search_query).await;

        let (left, neutral, right) = partition(candidates);
        tracing::debug!(
            left = left.len(),
            neutral = neutral.len(),
            right = right.len(),
            "Partitioned candidate pool"
        );

        compose(left, neutral, right, leaning, mode)
    }

    /// Search and tag every hit with its classified leaning, preserving
    /// provider order. Per-candidate classification runs concurrently;
    /// failed classifications drop the candidate.
    async fn search_and_classify(&self, search_query: &str) -> Vec<CandidatePost> {
        let hits = match self.search.search(search_query, self.candidate_limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(
                    provider = self.search.name(),
                    error = %e,
                    "Content search failed, returning no candidates"
                );
                return Vec::new();
            }
        };

        let classifications = join_all(hits.iter().map(|hit| {
            let text = hit.classification_text();
            async move { self.classifier.classify(&text).await }
        }))
        .await;

        hits.into_iter()
            .zip(classifications)
            .filter_map(|(hit, classification)| match classification {
                Ok(c) => Some(CandidatePost::from_hit(hit, c.label)),
                Err(e) => {
                    tracing::warn!(error = %e, "Candidate classification failed, dropping candidate");
                    None
                }
            })
            .collect()
    }
}

/// Split candidates into leaning buckets, keeping provider order within each.
fn partition(
    candidates: Vec<CandidatePost>,
) -> (Vec<CandidatePost>, Vec<CandidatePost>, Vec<CandidatePost>) {
    let mut left = Vec::new();
    let mut neutral = Vec::new();
    let mut right = Vec::new();
    for candidate in candidates {
        match candidate.leaning {
            Leaning::Left => left.push(candidate),
            Leaning::Neutral => neutral.push(candidate),
            Leaning::Right => right.push(candidate),
        }
    }
    (left, neutral, right)
}

/// Apply the composition policy. Short buckets yield fewer items; there is
/// no backfilling across buckets.
fn compose(
    left: Vec<CandidatePost>,
    neutral: Vec<CandidatePost>,
    right: Vec<CandidatePost>,
    leaning: Leaning,
    mode: SelectionMode,
) -> Vec<CandidatePost> {
    let mut selected: Vec<CandidatePost> = neutral.into_iter().take(NEUTRAL_PICKS).collect();

    match (leaning.opposite(), mode) {
        (Some(Leaning::Right), _) => {
            selected.extend(right.into_iter().take(DIRECTIONAL_PICKS));
        }
        (Some(_), _) => {
            selected.extend(left.into_iter().take(DIRECTIONAL_PICKS));
        }
        (None, SelectionMode::Related) => {
            selected.extend(left.into_iter().take(1));
            selected.extend(right.into_iter().take(1));
        }
        (None, SelectionMode::CounterBias) => {
            // A threshold trigger is always directional; nothing to counter.
            tracing::warn!("Counter-bias selection invoked with a neutral leaning");
            selected.clear();
        }
    }

    selected
}
