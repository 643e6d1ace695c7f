//! Keyword-driven search query construction.
//!
//! Recommendation is best-effort, not critical-path: extraction failures
//! degrade to "no query" rather than propagating.

use crate::capability::KeywordExtractor;

/// Text shorter than this yields no query terms.
pub const MIN_QUERY_TEXT_LEN: usize = 10;

/// Maximum number of keywords joined into the search query.
pub const MAX_QUERY_TERMS: usize = 3;

/// Build a search query from the triggering text.
///
/// Returns `None` when the text is too short, extraction yields nothing, or
/// the extractor fails. A missing query means "no candidates obtainable" to
/// the caller.
pub async fn build_query(extractor: &dyn KeywordExtractor, text: &str) -> Option<String> {
    let trimmed = text.trim();
    // Characters, not bytes: multibyte text must not slip past the gate
    if trimmed.chars().count() < MIN_QUERY_TEXT_LEN {
        return None;
    }

    match extractor.extract(trimmed, MAX_QUERY_TERMS).await {
        Ok(terms) if terms.is_empty() => None,
        Ok(terms) => Some(terms.join(" ")),
        Err(e) => {
            tracing::warn!(error = %e, "Keyword extraction failed, skipping recommendation");
            None
        }
    }
}
