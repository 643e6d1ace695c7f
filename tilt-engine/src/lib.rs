//! Tilt Engine - bias accumulation and counter recommendation.
//!
//! This crate holds the stateful core of the Tilt system:
//! - Per-user leaning counters with a threshold-triggered reset
//!   ([`tracker::BiasTracker`])
//! - Keyword-driven search query construction ([`query`])
//! - Partition-and-compose selection of balanced candidate sets
//!   ([`selector::CounterSelector`])
//! - The observation intake flow tying the pieces together with the
//!   activity log ([`intake::ObservationIntake`])
//!
//! External capabilities (leaning classification, keyword extraction,
//! content search, durable activity recording) enter through the traits in
//! [`capability`]; the HTTP providers live in the `tilt-api` crate.
//!
//! ## Flow
//!
//! ```text
//! Observation → record activity → accumulate counts
//!                                      ↓ threshold crossed
//!                    keywords → search → classify → partition → compose
//!                                      ↓
//!                           attach recommendations
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod capability;
pub mod intake;
pub mod leaning;
pub mod query;
pub mod selector;
pub mod tracker;

pub use capability::{ActivityRecorder, Classifier, ContentSearch, KeywordExtractor, NewActivity};
pub use intake::{IntakeOutcome, Observation, ObservationIntake};
pub use leaning::{CandidatePost, Classification, Leaning, SearchHit, SelectionMode};
pub use query::{MAX_QUERY_TERMS, MIN_QUERY_TEXT_LEN};
pub use selector::CounterSelector;
pub use tracker::{BiasCounts, BiasTracker, TriggerResult};

#[cfg(test)]
pub(crate) mod test_support;
