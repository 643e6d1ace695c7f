//! Observation intake - the orchestration layer tying recording, bias
//! tracking, and counter selection together.
//!
//! Failure policy: the activity insert is the one hard dependency. Once the
//! observation is durably recorded, everything downstream (selection, the
//! recommendation update) degrades gracefully instead of failing the call.

use crate::capability::{ActivityRecorder, NewActivity};
use crate::leaning::{CandidatePost, Leaning, SelectionMode};
use crate::selector::CounterSelector;
use crate::tracker::{BiasTracker, TriggerResult};
use std::sync::Arc;
use tilt_common::{Error, Result};

/// One observed post consumption.
#[derive(Debug, Clone)]
pub struct Observation {
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub label: Leaning,
    pub subreddit: Option<String>,
}

/// Result of processing an observation.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    /// The leaning that crossed the threshold, when it did.
    pub bias: Option<Leaning>,
    pub recommendations: Vec<CandidatePost>,
    /// Counts after the observation (zero after a trigger).
    pub left: u32,
    pub right: u32,
}

impl IntakeOutcome {
    pub fn triggered(&self) -> bool {
        self.bias.is_some()
    }
}

/// Front door for observations: record, count, and counter-recommend.
pub struct ObservationIntake {
    tracker: BiasTracker,
    selector: CounterSelector,
    recorder: Arc<dyn ActivityRecorder>,
}

impl ObservationIntake {
    pub fn new(
        tracker: BiasTracker,
        selector: CounterSelector,
        recorder: Arc<dyn ActivityRecorder>,
    ) -> Self {
        Self {
            tracker,
            selector,
            recorder,
        }
    }

    pub fn tracker(&self) -> &BiasTracker {
        &self.tracker
    }

    /// Process one observation through the counter-bias pipeline.
    ///
    /// The activity row is inserted first; an insert failure aborts the call
    /// with [`Error::Persistence`] and leaves the counters untouched. When
    /// the threshold trips, the counter set is selected and attached to the
    /// recorded row; an update failure is logged and the recommendations are
    /// still returned.
    pub async fn process(&self, observation: Observation) -> Result<IntakeOutcome> {
        if observation.user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id is required".into()));
        }

        let activity = NewActivity::observation(
            &observation.user_id,
            &observation.title,
            &observation.body,
            observation.label,
            observation.subreddit.clone(),
        );
        let activity_id = self
            .recorder
            .record(&activity)
            .await
            .map_err(|e| Error::Persistence(format!("failed to record activity: {e}")))?;

        let trigger = self
            .tracker
            .observe(&observation.user_id, observation.label)?;

        match trigger {
            TriggerResult::NotTriggered { left, right } => Ok(IntakeOutcome {
                bias: None,
                recommendations: Vec::new(),
                left,
                right,
            }),
            TriggerResult::Triggered { bias } => {
                tracing::info!(
                    user_id = %observation.user_id,
                    bias = %bias,
                    "Bias threshold crossed, selecting counter content"
                );

                let text = observation_text(&observation);
                let recommendations = self
                    .selector
                    .select(&text, bias, SelectionMode::CounterBias)
                    .await;

                // The crossing is marked on the row even when selection came
                // back empty; the URL list may be empty.
                let urls: Vec<String> = recommendations.iter().map(|p| p.url.clone()).collect();
                if let Err(e) = self
                    .recorder
                    .attach_recommendations(activity_id, &urls)
                    .await
                {
                    tracing::warn!(
                        activity_id,
                        error = %e,
                        "Failed to attach recommendations to activity row"
                    );
                }

                Ok(IntakeOutcome {
                    bias: Some(bias),
                    recommendations,
                    left: 0,
                    right: 0,
                })
            }
        }
    }

    /// Build a related-content set for a post without touching the counters.
    ///
    /// The selection runs first so the activity row can be inserted with its
    /// recommendations already attached. The insert is still the hard
    /// dependency.
    pub async fn related(&self, observation: Observation) -> Result<Vec<CandidatePost>> {
        if observation.user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id is required".into()));
        }

        let text = observation_text(&observation);
        let recommendations = self
            .selector
            .select(&text, observation.label, SelectionMode::Related)
            .await;

        let mut activity = NewActivity::observation(
            &observation.user_id,
            &observation.title,
            &observation.body,
            observation.label,
            observation.subreddit.clone(),
        );
        activity.recommended_urls = recommendations.iter().map(|p| p.url.clone()).collect();
        activity.recommendation_triggered = !recommendations.is_empty();

        self.recorder
            .record(&activity)
            .await
            .map_err(|e| Error::Persistence(format!("failed to record activity: {e}")))?;

        Ok(recommendations)
    }
}

/// The text fed to keyword extraction: title plus body when present.
fn observation_text(observation: &Observation) -> String {
    if observation.body.trim().is_empty() {
        observation.title.clone()
    } else {
        format!("{} {}", observation.title, observation.body)
    }
}
