//! Per-user bias accumulation.
//!
//! Tracks running left/right counts per user identifier and detects when a
//! count crosses the configured threshold. The read-increment-compare-reset
//! sequence runs inside a single critical section so concurrent observations
//! for one user can neither double count nor miss a trigger. The lock is
//! held only across that step, never across downstream calls.

use crate::leaning::Leaning;
use std::collections::HashMap;
use std::sync::Mutex;
use tilt_common::{Error, Result};

/// Running counts for one user. Both values are always below the threshold
/// once an observation has been processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiasCounts {
    pub left: u32,
    pub right: u32,
}

/// Outcome of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    /// A count reached the threshold; both counters were reset to zero in
    /// the same step. `bias` is the leaning that crossed.
    Triggered { bias: Leaning },
    /// Counts after the observation, both below the threshold.
    NotTriggered { left: u32, right: u32 },
}

impl TriggerResult {
    pub const fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// Process-wide user → counts mapping with threshold detection.
///
/// State is in-memory for the process lifetime. The get/increment/reset
/// surface is deliberately narrow so a durable counter store could replace
/// the map without touching callers.
pub struct BiasTracker {
    threshold: u32,
    counts: Mutex<HashMap<String, BiasCounts>>,
}

impl BiasTracker {
    /// Create a tracker. `threshold` is shared by all users.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record one observation for a user.
    ///
    /// Left/right increments the matching counter, implicitly creating the
    /// zero state for unseen users. Reaching the threshold resets both
    /// counters and reports the triggering bias. Neutral observations never
    /// mutate state and never trigger.
    pub fn observe(&self, user_id: &str, leaning: Leaning) -> Result<TriggerResult> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id is required".into()));
        }

        let mut counts = self
            .counts
            .lock()
            .map_err(|e| Error::Internal(format!("bias tracker lock poisoned: {e}")))?;

        let entry = counts.entry(user_id.to_string()).or_default();

        match leaning {
            Leaning::Left => entry.left += 1,
            Leaning::Right => entry.right += 1,
            Leaning::Neutral => {
                return Ok(TriggerResult::NotTriggered {
                    left: entry.left,
                    right: entry.right,
                });
            }
        }

        let crossed = match leaning {
            Leaning::Left => entry.left >= self.threshold,
            Leaning::Right => entry.right >= self.threshold,
            Leaning::Neutral => unreachable!(),
        };

        if crossed {
            *entry = BiasCounts::default();
            tracing::info!(user_id = %user_id, bias = %leaning, "Bias threshold reached, counters reset");
            return Ok(TriggerResult::Triggered { bias: leaning });
        }

        Ok(TriggerResult::NotTriggered {
            left: entry.left,
            right: entry.right,
        })
    }

    /// Current counts for a user (zero for unseen users).
    pub fn counts(&self, user_id: &str) -> BiasCounts {
        self.counts
            .lock()
            .map(|counts| counts.get(user_id).copied().unwrap_or_default())
            .unwrap_or_default()
    }
}
