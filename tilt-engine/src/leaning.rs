//! Core types shared across the engine: leanings, classifications,
//! candidate posts, and selection modes.

use serde::{Deserialize, Serialize};
use tilt_common::Error;

/// Political leaning of a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leaning {
    Left,
    Neutral,
    Right,
}

impl Leaning {
    /// The leaning that counters this one. Neutral has no counter.
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::Neutral => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Neutral => "neutral",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Leaning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Leaning {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "neutral" => Ok(Self::Neutral),
            "right" => Ok(Self::Right),
            other => Err(Error::InvalidInput(format!(
                "label must be 'left', 'right' or 'neutral', got '{other}'"
            ))),
        }
    }
}

/// Result of running the leaning classifier over a piece of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub label: Leaning,
    /// Model confidence in [0, 1]. Blank text classifies as neutral with 1.0
    /// without invoking the model.
    pub confidence: f64,
}

impl Classification {
    /// The fixed classification for blank input.
    pub const fn blank() -> Self {
        Self {
            label: Leaning::Neutral,
            confidence: 1.0,
        }
    }
}

/// A raw item from the content search provider, in provider rank order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Post body, when the provider returns one. Used only for
    /// classification, not surfaced in recommendations.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub comments: i64,
}

impl SearchHit {
    /// Text fed to the classifier: title plus body when present.
    pub fn classification_text(&self) -> String {
        match &self.body {
            Some(body) if !body.trim().is_empty() => format!("{} {}", self.title, body),
            _ => self.title.clone(),
        }
    }
}

/// A search hit tagged with its classified leaning. Created transiently per
/// search call; ordering within a leaning bucket is the provider's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePost {
    pub title: String,
    pub leaning: Leaning,
    pub url: String,
    pub upvotes: i64,
    pub comments: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
}

impl CandidatePost {
    /// Tag a search hit with its classified leaning.
    pub fn from_hit(hit: SearchHit, leaning: Leaning) -> Self {
        Self {
            title: hit.title,
            leaning,
            url: hit.url,
            upvotes: hit.upvotes,
            comments: hit.comments,
            subreddit: hit.subreddit,
        }
    }
}

/// How the selector composes its result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Threshold-triggered: 2 neutral + 2 opposite the detected bias.
    CounterBias,
    /// Symmetric "related, balanced" content for a stated leaning:
    /// left → 2 neutral + 2 right; right → 2 neutral + 2 left;
    /// neutral → 2 neutral + 1 left + 1 right.
    Related,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn leaning_roundtrip() {
        for (s, leaning) in [
            ("left", Leaning::Left),
            ("neutral", Leaning::Neutral),
            ("right", Leaning::Right),
        ] {
            assert_eq!(Leaning::from_str(s).unwrap(), leaning);
            assert_eq!(leaning.to_string(), s);
        }
    }

    #[test]
    fn leaning_from_str_is_case_insensitive() {
        assert_eq!(Leaning::from_str("LEFT").unwrap(), Leaning::Left);
        assert_eq!(Leaning::from_str(" Right ").unwrap(), Leaning::Right);
    }

    #[test]
    fn leaning_from_str_rejects_unknown() {
        let err = Leaning::from_str("centrist").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn leaning_opposite() {
        assert_eq!(Leaning::Left.opposite(), Some(Leaning::Right));
        assert_eq!(Leaning::Right.opposite(), Some(Leaning::Left));
        assert_eq!(Leaning::Neutral.opposite(), None);
    }

    #[test]
    fn leaning_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Leaning::Left).unwrap(), "\"left\"");
        let parsed: Leaning = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(parsed, Leaning::Right);
    }

    #[test]
    fn classification_text_includes_body() {
        let hit = SearchHit {
            title: "Title".into(),
            url: "https://example.com/1".into(),
            body: Some("body text".into()),
            subreddit: None,
            upvotes: 0,
            comments: 0,
        };
        assert_eq!(hit.classification_text(), "Title body text");

        let bare = SearchHit { body: None, ..hit };
        assert_eq!(bare.classification_text(), "Title");
    }
}
