//! Feedback artifacts produced for a submitted attempt.
//!
//! Each artifact carries enough structure for a presenter to render it without
//! consulting the configuration again: a heading, its body text, and whether
//! it should be shown at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ScoreLabel;

pub const ALERT_HEADING: &str = "Watch your phrasing!";
pub const DEMO_ALERT_HEADING: &str = "Demo Alert";
pub const ANSWER_HEADING: &str = "Approved Answer:";
pub const NOTES_HEADING: &str = "Approved Answer Notes:";
pub const SUGGESTION_HEADING: &str = "Suggestions for improvement:";
pub const SCORE_UNAVAILABLE: &str = "Score unavailable";

/// Shown in place of a suggestion whenever the generator fails.
pub const SUGGESTION_APOLOGY: &str = "Sorry, an error occured while trying to generate a suggestion for improvements to your answer.";

const MULTIPLE_LEAD: &str = "OH NO! You used these forbidden phrases:";
const MULTIPLE_FOOTER: &str = "The program IRB forbids the use of these phrases!";

/// The four kinds of feedback, in the order they are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Score,
    PhrasingAlert,
    StatusNotes,
    Suggestion,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Score,
        ArtifactKind::PhrasingAlert,
        ArtifactKind::StatusNotes,
        ArtifactKind::Suggestion,
    ];
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Score => write!(f, "score"),
            ArtifactKind::PhrasingAlert => write!(f, "phrasing alert"),
            ArtifactKind::StatusNotes => write!(f, "status notes"),
            ArtifactKind::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// Similarity score card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScoreCard {
    Scored { score: u8, label: ScoreLabel },
    /// The scorer failed; no score is fabricated.
    Unavailable { reason: String },
}

/// Forbidden-phrase compliance artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PhrasingAlert {
    /// No match, placeholder mode on: show the demo guidance text.
    Demo(String),
    /// Exactly one configured phrase was used.
    Single(String),
    /// Two or more configured phrases were used, in configured-list order.
    Multiple(Vec<String>),
    /// No match, placeholder mode off.
    Suppressed,
}

impl PhrasingAlert {
    pub fn is_visible(&self) -> bool {
        !matches!(self, PhrasingAlert::Suppressed)
    }

    pub fn heading(&self) -> Option<&'static str> {
        match self {
            PhrasingAlert::Demo(_) => Some(DEMO_ALERT_HEADING),
            PhrasingAlert::Single(_) | PhrasingAlert::Multiple(_) => Some(ALERT_HEADING),
            PhrasingAlert::Suppressed => None,
        }
    }

    /// The opening sentence of the alert body.
    pub fn lead(&self) -> Option<String> {
        match self {
            PhrasingAlert::Demo(text) => Some(text.clone()),
            PhrasingAlert::Single(phrase) => Some(format!(
                "OOPS! You used the phrase '{phrase}' which is forbidden."
            )),
            PhrasingAlert::Multiple(_) => Some(MULTIPLE_LEAD.to_string()),
            PhrasingAlert::Suppressed => None,
        }
    }

    /// Itemized phrases; only the multi-match alert has any.
    pub fn items(&self) -> &[String] {
        match self {
            PhrasingAlert::Multiple(phrases) => phrases,
            _ => &[],
        }
    }

    pub fn footer(&self) -> Option<&'static str> {
        match self {
            PhrasingAlert::Multiple(_) => Some(MULTIPLE_FOOTER),
            _ => None,
        }
    }
}

/// Notes attached to the approved answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum StatusNotes {
    Notes(String),
    Placeholder(String),
    Suppressed,
}

impl StatusNotes {
    pub fn is_visible(&self) -> bool {
        !matches!(self, StatusNotes::Suppressed)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            StatusNotes::Notes(text) | StatusNotes::Placeholder(text) => Some(text),
            StatusNotes::Suppressed => None,
        }
    }
}

/// Improvement suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Suggestion {
    Generated(String),
    Placeholder(String),
    /// The generator failed or timed out.
    Apology(String),
    /// The generator returned nothing and placeholder mode is off.
    Suppressed,
}

impl Suggestion {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Suggestion::Suppressed)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Suggestion::Generated(text) | Suggestion::Placeholder(text) | Suggestion::Apology(text) => {
                Some(text)
            }
            Suggestion::Suppressed => None,
        }
    }
}

/// All artifacts computed for the current attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub score: Option<ScoreCard>,
    pub phrasing: Option<PhrasingAlert>,
    pub notes: Option<StatusNotes>,
    pub suggestion: Option<Suggestion>,
}

impl Feedback {
    pub fn is_complete(&self) -> bool {
        self.score.is_some()
            && self.phrasing.is_some()
            && self.notes.is_some()
            && self.suggestion.is_some()
    }
}
