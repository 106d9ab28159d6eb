//! Core data model types for faqcoach.
//!
//! An [`Entry`] is one FAQ question with its approved answer; a [`Session`]
//! is the mutable record of one learner attempt at that entry.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::{ArtifactKind, Feedback, PhrasingAlert, ScoreCard, StatusNotes, Suggestion};

/// Text used when the bank hands back an entry without a question.
pub const MISSING_QUESTION: &str = "Question not found";
/// Text used when the bank hands back an entry without an answer.
pub const MISSING_ANSWER: &str = "Answer not found";

/// Score shown before any attempt has been submitted.
pub const PLACEHOLDER_SCORE: u8 = 66;

/// One FAQ question, its approved answer and optional notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    /// Notes attached to the approved answer, if any.
    #[serde(default)]
    pub status: Option<String>,
}

impl Entry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Interpretation of a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ScoreLabel {
    /// Map a 0-100 score onto its label.
    ///
    /// Each breakpoint is an exclusive lower bound, so a score sitting exactly
    /// on a breakpoint falls into the lower bucket (79 is `High`, 80 is
    /// `VeryHigh`).
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s > 79 => ScoreLabel::VeryHigh,
            s if s > 59 => ScoreLabel::High,
            s if s > 39 => ScoreLabel::Moderate,
            s if s > 19 => ScoreLabel::Low,
            _ => ScoreLabel::VeryLow,
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLabel::VeryLow => write!(f, "Very Low"),
            ScoreLabel::Low => write!(f, "Low"),
            ScoreLabel::Moderate => write!(f, "Moderate"),
            ScoreLabel::High => write!(f, "High"),
            ScoreLabel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Where a session sits in the attempt lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No attempt yet; input is enabled.
    Idle,
    /// Attempt recorded and input locked; external results still outstanding.
    Pending,
    /// All four artifacts computed; only reset is allowed.
    Submitted,
}

impl SessionPhase {
    /// Whether the learner may type and submit.
    pub fn accepts_input(self) -> bool {
        self == SessionPhase::Idle
    }

    /// Whether a reset may be requested.
    pub fn can_reset(self) -> bool {
        self == SessionPhase::Submitted
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Pending => write!(f, "pending"),
            SessionPhase::Submitted => write!(f, "submitted"),
        }
    }
}

/// Which feedback cards a presenter should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub show_score: bool,
    pub show_status: bool,
    pub show_phrasing_alert: bool,
    pub show_suggestions: bool,
}

impl Visibility {
    pub fn any(&self) -> bool {
        self.show_score || self.show_status || self.show_phrasing_alert || self.show_suggestions
    }
}

/// The live record of one learner's attempt at one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    /// Notes from the entry, empty when the entry carried none.
    pub status: String,
    pub attempt: String,
    pub score: u8,
    pub score_label: ScoreLabel,
    pub suggestion: String,
    pub forbidden_matches: Vec<String>,
    pub visibility: Visibility,
    pub phase: SessionPhase,
    pub feedback: Feedback,
}

impl Session {
    /// Build a fresh session from the initial template and an entry.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            question: or_sentinel(&entry.question, MISSING_QUESTION),
            answer: or_sentinel(&entry.answer, MISSING_ANSWER),
            status: entry
                .status
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            attempt: String::new(),
            score: PLACEHOLDER_SCORE,
            score_label: ScoreLabel::from_score(PLACEHOLDER_SCORE),
            suggestion: String::new(),
            forbidden_matches: Vec::new(),
            visibility: Visibility::default(),
            phase: SessionPhase::Idle,
            feedback: Feedback::default(),
        }
    }

    /// Whether the entry behind this session carried real notes.
    pub fn has_notes(&self) -> bool {
        !self.status.is_empty()
    }

    /// The computed score and its label. `None` before submit or when the
    /// scorer failed, even though `score` then still holds the placeholder.
    pub fn scored(&self) -> Option<(u8, ScoreLabel)> {
        match &self.feedback.score {
            Some(ScoreCard::Scored { score, label }) => Some((*score, *label)),
            _ => None,
        }
    }

    pub(crate) fn apply_score(&mut self, card: ScoreCard) {
        if let ScoreCard::Scored { score, label } = card {
            self.score = score;
            self.score_label = label;
        }
        self.visibility.show_score = true;
        self.feedback.score = Some(card);
    }

    pub(crate) fn apply_phrasing(&mut self, matches: Vec<String>, alert: PhrasingAlert) {
        self.forbidden_matches = matches;
        self.visibility.show_phrasing_alert = alert.is_visible();
        self.feedback.phrasing = Some(alert);
    }

    pub(crate) fn apply_notes(&mut self, notes: StatusNotes) {
        self.visibility.show_status = notes.is_visible();
        self.feedback.notes = Some(notes);
    }

    pub(crate) fn apply_suggestion(&mut self, suggestion: Suggestion) {
        self.suggestion = suggestion.text().unwrap_or_default().to_string();
        self.visibility.show_suggestions = suggestion.is_visible();
        self.feedback.suggestion = Some(suggestion);
    }

    /// Whether the artifact of the given kind has been computed.
    pub fn has_artifact(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Score => self.feedback.score.is_some(),
            ArtifactKind::PhrasingAlert => self.feedback.phrasing.is_some(),
            ArtifactKind::StatusNotes => self.feedback.notes.is_some(),
            ArtifactKind::Suggestion => self.feedback.suggestion.is_some(),
        }
    }
}

fn or_sentinel(value: &str, sentinel: &str) -> String {
    if value.trim().is_empty() {
        sentinel.to_string()
    } else {
        value.to_string()
    }
}
