//! Plain-text presenter for terminals.

use faqcoach_core::feedback::{
    ArtifactKind, ScoreCard, ANSWER_HEADING, NOTES_HEADING, SCORE_UNAVAILABLE,
    SUGGESTION_HEADING,
};
use faqcoach_core::model::Session;

use crate::{answer_revealed, is_shown, Presenter};

const BAR_WIDTH: usize = 20;

/// Renders feedback as indented text blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }
}

fn score_bar(score: u8) -> String {
    let filled = usize::from(score) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn block(heading: &str, body: &str) -> String {
    let mut out = format!("== {heading}");
    for line in body.lines() {
        out.push_str("\n   ");
        out.push_str(line);
    }
    out
}

impl Presenter for TextPresenter {
    fn question(&self, session: &Session) -> String {
        format!("Q: {}", session.question)
    }

    fn approved_answer(&self, session: &Session) -> Option<String> {
        answer_revealed(session).then(|| block(ANSWER_HEADING, &session.answer))
    }

    fn artifact(&self, session: &Session, kind: ArtifactKind) -> Option<String> {
        if !is_shown(session, kind) {
            return None;
        }
        let feedback = &session.feedback;
        match kind {
            ArtifactKind::Score => feedback.score.as_ref().map(|card| match card {
                ScoreCard::Scored { score, label } => {
                    format!("Similarity {} {score:>3}% {label}", score_bar(*score))
                }
                ScoreCard::Unavailable { reason } => format!("{SCORE_UNAVAILABLE} ({reason})"),
            }),
            ArtifactKind::PhrasingAlert => feedback.phrasing.as_ref().and_then(|alert| {
                let mut body = alert.lead()?;
                for item in alert.items() {
                    body.push_str(&format!("\n  - {item}"));
                }
                if let Some(footer) = alert.footer() {
                    body.push('\n');
                    body.push_str(footer);
                }
                Some(block(alert.heading()?, &body))
            }),
            ArtifactKind::StatusNotes => feedback
                .notes
                .as_ref()
                .and_then(|n| n.text())
                .map(|text| block(NOTES_HEADING, text)),
            ArtifactKind::Suggestion => feedback
                .suggestion
                .as_ref()
                .and_then(|s| s.text())
                .map(|text| block(SUGGESTION_HEADING, text)),
        }
    }
}
