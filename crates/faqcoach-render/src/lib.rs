//! faqcoach-render: Presenters for sessions and their feedback.
//!
//! A presenter is a pure function of a [`Session`] snapshot. The same
//! snapshot can be rendered as HTML card fragments, plain terminal text, or
//! JSON, and an incremental front end can render each artifact as soon as
//! the state machine reports it.

pub mod html;
pub mod json;
pub mod text;

use faqcoach_core::feedback::ArtifactKind;
use faqcoach_core::model::{Session, SessionPhase};

pub use html::HtmlPresenter;
pub use json::JsonPresenter;
pub use text::TextPresenter;

/// Renders session state for one output medium.
pub trait Presenter {
    /// The question prompt.
    fn question(&self, session: &Session) -> String;

    /// The approved answer, or `None` until the attempt has been submitted.
    fn approved_answer(&self, session: &Session) -> Option<String>;

    /// One feedback artifact, or `None` when it has not been computed yet or
    /// its visibility flag is off.
    fn artifact(&self, session: &Session, kind: ArtifactKind) -> Option<String>;

    /// Joins rendered fragments.
    fn separator(&self) -> &'static str {
        "\n"
    }

    /// Every visible artifact, in computation order.
    fn feedback(&self, session: &Session) -> String {
        ArtifactKind::ALL
            .iter()
            .filter_map(|&kind| self.artifact(session, kind))
            .collect::<Vec<_>>()
            .join(self.separator())
    }

    /// The question, then the approved answer once revealed, then whatever
    /// feedback is visible.
    fn render(&self, session: &Session) -> String {
        let mut parts = vec![self.question(session)];
        parts.extend(self.approved_answer(session));
        let feedback = self.feedback(session);
        if !feedback.is_empty() {
            parts.push(feedback);
        }
        parts.join(self.separator())
    }
}

/// Whether the approved answer may be shown to the learner.
pub(crate) fn answer_revealed(session: &Session) -> bool {
    session.phase == SessionPhase::Submitted
}

/// Whether `kind` has been computed and is flagged visible.
pub(crate) fn is_shown(session: &Session, kind: ArtifactKind) -> bool {
    let v = &session.visibility;
    session.has_artifact(kind)
        && match kind {
            ArtifactKind::Score => v.show_score,
            ArtifactKind::PhrasingAlert => v.show_phrasing_alert,
            ArtifactKind::StatusNotes => v.show_status,
            ArtifactKind::Suggestion => v.show_suggestions,
        }
}
